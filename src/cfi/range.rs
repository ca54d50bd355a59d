//! Range operations
//!
//! Collapsing a range CFI to one of its ends, and building a range CFI that
//! spans two point locations.

use super::parser::parse;
use super::types::*;
use super::CfiError;

impl Cfi {
    /// Collapse a range to its start (`to_start`) or end.
    ///
    /// The chosen continuation's steps are appended to `path` and its terminal
    /// replaces the path terminal. A point CFI is returned unchanged.
    pub fn collapse(mut self, to_start: bool) -> Cfi {
        let Some(range) = self.range.take() else {
            return self;
        };

        let chosen = if to_start { range.start } else { range.end };
        tracing::trace!(to_start, "Collapsing CFI range");
        self.path.steps.extend(chosen.steps);
        self.path.terminal = chosen.terminal;
        self
    }

    /// Collapsed copy at the start of the range
    pub fn range_start(&self) -> Cfi {
        self.clone().collapse(true)
    }

    /// Collapsed copy at the end of the range
    pub fn range_end(&self) -> Cfi {
        self.clone().collapse(false)
    }

    /// Build the CFI spanning two point locations inside the same container.
    ///
    /// The longest common step prefix becomes the shared path and the
    /// remainders become `start` and `end`. Identical points yield a point CFI.
    pub fn spanning(base: Segment, a: Segment, b: Segment) -> Cfi {
        let common = a
            .steps
            .iter()
            .zip(b.steps.iter())
            .take_while(|(x, y)| match (x, y) {
                (Some(x), Some(y)) => x.same_node(y),
                _ => false,
            })
            .count();

        if common == a.steps.len()
            && common == b.steps.len()
            && a.terminal.offset == b.terminal.offset
        {
            return Cfi::new(base, a);
        }

        // Each side keeps at least its last step
        let common = if common == a.steps.len() || common == b.steps.len() {
            common.saturating_sub(1)
        } else {
            common
        };

        let mut start_steps = a.steps;
        let rest = start_steps.split_off(common);
        let path = Segment {
            steps: start_steps,
            terminal: Terminal::default(),
        };
        let start = Segment {
            steps: rest,
            terminal: a.terminal,
        };
        let end = Segment {
            steps: b.steps.into_iter().skip(common).collect(),
            terminal: b.terminal,
        };

        Cfi::with_range(base, path, start, end)
    }
}

/// Build a range CFI string from two point CFI strings.
///
/// Returns a point CFI string when both points are the same location.
pub fn range_from_points(a: &str, b: &str) -> Result<String, CfiError> {
    let a = parse(a)?.collapse(true);
    let b = parse(b)?.collapse(true);

    let same_base = a.base.steps.len() == b.base.steps.len()
        && a.base.steps.iter().zip(&b.base.steps).all(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => x.same_node(y),
            _ => false,
        });
    if !same_base {
        return Err(CfiError::MismatchedBase {
            start: a.base.to_string(),
            end: b.base.to_string(),
        });
    }

    let cfi = Cfi::spanning(a.base, a.path, b.path);
    tracing::debug!(range = cfi.is_range(), cfi = %cfi, "Built CFI from two points");
    Ok(cfi.to_string())
}
