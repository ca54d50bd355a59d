//! CFI (Canonical Fragment Identifier) types for EPUB
//!
//! EPUB CFI is a standardized way to reference specific locations within EPUB publications.
//! Format: epubcfi(/6/4[chap01ref]!/4/2/22/3:268)
//!
//! Reference: <https://idpf.org/epub/linking/cfi/epub-cfi.html>

use serde::{Deserialize, Serialize};

use super::CfiError;

/// Kind of node a step addresses, derived from the parity of the raw step number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Even raw number
    Element,
    /// Odd raw number
    Text,
}

/// A single step in a CFI segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Element or text node
    pub kind: StepKind,
    /// Zero-based ordinal among sibling nodes of the same kind
    pub index: u32,
    /// Optional ID assertion [id]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// The tail of a segment, addressing a point inside the final step's node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    /// Character offset (0-based)
    pub offset: Option<u32>,
    /// Optional text location assertion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertion: Option<String>,
}

/// One component of a CFI (base, path, start or end)
///
/// A `None` slot in `steps` marks a step token that could not be read as an
/// integer. Such a segment is malformed but is kept as-is so the comparator
/// can order it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub steps: Vec<Option<Step>>,
    pub terminal: Terminal,
}

/// Start and end continuations of a range CFI, relative to its path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfiRange {
    pub start: Segment,
    pub end: Segment,
}

/// A complete EPUB CFI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cfi {
    /// Identifies the container (package document, spine item)
    pub base: Segment,
    /// Location inside the container, after the `!`
    pub path: Segment,
    /// Range continuations (for selections)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<CfiRange>,
}

impl StepKind {
    /// Classify a raw step number
    pub fn of_raw(raw: u64) -> Self {
        if raw % 2 == 0 {
            StepKind::Element
        } else {
            StepKind::Text
        }
    }
}

impl Step {
    /// Decode a raw CFI step number into kind and index.
    ///
    /// Returns `None` for the raw number 0, which addresses no node, and for
    /// numbers whose index does not fit a `u32`.
    pub fn from_raw(raw: u64) -> Option<Self> {
        let kind = StepKind::of_raw(raw);
        let index = match kind {
            StepKind::Element => (raw / 2).checked_sub(1)?,
            StepKind::Text => (raw - 1) / 2,
        };
        let index = u32::try_from(index).ok()?;
        Some(Self {
            kind,
            index,
            id: None,
        })
    }

    /// Create an element step
    pub fn element(index: u32) -> Self {
        Self {
            kind: StepKind::Element,
            index,
            id: None,
        }
    }

    /// Create a text node step
    pub fn text(index: u32) -> Self {
        Self {
            kind: StepKind::Text,
            index,
            id: None,
        }
    }

    /// Attach an ID assertion
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Re-encode as the raw CFI step number; every `u32` index fits
    pub fn raw(&self) -> u64 {
        let index = u64::from(self.index);
        match self.kind {
            StepKind::Element => (index + 1) * 2,
            StepKind::Text => 1 + 2 * index,
        }
    }

    /// Same node kind and index; assertions are ignored
    pub fn same_node(&self, other: &Step) -> bool {
        self.kind == other.kind && self.index == other.index
    }
}

impl Terminal {
    pub fn at(offset: u32) -> Self {
        Self {
            offset: Some(offset),
            assertion: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.offset.is_none() && self.assertion.is_none()
    }
}

impl Segment {
    /// Create a segment from well-formed steps
    pub fn with_steps(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().map(Some).collect(),
            terminal: Terminal::default(),
        }
    }

    /// Add a step to the segment
    pub fn push(&mut self, step: Step) {
        self.steps.push(Some(step));
    }

    /// Set the character offset
    pub fn set_offset(&mut self, offset: u32) {
        self.terminal.offset = Some(offset);
    }

    /// True when every step token was readable
    pub fn is_well_formed(&self) -> bool {
        self.steps.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.terminal.is_empty()
    }
}

impl Cfi {
    /// Create a point CFI
    pub fn new(base: Segment, path: Segment) -> Self {
        Self {
            base,
            path,
            range: None,
        }
    }

    /// Create a range CFI
    pub fn with_range(base: Segment, path: Segment, start: Segment, end: Segment) -> Self {
        Self {
            base,
            path,
            range: Some(CfiRange { start, end }),
        }
    }

    /// Check if this CFI represents a range (text selection)
    pub fn is_range(&self) -> bool {
        self.range.is_some()
    }

    pub fn start(&self) -> Option<&Segment> {
        self.range.as_ref().map(|r| &r.start)
    }

    pub fn end(&self) -> Option<&Segment> {
        self.range.as_ref().map(|r| &r.end)
    }

    /// Index of the spine item, read from the second base step.
    ///
    /// `/6/4` means spine item 1 (4/2 - 1).
    pub fn spine_pos(&self) -> Result<u32, CfiError> {
        match self.base.steps.get(1) {
            Some(Some(step)) => Ok(step.index),
            Some(None) => Err(CfiError::Malformed(
                "unreadable spine step in base component".to_string(),
            )),
            None => Err(CfiError::StructuralUnderflow {
                steps: self.base.steps.len(),
            }),
        }
    }

    /// Spine index when available, for ordering
    pub(crate) fn spine_key(&self) -> Option<u32> {
        self.base.steps.get(1).and_then(|s| s.as_ref()).map(|s| s.index)
    }
}
