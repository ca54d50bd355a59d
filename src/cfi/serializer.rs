//! CFI serialization
//!
//! Rebuilds the canonical string form. Every segment is written with a
//! leading `/`; steps re-encode as `(index+1)*2` for elements and
//! `1+2*index` for text nodes.

use std::fmt;

use super::types::*;

impl fmt::Display for Cfi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epubcfi({}!{}", self.base, self.path)?;
        if let Some(ref range) = self.range {
            write!(f, ",{},{}", range.start, range.end)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            // An unreadable step is written back as an empty token
            if let Some(step) = step {
                write!(f, "{}", step)?;
            }
        }
        if let Some(offset) = self.terminal.offset {
            write!(f, ":{}", offset)?;
        }
        if let Some(ref assertion) = self.terminal.assertion {
            write!(f, "[{}]", assertion)?;
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())?;
        if let Some(ref id) = self.id {
            write!(f, "[{}]", id)?;
        }
        Ok(())
    }
}
