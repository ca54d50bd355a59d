//! CFI (Canonical Fragment Identifier) module for EPUB
//!
//! This module provides parsing, serialization, comparison and range
//! construction of EPUB CFI strings. CFIs are the durable form of every
//! location the reader stores: reading position, bookmarks, highlights,
//! search results and table-of-contents entries.
//!
//! # Example CFI
//!
//! ```text
//! epubcfi(/6/4[chap01ref]!/4/2/1:42)
//!         │  │          │ │ │ │ └── character offset 42
//!         │  │          │ │ │ └──── text node (odd = text)
//!         │  │          │ │ └────── element (even = element)
//!         │  │          │ └──────── element (body)
//!         │  │          └────────── indirection (into content doc)
//!         │  └───────────────────── spine item with ID
//!         └──────────────────────── spine element
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use libros_core::cfi::{parse, range_from_points, is_before};
//!
//! let a = parse("epubcfi(/6/4!/4/2/1:10)")?;
//! let b = parse("epubcfi(/6/4!/4/2/1:20)")?;
//! assert!(is_before(&a, &b));
//!
//! let selection = range_from_points(&a.to_string(), &b.to_string())?;
//! assert_eq!(selection, "epubcfi(/6/4!/4/2,/1:10,/1:20)");
//! ```

use thiserror::Error;

mod builder;
mod comparator;
mod dom;
mod index;
mod parser;
mod range;
mod serializer;
mod types;

#[cfg(test)]
mod proptests;

// Re-export main types
pub use types::{Cfi, CfiRange, Segment, Step, StepKind, Terminal};

// Re-export parser functions
pub use parser::{is_cfi_string, parse, try_parse};

// Re-export construction helpers
pub use builder::{chapter_component, CfiBuilder};
pub use dom::{CfiSource, DomPoint, DomRange};

// Re-export comparator functions
pub use comparator::{
    compare, compare_cfi_strings, document_order, is_after, is_before, is_in_range, CfiRef,
};

pub use index::LocationIndex;
pub use range::range_from_points;

/// CFI errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CfiError {
    #[error("Malformed CFI: {0}")]
    Malformed(String),

    #[error("CFI base component has {steps} step(s), a spine position needs at least 2")]
    StructuralUnderflow { steps: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Range endpoints are in different containers ({start} vs {end})")]
    MismatchedBase { start: String, end: String },
}
