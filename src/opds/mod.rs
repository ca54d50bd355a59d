//! OPDS (Open Publication Distribution System) module
//!
//! Reads OPDS 1.2 Atom catalog feeds through a declarative XML-to-object
//! mapper. Schemas describe tags, attributes, namespaces and transforms; the
//! mapper walks the element tree and produces JSON values, which the catalog
//! layer turns into typed feeds and entries.

use thiserror::Error;

pub mod catalog;
mod mapper;
mod namespaces;
mod schema;

pub use catalog::{
    parse_entry, parse_feed, parse_opensearch, Category, Content, Entry, Feed,
    IndirectAcquisition, Link, OpenSearch, Person, Price, SearchUrl,
};
pub use mapper::{text_content, trimmed, Mapper};
pub use namespaces::{ns, Namespaces};
pub use schema::{AttrSchema, Manual, NsSpec, Schema, Transform};

/// Feed mapping errors
#[derive(Debug, Error)]
pub enum MapError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Expected <{expected}> root element, found <{found}>")]
    UnexpectedRoot { expected: String, found: String },

    #[error("Mapped value does not fit: {0}")]
    Decode(#[from] serde_json::Error),
}
