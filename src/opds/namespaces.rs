//! XML namespace table
//!
//! Schemas name namespaces by prefix; the table maps each prefix to its URI.
//! The table is built once and handed to the mapper explicitly.

use std::collections::HashMap;

/// Well-known namespace URIs
pub mod ns {
    pub const ATOM: &str = "http://www.w3.org/2005/Atom";
    pub const OPDS: &str = "http://opds-spec.org/2010/catalog";
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    pub const OPENSEARCH: &str = "http://a9.com/-/spec/opensearch/1.1/";
    pub const THREAD: &str = "http://purl.org/syndication/thread/1.0";
    pub const XHTML: &str = "http://www.w3.org/1999/xhtml";
    pub const PSE: &str = "http://vaemendis.net/opds-pse/ns";
    pub const SCHEMA: &str = "http://schema.org/";
}

/// Read-only prefix → URI table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    uris: HashMap<String, String>,
}

impl Default for Namespaces {
    fn default() -> Self {
        let uris = [
            ("atom", ns::ATOM),
            ("opds", ns::OPDS),
            ("dc", ns::DC),
            ("dcterms", ns::DCTERMS),
            ("opensearch", ns::OPENSEARCH),
            ("thr", ns::THREAD),
            ("xhtml", ns::XHTML),
            ("pse", ns::PSE),
            ("schema", ns::SCHEMA),
        ]
        .into_iter()
        .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
        .collect();

        Self { uris }
    }
}

impl Namespaces {
    /// An empty table
    pub fn empty() -> Self {
        Self {
            uris: HashMap::new(),
        }
    }

    /// Add or replace a prefix
    pub fn with(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.uris.insert(prefix.into(), uri.into());
        self
    }

    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.uris.get(prefix).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}
