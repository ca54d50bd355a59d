//! Declarative XML mapping schemas
//!
//! A schema node names the element it matches and describes what to pull out
//! of it: attributes, child fields (themselves schemas) and text content.
//! A field marked `recursive` also applies to same-named descendants, so
//! nested structures such as OPDS indirect acquisitions map to nested
//! objects without spelling out every level.

use roxmltree::Node;
use serde_json::Value;

use super::namespaces::Namespaces;

/// Namespace requirement of an element or attribute, by table prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NsSpec {
    One(String),
    /// Candidates tried in order; the first that yields a match wins
    AnyOf(Vec<String>),
}

/// Conversion of raw text into a JSON value
#[derive(Debug, Clone, Copy, Default)]
pub enum Transform {
    /// Trimmed string; empty text yields nothing
    #[default]
    Trim,
    /// Untouched string
    Raw,
    Integer,
    Number,
    /// `true` when the text is `"true"`
    Flag,
    Custom(fn(&str) -> Option<Value>),
}

/// Hand-written mapping of a whole element, bypassing the schema walk
pub type Manual = for<'a, 'input> fn(Node<'a, 'input>, &Namespaces) -> Option<Value>;

/// How to read one attribute
#[derive(Debug, Clone, Default)]
pub struct AttrSchema {
    pub ns: Option<NsSpec>,
    pub transform: Option<Transform>,
}

/// One schema node
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Local name of the matched element
    pub tag: String,
    /// Keep every match instead of the first
    pub array: bool,
    pub ns: Option<NsSpec>,
    pub attrs: Vec<(String, AttrSchema)>,
    pub fields: Vec<(String, Schema)>,
    pub manual: Option<Manual>,
    /// Applied to the text of a leaf element
    pub transform: Option<Transform>,
    pub recursive: bool,
    /// Applied to the element's own text, stored under `content`
    pub content: Option<Transform>,
}

impl Transform {
    pub fn apply(&self, text: &str) -> Option<Value> {
        match self {
            Transform::Trim => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| Value::String(trimmed.to_string()))
            }
            Transform::Raw => Some(Value::String(text.to_string())),
            Transform::Integer => text.trim().parse::<i64>().ok().map(Value::from),
            Transform::Number => text
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            Transform::Flag => Some(Value::Bool(text.trim() == "true")),
            Transform::Custom(f) => f(text),
        }
    }
}

impl NsSpec {
    pub fn one(prefix: impl Into<String>) -> Self {
        NsSpec::One(prefix.into())
    }

    pub fn any_of<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NsSpec::AnyOf(prefixes.into_iter().map(Into::into).collect())
    }

    pub fn prefixes(&self) -> &[String] {
        match self {
            NsSpec::One(prefix) => std::slice::from_ref(prefix),
            NsSpec::AnyOf(prefixes) => prefixes,
        }
    }
}

impl AttrSchema {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn ns(mut self, ns: NsSpec) -> Self {
        self.ns = Some(ns);
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }
}

impl Schema {
    /// Schema matching elements with the given local name
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    pub fn ns(mut self, ns: NsSpec) -> Self {
        self.ns = Some(ns);
        self
    }

    /// Read an attribute in no namespace as a trimmed string
    pub fn attr(self, name: impl Into<String>) -> Self {
        self.attr_with(name, AttrSchema::plain())
    }

    pub fn attr_with(mut self, name: impl Into<String>, attr: AttrSchema) -> Self {
        self.attrs.push((name.into(), attr));
        self
    }

    pub fn field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.fields.push((name.into(), schema));
        self
    }

    pub fn manual(mut self, manual: Manual) -> Self {
        self.manual = Some(manual);
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    pub fn content(mut self, transform: Transform) -> Self {
        self.content = Some(transform);
        self
    }

    /// No attributes, fields or content: maps to a scalar
    pub fn is_leaf(&self) -> bool {
        self.attrs.is_empty() && self.fields.is_empty() && self.content.is_none() && !self.recursive
    }
}
