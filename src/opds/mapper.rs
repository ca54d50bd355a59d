//! Schema-driven XML to JSON mapping
//!
//! Walks an element tree with a [`Schema`] and produces a
//! [`serde_json::Value`]. Fields without a matching child element are left out
//! of the resulting object rather than set to null or an empty array.

use roxmltree::{Document, Node};
use serde_json::{Map, Value};

use super::namespaces::Namespaces;
use super::schema::{NsSpec, Schema, Transform};
use super::MapError;

/// Maps elements according to schemas, resolving namespace prefixes
/// through a fixed table
#[derive(Debug, Clone, Copy)]
pub struct Mapper<'a> {
    namespaces: &'a Namespaces,
}

impl<'a> Mapper<'a> {
    pub fn new(namespaces: &'a Namespaces) -> Self {
        Self { namespaces }
    }

    pub fn namespaces(&self) -> &'a Namespaces {
        self.namespaces
    }

    /// Parse `xml` and map its root element.
    ///
    /// The root element must match the schema's tag and namespace.
    pub fn map_document(&self, xml: &str, schema: &Schema) -> Result<Value, MapError> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();

        if !self.element_matches(root, schema) {
            return Err(MapError::UnexpectedRoot {
                expected: schema.tag.clone(),
                found: root.tag_name().name().to_string(),
            });
        }

        tracing::debug!(root = schema.tag.as_str(), "Mapping XML document");
        Ok(self.map(root, schema).unwrap_or(Value::Null))
    }

    /// Map one element through a schema
    pub fn map(&self, node: Node<'_, '_>, schema: &Schema) -> Option<Value> {
        self.map_node(node, schema, None)
    }

    /// `self_field` carries the name under which a recursive schema
    /// re-applies to its own descendants
    fn map_node(&self, node: Node<'_, '_>, schema: &Schema, self_field: Option<&str>) -> Option<Value> {
        if let Some(manual) = schema.manual {
            return manual(node, self.namespaces);
        }

        if schema.is_leaf() {
            return schema
                .transform
                .unwrap_or_default()
                .apply(&text_content(node));
        }

        let mut obj = Map::new();

        if let Some(content) = schema.content {
            if let Some(value) = content.apply(&text_content(node)) {
                obj.insert("content".to_string(), value);
            }
        }

        for (name, attr) in &schema.attrs {
            let transform = attr.transform.unwrap_or_default();
            let value = self
                .candidates(attr.ns.as_ref())
                .into_iter()
                .find_map(|uri| {
                    let raw = match uri {
                        Some(uri) => node.attribute((uri, name.as_str())),
                        None => node.attribute(name.as_str()),
                    };
                    raw.and_then(|raw| transform.apply(raw))
                });
            if let Some(value) = value {
                obj.insert(name.clone(), value);
            }
        }

        let inherited = self_field
            .filter(|name| !schema.fields.iter().any(|(n, _)| n.as_str() == *name))
            .map(|name| (name, schema));
        let fields = schema
            .fields
            .iter()
            .map(|(name, field)| (name.as_str(), field))
            .chain(inherited);

        for (name, field) in fields {
            let children = self.matching_children(node, field);
            if children.is_empty() {
                continue;
            }

            let self_field = field.recursive.then_some(name);
            let mut values = children
                .into_iter()
                .filter_map(|child| self.map_node(child, field, self_field));

            let value = if field.array {
                Value::Array(values.collect())
            } else {
                match values.next() {
                    Some(value) => value,
                    None => continue,
                }
            };
            tracing::trace!(field = name, "Mapped field");
            obj.insert(name.to_string(), value);
        }

        Some(Value::Object(obj))
    }

    /// Direct element children matching the schema; with several candidate
    /// namespaces the first non-empty match set wins
    fn matching_children<'d, 'i>(&self, node: Node<'d, 'i>, schema: &Schema) -> Vec<Node<'d, 'i>> {
        for uri in self.candidates(schema.ns.as_ref()) {
            let matched: Vec<_> = node
                .children()
                .filter(|child| {
                    child.is_element()
                        && child.tag_name().name() == schema.tag
                        && uri.map_or(true, |uri| child.tag_name().namespace() == Some(uri))
                })
                .collect();
            if !matched.is_empty() {
                return matched;
            }
        }
        Vec::new()
    }

    fn element_matches(&self, node: Node<'_, '_>, schema: &Schema) -> bool {
        node.tag_name().name() == schema.tag
            && self
                .candidates(schema.ns.as_ref())
                .into_iter()
                .any(|uri| uri.map_or(true, |uri| node.tag_name().namespace() == Some(uri)))
    }

    /// Namespace URIs to try, in order. `None` means "no constraint" for
    /// elements and "no namespace" for attributes.
    fn candidates(&self, ns: Option<&NsSpec>) -> Vec<Option<&'a str>> {
        let Some(ns) = ns else {
            return vec![None];
        };

        ns.prefixes()
            .iter()
            .filter_map(|prefix| {
                let uri = self.namespaces.uri(prefix);
                if uri.is_none() {
                    tracing::debug!(prefix = prefix.as_str(), "Unknown namespace prefix in schema");
                }
                uri.map(Some)
            })
            .collect()
    }
}

/// Concatenated text of all descendant text nodes
pub fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Trim helper for manual mappers
pub fn trimmed(node: Node<'_, '_>) -> Option<Value> {
    Transform::Trim.apply(&text_content(node))
}
