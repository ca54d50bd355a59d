//! CFI construction from live content documents
//!
//! A CFI can be built from its string form, from an existing value, or from
//! positions inside a parsed XHTML document. Document positions need the
//! base component of the spine item they belong to (e.g. `/6/4[chap01ref]`).

use roxmltree::{Document, Node};

use super::parser::parse_segment;
use super::types::*;
use super::CfiError;

/// A boundary point inside a document: a node and a character offset
#[derive(Debug, Clone, Copy)]
pub struct DomPoint<'a, 'input> {
    pub node: Node<'a, 'input>,
    pub offset: Option<u32>,
}

/// A selection between two boundary points of the same document
#[derive(Debug, Clone, Copy)]
pub struct DomRange<'a, 'input> {
    pub start: DomPoint<'a, 'input>,
    pub end: DomPoint<'a, 'input>,
}

/// Everything a CFI can be constructed from
#[derive(Debug, Clone, Copy)]
pub enum CfiSource<'a, 'input> {
    Text(&'a str),
    DomRange(DomRange<'a, 'input>),
    DomNode(DomPoint<'a, 'input>),
    Existing(&'a Cfi),
}

impl<'a, 'input> DomPoint<'a, 'input> {
    pub fn new(node: Node<'a, 'input>, offset: u32) -> Self {
        Self {
            node,
            offset: Some(offset),
        }
    }

    pub fn node(node: Node<'a, 'input>) -> Self {
        Self { node, offset: None }
    }
}

impl Cfi {
    /// Construct a CFI from any supported source.
    ///
    /// `base` is the base component and is required for document sources.
    pub fn from_source(source: CfiSource<'_, '_>, base: Option<&str>) -> Result<Cfi, CfiError> {
        match source {
            CfiSource::Text(s) => super::parser::parse(s),
            CfiSource::Existing(cfi) => Ok(cfi.clone()),
            CfiSource::DomNode(point) => {
                let base = base_segment(base)?;
                Ok(Cfi::new(base, point_segment(point)?))
            }
            CfiSource::DomRange(range) => {
                if !std::ptr::eq(range.start.node.document(), range.end.node.document()) {
                    return Err(CfiError::InvalidArgument(
                        "range boundaries belong to different documents".to_string(),
                    ));
                }
                let base = base_segment(base)?;
                let start = point_segment(range.start)?;
                let end = point_segment(range.end)?;
                Ok(Cfi::spanning(base, start, end))
            }
        }
    }

    /// Find the node addressed by this CFI's path inside `doc`.
    ///
    /// Ranges resolve to their start. Returns `None` when a step points
    /// past the available children.
    pub fn resolve<'a, 'input>(&self, doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
        let target = self.range_start();
        let mut current = doc.root_element();
        for step in &target.path.steps {
            let step = step.as_ref()?;
            current = current
                .children()
                .filter(|n| matches_kind(n, step.kind))
                .nth(step.index as usize)?;
        }
        Some(current)
    }
}

fn base_segment(base: Option<&str>) -> Result<Segment, CfiError> {
    let base = base.ok_or_else(|| {
        CfiError::InvalidArgument("document positions need a base component".to_string())
    })?;
    let segment = parse_segment(base);
    if segment.steps.is_empty() || !segment.is_well_formed() {
        return Err(CfiError::Malformed(format!("unreadable base component {base:?}")));
    }
    Ok(segment)
}

/// Steps from the document element (exclusive) down to the point's node
fn point_segment(point: DomPoint<'_, '_>) -> Result<Segment, CfiError> {
    let mut steps = Vec::new();
    let mut current = point.node;
    while let Some(parent) = current.parent() {
        if parent.is_root() {
            break;
        }
        steps.push(Some(step_of(current, parent)?));
        current = parent;
    }
    steps.reverse();

    Ok(Segment {
        steps,
        terminal: Terminal {
            offset: point.offset,
            assertion: None,
        },
    })
}

fn step_of(node: Node<'_, '_>, parent: Node<'_, '_>) -> Result<Step, CfiError> {
    let kind = if node.is_element() {
        StepKind::Element
    } else if node.is_text() {
        StepKind::Text
    } else {
        return Err(CfiError::InvalidArgument(format!(
            "cannot address {:?} node",
            node.node_type()
        )));
    };

    let position = parent
        .children()
        .filter(|n| matches_kind(n, kind))
        .position(|n| n == node)
        .ok_or_else(|| {
            CfiError::InvalidArgument("node is not a child of its parent".to_string())
        })?;
    let index = u32::try_from(position).map_err(|_| {
        CfiError::InvalidArgument(format!("sibling position {position} out of range"))
    })?;

    Ok(Step {
        kind,
        index,
        id: node.attribute("id").map(str::to_string),
    })
}

fn matches_kind(node: &Node<'_, '_>, kind: StepKind) -> bool {
    match kind {
        StepKind::Element => node.is_element(),
        StepKind::Text => node.is_text(),
    }
}
