//! CFI Builder
//!
//! Generates CFIs from known spine and element positions.

use super::types::*;

/// Raw step of the spine element in an EPUB package document
const SPINE_STEP: u64 = 6;

/// Builder for constructing CFIs programmatically
///
/// Steps added before [`CfiBuilder::indirection`] go to the base component,
/// later ones to the path.
#[derive(Debug, Clone, Default)]
pub struct CfiBuilder {
    base: Segment,
    path: Segment,
    indirected: bool,
}

impl CfiBuilder {
    /// Create a new CFI builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the package spine (`/6`) and the given 0-based spine item
    pub fn spine_item(mut self, index: u32) -> Self {
        self.base = Segment::default();
        self.base.steps.push(Step::from_raw(SPINE_STEP));
        self.base.push(Step::element(index));
        self
    }

    /// Like [`CfiBuilder::spine_item`], with the itemref ID assertion
    pub fn spine_item_with_id(self, index: u32, id: impl Into<String>) -> Self {
        let mut builder = self.spine_item(index);
        if let Some(Some(step)) = builder.base.steps.last_mut() {
            step.id = Some(id.into());
        }
        builder
    }

    /// Step into the content document
    pub fn indirection(mut self) -> Self {
        self.indirected = true;
        self
    }

    /// Add an element step (0-based index among sibling elements)
    pub fn element(self, index: u32) -> Self {
        self.step(Step::element(index))
    }

    /// Add an element step with ID assertion
    pub fn element_with_id(self, index: u32, id: impl Into<String>) -> Self {
        self.step(Step::element(index).with_id(id))
    }

    /// Add a text node step (0-based index among sibling text nodes)
    pub fn text_node(self, index: u32) -> Self {
        self.step(Step::text(index))
    }

    /// Set the character offset within the last node
    pub fn character_offset(mut self, offset: u32) -> Self {
        self.current().set_offset(offset);
        self
    }

    /// Set the character offset with a text location assertion
    pub fn character_offset_with_assertion(
        mut self,
        offset: u32,
        assertion: impl Into<String>,
    ) -> Self {
        self.current().terminal = Terminal {
            offset: Some(offset),
            assertion: Some(assertion.into()),
        };
        self
    }

    /// Build the final CFI
    pub fn build(self) -> Cfi {
        Cfi::new(self.base, self.path)
    }

    fn step(mut self, step: Step) -> Self {
        self.current().push(step);
        self
    }

    fn current(&mut self) -> &mut Segment {
        if self.indirected {
            &mut self.path
        } else {
            &mut self.base
        }
    }
}

/// Base component for a spine item: `/{spine}/{item}[id]`
///
/// `spine_node_index` is the 0-based element index of the spine inside the
/// package element, `pos` the 0-based itemref index.
pub fn chapter_component(spine_node_index: u32, pos: u32, id: Option<&str>) -> String {
    let mut segment = Segment::with_steps([Step::element(spine_node_index)]);
    let mut item = Step::element(pos);
    item.id = id.filter(|id| !id.is_empty()).map(str::to_string);
    segment.push(item);
    segment.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cfi_builder_simple() {
        let cfi = CfiBuilder::new()
            .spine_item(1) // Second spine item -> /4
            .indirection()
            .element(1) // body -> /4
            .element(0) // first child -> /2
            .text_node(0) // first text -> /1
            .character_offset(42)
            .build();

        assert_eq!(cfi.to_string(), "epubcfi(/6/4!/4/2/1:42)");
        assert_eq!(cfi.spine_pos().unwrap(), 1);
    }

    #[test]
    fn test_cfi_builder_with_id() {
        let cfi = CfiBuilder::new()
            .spine_item_with_id(0, "chapter1")
            .indirection()
            .element_with_id(1, "body01")
            .build();

        assert_eq!(cfi.to_string(), "epubcfi(/6/2[chapter1]!/4[body01])");
    }

    #[test]
    fn test_cfi_builder_assertion() {
        let cfi = CfiBuilder::new()
            .spine_item(0)
            .indirection()
            .element(1)
            .text_node(0)
            .character_offset_with_assertion(3, "yes")
            .build();

        assert_eq!(cfi.to_string(), "epubcfi(/6/2!/4/1:3[yes])");
    }

    #[test]
    fn test_spine_index_conversion() {
        let cfi = CfiBuilder::new().spine_item(0).build();
        assert_eq!(cfi.to_string(), "epubcfi(/6/2!/)");

        let cfi = CfiBuilder::new().spine_item(4).build();
        assert_eq!(cfi.to_string(), "epubcfi(/6/10!/)");
    }

    #[test]
    fn test_largest_element_index() {
        let cfi = CfiBuilder::new()
            .spine_item(1)
            .indirection()
            .element(u32::MAX)
            .build();

        let s = cfi.to_string();
        assert_eq!(s, "epubcfi(/6/4!/8589934592)");
        assert_eq!(crate::cfi::parse(&s).unwrap(), cfi);
    }

    #[test]
    fn test_chapter_component() {
        assert_eq!(chapter_component(2, 1, Some("chap01ref")), "/6/4[chap01ref]");
        assert_eq!(chapter_component(2, 0, None), "/6/2");
        assert_eq!(chapter_component(2, 0, Some("")), "/6/2");
    }
}
