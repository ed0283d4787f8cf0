//! Generic wrapper over a raw node
//!
//! A [`Wrapper`] splits the children of a [`RawNode`] once, at construction,
//! into two disjoint ordered groups:
//!
//! - **qualities**: children holding exactly one text leaf (`<NodeId>Root</NodeId>`,
//!   `<Type>Integer</Type>`, `<IntegerValue>3</IntegerValue>`). These are named scalars.
//! - **structural children**: everything else. This is the tree the classifier
//!   walks.
//!
//! Every child keeps its sibling position in `order`, so the two groups can be
//! merged back into document order when a construct needs its operands in
//! sequence.

use std::collections::BTreeMap;

use crate::diagnostics::SourceLocation;
use crate::raw::RawNode;

/// Attribute carrying the source line of a lowered node
pub const LINE_HINT: &str = "LineNo";
/// Attribute carrying the source column of a lowered node
pub const COLUMN_HINT: &str = "ColNo";

#[derive(Debug, Clone)]
pub struct Wrapper<'a> {
    raw: &'a RawNode,
    order: usize,
    depth: usize,
    qualities: Vec<Wrapper<'a>>,
    structural: Vec<Wrapper<'a>>,
    attributes: BTreeMap<&'a str, Wrapper<'a>>,
}

impl<'a> Wrapper<'a> {
    /// Wrap a document root (depth 0, order 0)
    pub fn new(raw: &'a RawNode) -> Self {
        Self::build(raw, 0, 0)
    }

    fn build(raw: &'a RawNode, order: usize, depth: usize) -> Self {
        let mut qualities = Vec::new();
        let mut structural = Vec::new();

        for (position, child) in raw.children.iter().enumerate() {
            let wrapped = Self::build(child, position, depth + 1);
            if child.is_text_only() {
                qualities.push(wrapped);
            } else {
                structural.push(wrapped);
            }
        }

        let attributes = raw
            .attributes
            .iter()
            .map(|(name, node)| (name.as_str(), Self::build(node, 0, depth + 1)))
            .collect();

        Self {
            raw,
            order,
            depth,
            qualities,
            structural,
            attributes,
        }
    }

    pub fn raw(&self) -> &'a RawNode {
        self.raw
    }

    pub fn name(&self) -> &'a str {
        &self.raw.name
    }

    /// Text value; for a quality this is the text of its single leaf
    pub fn value(&self) -> Option<&'a str> {
        if self.raw.is_text_only() {
            return self.raw.children[0].value.as_deref();
        }
        self.raw.value.as_deref()
    }

    /// Position among the raw siblings at construction time
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Is this wrapper itself a quality (a single-text-leaf element)?
    pub fn is_quality(&self) -> bool {
        self.raw.is_text_only()
    }

    pub fn qualities(&self) -> &[Wrapper<'a>] {
        &self.qualities
    }

    pub fn structural_children(&self) -> &[Wrapper<'a>] {
        &self.structural
    }

    pub fn attribute(&self, name: &str) -> Option<&Wrapper<'a>> {
        self.attributes.get(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Value of an attribute, if present
    pub fn attribute_value(&self, name: &str) -> Option<&'a str> {
        self.attribute(name).and_then(Wrapper::value)
    }

    pub fn quality(&self, name: &str) -> Option<&Wrapper<'a>> {
        self.qualities.iter().find(|q| q.name() == name)
    }

    pub fn has_quality(&self, name: &str) -> bool {
        self.quality(name).is_some()
    }

    /// Value of a quality, if present
    pub fn quality_value(&self, name: &str) -> Option<&'a str> {
        self.quality(name).and_then(Wrapper::value)
    }

    /// Source position from the `LineNo`/`ColNo` hints, if present
    pub fn location(&self) -> Option<SourceLocation> {
        SourceLocation::from_hints(
            self.attribute_value(LINE_HINT),
            self.attribute_value(COLUMN_HINT),
        )
    }

    /// Detach the structural children, leaving the scalar part of the wrapper.
    /// The classifier takes ownership of the structural tree this way.
    pub(crate) fn take_structural(&mut self) -> Vec<Wrapper<'a>> {
        std::mem::take(&mut self.structural)
    }
}
