//! Raw tree nodes
//!
//! The parsed form of a lowered plan document: named nodes with an optional
//! text value, ordered children and named attributes. Text content is kept as
//! `#text` leaf children so a simple property element like
//! `<NodeId>Root</NodeId>` is a node with exactly one text leaf.
//!
//! Nothing in this crate mutates a `RawNode` once it has been built.

use std::collections::BTreeMap;

/// Name given to text leaves
pub const TEXT_NODE: &str = "#text";

/// Name given to comment nodes (providers may keep them; the classifier skips them)
pub const COMMENT_NODE: &str = "#comment";

/// A node of the parsed document tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawNode {
    pub name: String,
    pub value: Option<String>,
    pub children: Vec<RawNode>,
    pub attributes: BTreeMap<String, RawNode>,
}

impl RawNode {
    /// Create an element node with no children or attributes
    pub fn element(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a text leaf
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            name: TEXT_NODE.to_string(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Create an element holding a single text leaf: `<Name>value</Name>`
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::element(name).with_child(Self::text(value))
    }

    /// Append a child
    pub fn with_child(mut self, child: RawNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    pub fn with_children(mut self, children: impl IntoIterator<Item = RawNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set an attribute; attribute nodes carry the value and have no children
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let node = RawNode {
            name: name.clone(),
            value: Some(value.into()),
            ..RawNode::default()
        };
        self.attributes.insert(name, node);
        self
    }

    /// Is this a text leaf?
    pub fn is_text(&self) -> bool {
        self.name == TEXT_NODE && self.children.is_empty()
    }

    /// Does this node hold exactly one child, and is that child a text leaf?
    pub fn is_text_only(&self) -> bool {
        matches!(self.children.as_slice(), [only] if only.is_text())
    }

    pub fn attribute(&self, name: &str) -> Option<&RawNode> {
        self.attributes.get(name)
    }

    /// Total number of nodes in this subtree (attributes excluded)
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(RawNode::size).sum::<usize>()
    }
}
