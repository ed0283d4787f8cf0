//! Structural classification
//!
//! Walks a [`Wrapper`] tree top-down and re-types every structural child as a
//! [`PatternKind`], storing the result in an index-addressed arena
//! ([`PlanTree`]). Each arena slot keeps its parent and children as
//! [`NodeId`]s; a [`Pattern`] is a cheap `(tree, id)` view over one slot.
//!
//! ## Dispatch
//!
//! ```text
//! tag                                  → result
//! ─────────────────────────────────────────────────────────────────
//! VariableDeclarations, GlobalDeclarations,
//! Interface, NodeList, NodeBody        → transparent (children spliced)
//! #comment, stray #text                → nothing
//! conditions / operators / decls / ... → dedicated variant
//! Node                                 → NodeType hint, then epx hint
//!                                        (kept Sequence → info note)
//! anything else                        → Unrecognized (+ note)
//! ```
//!
//! Classification never fails. Unknown tags degrade to [`PatternKind::Unrecognized`],
//! whose `verify()` fails at render time.

use std::fmt;

use tracing::{trace, warn};

use crate::diagnostics::{scoped_sequence, unrecognized_tag, Diagnostic, SourceLocation};
use crate::pattern::{
    BinaryOperator, ConditionKind, Constant, Function, LookupKind, NodeVariableKind, PatternKind,
};
use crate::raw::{RawNode, COMMENT_NODE, TEXT_NODE};
use crate::wrapper::Wrapper;

/// Attribute selecting the basic node type of a lowered `Node`
pub const NODE_TYPE_HINT: &str = "NodeType";
/// Attribute naming the extended construct a lowered `Node` came from
pub const EXTENDED_HINT: &str = "epx";

/// Quality holding a node's identifier
pub const NODE_ID: &str = "NodeId";

// =============================================================================
// ARENA
// =============================================================================

/// Index of a classified node in its [`PlanTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Slot<'a> {
    kind: PatternKind,
    /// Scalar part of the wrapper; its structural children live in `children`
    wrapper: Wrapper<'a>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A fully classified plan
#[derive(Debug)]
pub struct PlanTree<'a> {
    slots: Vec<Slot<'a>>,
    notes: Vec<Diagnostic>,
}

impl<'a> PlanTree<'a> {
    /// Classify a whole document; the root becomes a [`PatternKind::Plan`]
    pub fn classify(raw: &'a RawNode) -> Self {
        let mut tree = Self {
            slots: Vec::with_capacity(raw.size()),
            notes: Vec::new(),
        };
        tree.insert(PatternKind::Plan, Wrapper::new(raw), None);
        tree
    }

    pub fn root(&self) -> Pattern<'_, 'a> {
        Pattern {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<Pattern<'_, 'a>> {
        (id.0 < self.slots.len()).then_some(Pattern { tree: self, id })
    }

    /// Notes recorded while classifying (unrecognized tags)
    pub fn notes(&self) -> &[Diagnostic] {
        &self.notes
    }

    /// Number of classified nodes, root included
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every node in classification (pre-)order
    pub fn patterns(&self) -> impl Iterator<Item = Pattern<'_, 'a>> + '_ {
        (0..self.slots.len()).map(move |i| Pattern {
            tree: self,
            id: NodeId(i),
        })
    }

    fn slot(&self, id: NodeId) -> &Slot<'a> {
        &self.slots[id.0]
    }

    fn insert(&mut self, kind: PatternKind, mut wrapper: Wrapper<'a>, parent: Option<NodeId>) -> NodeId {
        let structural = wrapper.take_structural();
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            kind,
            wrapper,
            parent,
            children: Vec::new(),
        });

        let mut children = Vec::with_capacity(structural.len());
        for child in structural {
            self.classify_child(id, child, &mut children);
        }
        self.slots[id.0].children = children;
        id
    }

    /// Classify one structural child of `parent`, appending the resulting
    /// variant(s) to `out`. Transparent containers append their own children.
    fn classify_child(&mut self, parent: NodeId, child: Wrapper<'a>, out: &mut Vec<NodeId>) {
        let tag = child.name();
        let kind = match tag {
            COMMENT_NODE | TEXT_NODE => return,
            "VariableDeclarations" | "GlobalDeclarations" | "Interface" | "NodeList"
            | "NodeBody" => {
                return self.splice(parent, child, out);
            }
            "Node" => match node_kind(&child) {
                Some(kind) => {
                    if kind == PatternKind::Node
                        && child.attribute_value(EXTENDED_HINT) == Some("Sequence")
                    {
                        self.notes
                            .push(scoped_sequence(child.quality_value(NODE_ID), child.location()));
                    }
                    kind
                }
                None => return self.splice(parent, child, out),
            },
            _ => match tag_kind(tag) {
                Some(kind) => kind,
                None => {
                    let location = child.location();
                    self.note_unrecognized(tag, location);
                    PatternKind::Unrecognized
                }
            },
        };

        trace!(tag, %kind, "classified");
        out.push(self.insert(kind, child, Some(parent)));
    }

    fn splice(&mut self, parent: NodeId, mut container: Wrapper<'a>, out: &mut Vec<NodeId>) {
        trace!(tag = container.name(), "transparent container");
        for grandchild in container.take_structural() {
            self.classify_child(parent, grandchild, out);
        }
    }

    fn note_unrecognized(&mut self, tag: &str, location: Option<SourceLocation>) {
        warn!(tag, ?location, "unrecognized element, keeping it as passthrough");
        self.notes.push(unrecognized_tag(tag, location));
    }
}

// =============================================================================
// DISPATCH TABLES
// =============================================================================

/// Variant for every tag with a one-to-one mapping
fn tag_kind(tag: &str) -> Option<PatternKind> {
    if let Some(kind) = ConditionKind::from_tag(tag) {
        return Some(PatternKind::Condition(kind));
    }
    if let Some(op) = BinaryOperator::from_tag(tag) {
        return Some(PatternKind::Operator(op));
    }
    if let Some(function) = Function::from_tag(tag) {
        return Some(PatternKind::Function(function));
    }
    if let Some(kind) = LookupKind::from_tag(tag) {
        return Some(PatternKind::Lookup(kind));
    }
    if let Some(kind) = NodeVariableKind::from_tag(tag) {
        return Some(PatternKind::NodeVariable(kind));
    }
    if let Some(constant) = Constant::from_tag(tag) {
        return Some(PatternKind::Constant(constant));
    }

    let kind = match tag {
        // Declarations
        "DeclareVariable" => PatternKind::DeclareVariable,
        "DeclareArray" => PatternKind::DeclareArray,
        "InitialValue" => PatternKind::InitialValue,
        "CommandDeclaration" => PatternKind::CommandDeclaration,
        "StateDeclaration" => PatternKind::StateDeclaration,
        "Parameter" | "AnyParameters" => PatternKind::Parameter,
        "Return" => PatternKind::Return,
        "In" => PatternKind::In,
        "InOut" => PatternKind::InOut,
        "Out" => PatternKind::Out,
        "LibraryNodeDeclaration" => PatternKind::LibraryNodeDeclaration,

        // Statements
        "Assignment" => PatternKind::Assignment,
        "Command" => PatternKind::Command,
        "Name" => PatternKind::Name,
        "Arguments" => PatternKind::Arguments,
        "Update" => PatternKind::Update,
        "Pair" => PatternKind::Pair,
        "LibraryNodeCall" => PatternKind::LibraryNodeCall,
        "Alias" => PatternKind::Alias,

        // Expressions
        "NOT" => PatternKind::Not,
        "NumericRHS" | "BooleanRHS" | "StringRHS" | "ArrayRHS" | "LookupRHS" | "Index"
        | "Tolerance" | "Frequency" | "Low" | "High" => PatternKind::Value,
        "ArrayValue" => PatternKind::ArrayValue,
        "ArrayElement" => PatternKind::ArrayElement,
        "NodeTimepointValue" => PatternKind::NodeTimepoint,

        _ => return None,
    };
    Some(kind)
}

/// Variant for a generic `Node`; `None` means the node is a pure sequencing
/// wrapper whose children belong to the parent
fn node_kind(node: &Wrapper<'_>) -> Option<PatternKind> {
    let hint = node.attribute_value(EXTENDED_HINT);
    match (node.attribute_value(NODE_TYPE_HINT), hint) {
        (Some("Assignment"), None) => Some(PatternKind::AssignmentNode),
        (Some("Command"), None) => Some(PatternKind::CommandNode),
        (Some("Empty"), None) => Some(PatternKind::EmptyNode),
        (_, Some(hint)) => extended_kind(hint, node),
        (_, None) => Some(PatternKind::Node),
    }
}

fn extended_kind(hint: &str, node: &Wrapper<'_>) -> Option<PatternKind> {
    let kind = match hint {
        "Sequence" if is_pure_sequence(node) => return None,
        "Concurrence" => PatternKind::Concurrence,
        "If" => PatternKind::If,
        "Then" => PatternKind::Then,
        "ElseIf" => PatternKind::ElseIf,
        "Else" => PatternKind::Else,
        "While" => PatternKind::While,
        "For" => PatternKind::For,
        "aux" | "Auxiliary" => PatternKind::Auxiliary,
        "LoopVariableUpdate" => PatternKind::LoopVariableUpdate,
        "Try" => PatternKind::Try,
        "Action" => PatternKind::Action,
        "Condition" => PatternKind::ConditionNode,
        _ => PatternKind::Node,
    };
    Some(kind)
}

/// A sequence with no conditions, declarations or priority of its own only
/// groups its children
fn is_pure_sequence(node: &Wrapper<'_>) -> bool {
    if node.has_quality("Priority") {
        return false;
    }
    !node.structural_children().iter().any(|child| match child.name() {
        "VariableDeclarations" | "Interface" => true,
        tag => tag_kind(tag).is_some_and(|kind| kind.is_condition() || kind.is_declaration()),
    })
}

// =============================================================================
// PATTERN VIEW
// =============================================================================

/// A classified node, viewed through its tree
#[derive(Clone, Copy)]
pub struct Pattern<'t, 'a> {
    tree: &'t PlanTree<'a>,
    id: NodeId,
}

impl fmt::Debug for Pattern<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("tag", &self.name())
            .finish()
    }
}

/// An operand in document order: either a scalar quality or a classified child
#[derive(Debug, Clone, Copy)]
pub enum Operand<'t, 'a> {
    Scalar(&'t Wrapper<'a>),
    Node(Pattern<'t, 'a>),
}

impl<'t, 'a> Operand<'t, 'a> {
    pub fn order(&self) -> usize {
        match self {
            Operand::Scalar(quality) => quality.order(),
            Operand::Node(pattern) => pattern.order(),
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Operand::Scalar(quality) => quality.name(),
            Operand::Node(pattern) => pattern.name(),
        }
    }

    pub fn as_node(&self) -> Option<Pattern<'t, 'a>> {
        match self {
            Operand::Node(pattern) => Some(*pattern),
            Operand::Scalar(_) => None,
        }
    }
}

impl<'t, 'a> Pattern<'t, 'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t PlanTree<'a> {
        self.tree
    }

    pub fn kind(&self) -> PatternKind {
        self.tree.slot(self.id).kind
    }

    /// Scalar part of the wrapper (name, value, qualities, attributes)
    pub fn wrapper(&self) -> &'t Wrapper<'a> {
        &self.tree.slot(self.id).wrapper
    }

    pub fn name(&self) -> &'a str {
        self.wrapper().name()
    }

    pub fn value(&self) -> Option<&'a str> {
        self.wrapper().value()
    }

    pub fn order(&self) -> usize {
        self.wrapper().order()
    }

    pub fn depth(&self) -> usize {
        self.wrapper().depth()
    }

    pub fn location(&self) -> Option<SourceLocation> {
        self.wrapper().location()
    }

    // =========================================================================
    // ATTRIBUTES & QUALITIES
    // =========================================================================

    pub fn attribute(&self, name: &str) -> Option<&'t Wrapper<'a>> {
        self.wrapper().attribute(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.wrapper().has_attribute(name)
    }

    pub fn quality(&self, name: &str) -> Option<&'t Wrapper<'a>> {
        self.wrapper().quality(name)
    }

    pub fn has_quality(&self, name: &str) -> bool {
        self.wrapper().has_quality(name)
    }

    pub fn quality_value(&self, name: &str) -> Option<&'a str> {
        self.wrapper().quality_value(name)
    }

    /// The node's `NodeId` quality
    pub fn node_id(&self) -> Option<&'a str> {
        self.quality_value(NODE_ID)
    }

    // =========================================================================
    // TREE NAVIGATION
    // =========================================================================

    pub fn parent(&self) -> Option<Pattern<'t, 'a>> {
        self.tree.slot(self.id).parent.map(|id| Pattern {
            tree: self.tree,
            id,
        })
    }

    /// Is the classified parent the document root?
    pub fn is_top_level(&self) -> bool {
        self.parent()
            .is_some_and(|parent| parent.kind() == PatternKind::Plan)
    }

    pub fn children(&self) -> impl Iterator<Item = Pattern<'t, 'a>> + 't {
        let tree = self.tree;
        tree.slot(self.id)
            .children
            .iter()
            .map(move |&id| Pattern { tree, id })
    }

    pub fn child_count(&self) -> usize {
        self.tree.slot(self.id).children.len()
    }

    pub fn child_of_kind(&self, kind: PatternKind) -> Option<Pattern<'t, 'a>> {
        self.children().find(|child| child.kind() == kind)
    }

    pub fn children_of_kind(&self, kind: PatternKind) -> Vec<Pattern<'t, 'a>> {
        self.children().filter(|child| child.kind() == kind).collect()
    }

    pub fn has_child_of_kind(&self, kind: PatternKind) -> bool {
        self.child_of_kind(kind).is_some()
    }

    pub fn condition(&self, kind: ConditionKind) -> Option<Pattern<'t, 'a>> {
        self.child_of_kind(PatternKind::Condition(kind))
    }

    /// Qualities and classified children merged back into document order
    pub fn operands(&self) -> Vec<Operand<'t, 'a>> {
        let mut operands: Vec<Operand<'t, 'a>> = self
            .wrapper()
            .qualities()
            .iter()
            .map(Operand::Scalar)
            .chain(self.children().map(Operand::Node))
            .collect();
        operands.sort_by_key(Operand::order);
        operands
    }
}
