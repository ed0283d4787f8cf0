//! Decompilation driver
//!
//! `decompile` is the single recursive entry point every construct goes
//! through: check the structural precondition, apply the strict/force policy,
//! then render.
//!
//! ```text
//! verify() ──true──────────────────────────────┐
//!    │                                         ▼
//!  false ──strict──▶ Err(DecompileError)    render(indent)
//!    │                                         ▲
//!    └────force───▶ warn!, continue ───────────┘
//! ```

use crate::classify::Pattern;
use crate::config::DecompileOptions;
use crate::diagnostics::DecompileError;
use crate::pattern::{ConditionKind, PatternKind};
use crate::render::{
    command_name_present, condition_expression_source, for_parts, is_node_reference,
};

/// Quality naming the node referenced by a node variable or timepoint
pub const NODE_REF: &str = "NodeRef";

impl<'t, 'a> Pattern<'t, 'a> {
    /// Structural precondition of this construct
    pub fn verify(&self) -> bool {
        match self.kind() {
            PatternKind::Plan
            | PatternKind::Node
            | PatternKind::EmptyNode
            | PatternKind::AssignmentNode
            | PatternKind::Then
            | PatternKind::Else
            | PatternKind::Action
            | PatternKind::Try
            | PatternKind::Concurrence
            | PatternKind::ArrayValue
            | PatternKind::In
            | PatternKind::InOut
            | PatternKind::Out
            | PatternKind::Constant(_) => true,

            PatternKind::Unrecognized => false,

            PatternKind::CommandNode => self.has_child_of_kind(PatternKind::Command),

            PatternKind::If => self
                .child_of_kind(PatternKind::Then)
                .is_some_and(|then| then.condition(ConditionKind::Start).is_some()),
            PatternKind::ElseIf => self.condition(ConditionKind::Start).is_some(),
            PatternKind::While => self.condition(ConditionKind::Repeat).is_some(),
            PatternKind::For => for_parts(self).is_some(),
            PatternKind::Auxiliary => {
                self.condition(ConditionKind::Skip).is_some()
                    && self.has_child_of_kind(PatternKind::LoopVariableUpdate)
            }
            PatternKind::LoopVariableUpdate => self.has_child_of_kind(PatternKind::Assignment),
            PatternKind::ConditionNode => {
                self.node_id().is_some() && condition_expression_source(self).is_some()
            }

            PatternKind::Condition(_) => self.operands().len() == 1,

            PatternKind::DeclareVariable | PatternKind::DeclareArray => {
                self.has_quality("Type") && self.has_quality("Name")
            }
            PatternKind::InitialValue => !self.operands().is_empty(),
            PatternKind::CommandDeclaration => self.has_quality("Name"),
            PatternKind::StateDeclaration => {
                self.has_quality("Name") && self.has_child_of_kind(PatternKind::Return)
            }
            PatternKind::Parameter => {
                self.name() == "AnyParameters" || self.has_quality("Type")
            }
            PatternKind::Return => self.has_quality("Type"),
            PatternKind::LibraryNodeDeclaration => self.has_quality("Name"),

            PatternKind::Assignment => {
                (1..=2).contains(&self.child_count()) && self.operands().len() == 2
            }
            PatternKind::Command => {
                command_name_present(self)
                    && self.children().all(|child| {
                        matches!(
                            child.kind(),
                            PatternKind::Name | PatternKind::Arguments | PatternKind::ArrayElement
                        )
                    })
            }
            PatternKind::Name => self.operands().len() == 1,
            PatternKind::Arguments => true,
            PatternKind::Update => self
                .children()
                .all(|child| child.kind() == PatternKind::Pair),
            PatternKind::Pair => self.has_quality("Name") && self.operands().len() == 2,
            PatternKind::LibraryNodeCall => self.node_id().is_some(),
            PatternKind::Alias => {
                self.has_quality("NodeParameter") && self.operands().len() == 2
            }

            PatternKind::Value if self.name() == "Frequency" => {
                (1..=2).contains(&self.operands().len())
            }
            PatternKind::Value => self.operands().len() == 1,
            PatternKind::ArrayElement => self.has_child_of_kind(PatternKind::Value),
            PatternKind::Operator(op) => {
                let count = self.operands().len();
                if op.is_variadic() {
                    count >= 2
                } else {
                    count == 2
                }
            }
            PatternKind::Not => self.operands().len() == 1,
            PatternKind::Function(function) => {
                let count = self.operands().len();
                match function.arity() {
                    Some(arity) => count == arity,
                    None => count >= 1,
                }
            }
            PatternKind::Lookup(_) => self.child_of_kind(PatternKind::Name).is_some(),
            PatternKind::NodeVariable(_) => self.referenced_node().is_some(),
            PatternKind::NodeTimepoint => {
                self.referenced_node().is_some()
                    && self.has_quality("NodeStateValue")
                    && self.has_quality("Timepoint")
            }
        }
    }

    /// `verify()` as a typed outcome
    pub fn recognize(&self) -> Result<(), DecompileError> {
        if self.verify() {
            return Ok(());
        }

        let tag = self.name().to_string();
        let location = self.location();
        Err(match self.kind() {
            PatternKind::Unrecognized => DecompileError::UnrecognizedElement { tag, location },
            kind => DecompileError::PatternRecognition {
                kind,
                tag,
                location,
            },
        })
    }

    /// Reconstruct source text for this construct at `indent` levels.
    ///
    /// In strict mode the first construct (in render order) whose
    /// precondition fails aborts the whole call.
    pub fn decompile(
        &self,
        indent: usize,
        options: &DecompileOptions,
    ) -> Result<String, DecompileError> {
        options.tolerate(self.recognize())?;
        self.render(indent, options)
    }

    /// Identifier of the node a node variable points at (`NodeRef` or `NodeId`)
    pub fn referenced_node(&self) -> Option<&'a str> {
        self.quality_value(NODE_REF).or_else(|| self.node_id())
    }

    /// Does this condition consist of nothing but a reference to another node?
    pub fn is_bare_reference(&self) -> bool {
        self.kind().is_condition() && is_node_reference(self)
    }

    /// Node a bare-reference condition points at
    pub fn reference_target(&self) -> Option<&'a str> {
        if !self.is_bare_reference() {
            return None;
        }
        self.quality_value(NODE_REF).or_else(|| self.node_id())
    }
}
