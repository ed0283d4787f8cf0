//! Per-construct rendering
//!
//! `render` is only reached through [`Pattern::decompile`], after the
//! construct's precondition has been checked (or waived in force mode).
//! Statement-like constructs emit whole lines prefixed with the indent for
//! their level; expression constructs ignore the indent and return inline text.
//!
//! Layout shared by every block construct:
//!
//! ```text
//! <pad>Header {
//! <pad+1>statement
//! <pad+1>statement
//! <pad>}
//! ```

mod control;
mod declarations;
mod expressions;
mod statements;

use crate::classify::{Operand, Pattern};
use crate::config::DecompileOptions;
use crate::diagnostics::DecompileError;
use crate::pattern::PatternKind;

pub(crate) use control::{condition_expression_source, for_parts};
pub(crate) use expressions::is_node_reference;
pub(crate) use statements::command_name_present;

pub use expressions::scalar;

pub(crate) type RenderResult = Result<String, DecompileError>;

/// Stand-in for a piece a construct needs but does not have (force mode only)
pub const MISSING: &str = "<?>";

impl<'t, 'a> Pattern<'t, 'a> {
    pub(crate) fn render(&self, indent: usize, options: &DecompileOptions) -> RenderResult {
        match self.kind() {
            PatternKind::Plan => control::plan(self, indent, options),
            PatternKind::Node => control::node(self, indent, options),
            PatternKind::Unrecognized => Ok(format!(
                "{}// unrecognized element <{}>",
                options.indent(indent),
                self.name()
            )),
            PatternKind::CommandNode => control::command_node(self, indent, options),
            PatternKind::AssignmentNode => control::assignment_node(self, indent, options),
            PatternKind::EmptyNode => control::labeled_block(self, None, indent, options),
            PatternKind::If => control::if_block(self, indent, options),
            PatternKind::Then | PatternKind::ElseIf | PatternKind::Else => {
                control::branch_body(self, indent, options)
            }
            PatternKind::While => control::while_loop(self, indent, options),
            PatternKind::For => control::for_loop(self, indent, options),
            PatternKind::Action | PatternKind::Auxiliary => {
                control::loop_body(self, indent, options)
            }
            PatternKind::LoopVariableUpdate => control::loop_variable_update(self, indent, options),
            PatternKind::Try => control::labeled_block(self, Some("Try"), indent, options),
            PatternKind::Concurrence => control::concurrence(self, indent, options),
            PatternKind::ConditionNode => control::condition_node(self, indent, options),
            PatternKind::Condition(_) => control::condition(self, indent, options),

            PatternKind::DeclareVariable => declarations::variable(self, indent, options),
            PatternKind::DeclareArray => declarations::array(self, indent, options),
            PatternKind::InitialValue => declarations::initial_value(self, options),
            PatternKind::CommandDeclaration => declarations::command(self, indent, options),
            PatternKind::StateDeclaration => declarations::state(self, indent, options),
            PatternKind::Parameter => Ok(declarations::parameter(self)),
            PatternKind::Return => Ok(self.quality_value("Type").unwrap_or(MISSING).to_string()),
            PatternKind::In => declarations::interface(self, "In", indent, options),
            PatternKind::InOut => declarations::interface(self, "InOut", indent, options),
            PatternKind::Out => declarations::interface(self, "Out", indent, options),
            PatternKind::LibraryNodeDeclaration => declarations::library(self, indent, options),

            PatternKind::Assignment => statements::assignment(self, indent, options),
            PatternKind::Command => statements::command(self, indent, options),
            PatternKind::Name => statements::name(self, options),
            PatternKind::Arguments => statements::arguments(self, options),
            PatternKind::Update => statements::update(self, indent, options),
            PatternKind::Pair => statements::pair(self, "Name", options),
            PatternKind::LibraryNodeCall => statements::library_call(self, indent, options),
            PatternKind::Alias => statements::pair(self, "NodeParameter", options),

            PatternKind::Value => expressions::value(self, options),
            PatternKind::ArrayValue => expressions::array_value(self, options),
            PatternKind::ArrayElement => expressions::array_element(self, options),
            PatternKind::Operator(op) => expressions::operator(self, op, options),
            PatternKind::Not => expressions::not(self, options),
            PatternKind::Function(function) => expressions::function(self, function, options),
            PatternKind::Lookup(kind) => expressions::lookup(self, kind, options),
            PatternKind::NodeVariable(kind) => Ok(format!(
                "{}.{}",
                self.referenced_node().unwrap_or(MISSING),
                kind.suffix()
            )),
            PatternKind::NodeTimepoint => Ok(format!(
                "{}.{}.{}",
                self.referenced_node().unwrap_or(MISSING),
                self.quality_value("NodeStateValue").unwrap_or(MISSING),
                self.quality_value("Timepoint").unwrap_or(MISSING)
            )),
            PatternKind::Constant(constant) => Ok(constant.literal().to_string()),
        }
    }
}

// =============================================================================
// SHARED HELPERS
// =============================================================================

/// Render one operand inline
pub(crate) fn operand(operand: &Operand<'_, '_>, options: &DecompileOptions) -> RenderResult {
    match operand {
        Operand::Scalar(quality) => Ok(scalar(quality)),
        Operand::Node(pattern) => pattern.decompile(0, options),
    }
}

/// Render an optional operand, substituting [`MISSING`]
fn operand_or_missing(
    operand_ref: Option<&Operand<'_, '_>>,
    options: &DecompileOptions,
) -> RenderResult {
    match operand_ref {
        Some(op) => operand(op, options),
        None => Ok(MISSING.to_string()),
    }
}

/// Render operands inline and join them
fn join_operands(
    operands: &[Operand<'_, '_>],
    separator: &str,
    options: &DecompileOptions,
) -> RenderResult {
    let rendered = operands
        .iter()
        .map(|op| operand(op, options))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join(separator))
}

/// `<pad>header {` + body lines + `<pad>}`; an empty body closes on the same line
fn block(header: &str, body: Vec<String>, indent: usize, options: &DecompileOptions) -> String {
    let pad = options.indent(indent);
    let open = if header.is_empty() {
        format!("{}{{", pad)
    } else {
        format!("{}{} {{", pad, header)
    };

    let body: Vec<String> = body.into_iter().filter(|line| !line.is_empty()).collect();
    if body.is_empty() {
        return format!("{}}}", open);
    }
    format!("{}\n{}\n{}}}", open, body.join("\n"), pad)
}

/// `Id:` label for a node, empty when it has no identifier
fn label(pattern: &Pattern<'_, '_>) -> String {
    pattern
        .node_id()
        .map(|id| format!("{}:", id))
        .unwrap_or_default()
}

/// Header for a labeled block: `Id:`, `Id: Keyword`, or just `Keyword`
fn labeled_header(pattern: &Pattern<'_, '_>, keyword: Option<&str>) -> String {
    match (label(pattern), keyword) {
        (label, None) => label,
        (label, Some(keyword)) if label.is_empty() => keyword.to_string(),
        (label, Some(keyword)) => format!("{} {}", label, keyword),
    }
}

/// `Priority n;` line when the node carries a priority
fn priority_line(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> Option<String> {
    pattern
        .quality_value("Priority")
        .map(|priority| format!("{}Priority {};", options.indent(indent), priority))
}
