//! Nodes and control constructs
//!
//! Lowered control constructs keep their pieces in separate nodes:
//!
//! ```text
//! If          ── Condition node (test)      ── Then (StartCondition → NodeRef test) ── ElseIf* ── Else?
//! While       ── RepeatCondition            ── Condition node (test)          ── Action
//! For         ── DeclareVariable            ── aux ── SkipCondition (NOT test)
//!                                                 ├── Action
//!                                                 └── LoopVariableUpdate ── Assignment
//! ```
//!
//! The renderers here reassemble them into a single surface construct.
//! Children a construct does not absorb, and its priority, stay in a labeled
//! block around it.

use super::statements::assignment_expression;
use super::{
    block, label, labeled_header, operand, operand_or_missing, priority_line, RenderResult,
    MISSING,
};
use crate::classify::{NodeId, Operand, Pattern};
use crate::config::DecompileOptions;
use crate::dereference::reference_marker;
use crate::pattern::{ConditionKind, PatternKind};

/// Children kept by `keep`, each rendered at `indent`, one per line
pub(super) fn body(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
    keep: impl Fn(&Pattern<'_, '_>) -> bool,
) -> RenderResult {
    let mut lines = Vec::new();
    for child in pattern.children().filter(|child| keep(child)) {
        let text = child.decompile(indent, options)?;
        if !text.is_empty() {
            lines.push(text);
        }
    }
    Ok(lines.join("\n"))
}

pub(super) fn plan(pattern: &Pattern<'_, '_>, indent: usize, options: &DecompileOptions) -> RenderResult {
    body(pattern, indent, options, |_| true)
}

pub(super) fn node(pattern: &Pattern<'_, '_>, indent: usize, options: &DecompileOptions) -> RenderResult {
    labeled_block(pattern, None, indent, options)
}

/// `Id: [Keyword ]{` priority, then every child, `}`
pub(super) fn labeled_block(
    pattern: &Pattern<'_, '_>,
    keyword: Option<&str>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let mut lines: Vec<String> = priority_line(pattern, indent + 1, options)
        .into_iter()
        .collect();
    for child in pattern.children() {
        lines.push(child.decompile(indent + 1, options)?);
    }
    Ok(block(&labeled_header(pattern, keyword), lines, indent, options))
}

/// `Id: <statement>` for a node wrapping exactly one statement
fn labeled_statement(
    pattern: &Pattern<'_, '_>,
    statement: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let text = statement.decompile(0, options)?;
    let label = label(pattern);
    let pad = options.indent(indent);
    if label.is_empty() {
        return Ok(format!("{}{}", pad, text));
    }
    Ok(format!("{}{} {}", pad, label, text))
}

pub(super) fn command_node(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let mut children = pattern.children();
    match (children.next(), children.next()) {
        (Some(command), None) if command.kind() == PatternKind::Command => {
            labeled_statement(pattern, &command, indent, options)
        }
        _ => labeled_block(pattern, None, indent, options),
    }
}

/// Top-level assignment nodes are plain statements; nested ones keep their label
pub(super) fn assignment_node(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    if pattern.is_top_level() {
        if let Some(assignment) = pattern.child_of_kind(PatternKind::Assignment) {
            return assignment.decompile(indent, options);
        }
    }

    let mut children = pattern.children();
    match (children.next(), children.next()) {
        (Some(only), None) if pattern.quality_value("Priority").is_none() => {
            labeled_statement(pattern, &only, indent, options)
        }
        _ => labeled_block(pattern, None, indent, options),
    }
}

// =============================================================================
// CONDITIONS
// =============================================================================

/// Expression of a condition, or the reference marker when the condition only
/// names another node
fn condition_text(condition: &Pattern<'_, '_>, options: &DecompileOptions) -> RenderResult {
    match condition.reference_target() {
        Some(id) => Ok(reference_marker(id)),
        None => operand_or_missing(condition.operands().first(), options),
    }
}

/// Test of a branch or loop. A bare reference is replaced by the expression
/// of the condition node it names, looked up from `scope` outwards.
fn branch_test(
    condition: Option<Pattern<'_, '_>>,
    scope: &Pattern<'_, '_>,
    options: &DecompileOptions,
) -> RenderResult {
    let Some(condition) = condition else {
        return Ok(MISSING.to_string());
    };
    options.tolerate(condition.recognize())?;
    match condition.reference_target() {
        Some(id) => scope.resolve_reference(id, options),
        None => operand_or_missing(condition.operands().first(), options),
    }
}

/// Condition node among `pattern`'s children that `condition` refers to
fn referenced_test<'t, 'a>(
    pattern: &Pattern<'t, 'a>,
    condition: Option<Pattern<'t, 'a>>,
) -> Option<NodeId> {
    let id = condition?.reference_target()?;
    pattern.condition_node(id).map(|target| target.id())
}

/// `Keyword expr;` inside a node's body
pub(super) fn condition(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    Ok(format!(
        "{}{} {};",
        options.indent(indent),
        pattern.name(),
        condition_text(pattern, options)?
    ))
}

/// The expression a condition node computes, seen through its PostCondition
pub(crate) fn condition_expression_source<'t, 'a>(
    pattern: &Pattern<'t, 'a>,
) -> Option<Operand<'t, 'a>> {
    let post = pattern.condition(ConditionKind::Post)?;
    match post.operands().as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

pub(super) fn condition_node(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let expression = match condition_expression_source(pattern) {
        Some(source) => operand(&source, options)?,
        None => MISSING.to_string(),
    };
    Ok(format!("{}{}", options.indent(indent), expression))
}

// =============================================================================
// BRANCHES
// =============================================================================

pub(super) fn if_block(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let branches: Vec<_> = pattern
        .children()
        .filter(|child| {
            matches!(
                child.kind(),
                PatternKind::Then | PatternKind::ElseIf | PatternKind::Else
            )
        })
        .collect();
    let tests: Vec<NodeId> = branches
        .iter()
        .filter_map(|branch| referenced_test(pattern, branch.condition(ConditionKind::Start)))
        .collect();
    let absorbed = |child: &Pattern<'_, '_>| {
        branches.iter().any(|branch| branch.id() == child.id()) || tests.contains(&child.id())
    };

    with_leftovers(pattern, indent, options, absorbed, |indent| {
        let then = pattern.child_of_kind(PatternKind::Then);
        let (test, body) = match then {
            Some(then) => (
                branch_test(then.condition(ConditionKind::Start), &then, options)?,
                then.decompile(indent + 1, options)?,
            ),
            None => (MISSING.to_string(), String::new()),
        };
        let mut sections = vec![block(&format!("if ( {} )", test), vec![body], indent, options)];

        for branch in pattern.children_of_kind(PatternKind::ElseIf) {
            let test = branch_test(branch.condition(ConditionKind::Start), &branch, options)?;
            let body = branch.decompile(indent + 1, options)?;
            sections.push(block(&format!("elseif ( {} )", test), vec![body], indent, options));
        }

        if let Some(otherwise) = pattern.child_of_kind(PatternKind::Else) {
            let body = otherwise.decompile(indent + 1, options)?;
            sections.push(block("else", vec![body], indent, options));
        }

        Ok(sections.join("\n"))
    })
}

/// Body of a Then, ElseIf or Else: everything but its start condition
pub(super) fn branch_body(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    body(pattern, indent, options, |child| {
        child.kind() != PatternKind::Condition(ConditionKind::Start)
    })
}

/// Render a control construct whose surface form absorbs only part of its
/// node. The children it leaves over, and the node's priority, go into the
/// node's labeled block ahead of the construct.
fn with_leftovers(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
    absorbed: impl Fn(&Pattern<'_, '_>) -> bool,
    construct: impl Fn(usize) -> RenderResult,
) -> RenderResult {
    let leftovers: Vec<_> = pattern.children().filter(|child| !absorbed(child)).collect();
    let priority = priority_line(pattern, indent + 1, options);
    if leftovers.is_empty() && priority.is_none() {
        return construct(indent);
    }

    let mut lines: Vec<String> = priority.into_iter().collect();
    for child in leftovers {
        lines.push(child.decompile(indent + 1, options)?);
    }
    lines.push(construct(indent + 1)?);
    Ok(block(&labeled_header(pattern, None), lines, indent, options))
}

// =============================================================================
// LOOPS
// =============================================================================

/// `while ( <test> ) { <body> }`; the node's other conditions stay on the
/// enclosing labeled block
pub(super) fn while_loop(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let repeat = pattern.condition(ConditionKind::Repeat);
    let test_node = referenced_test(pattern, repeat);
    let is_test = |child: &Pattern<'_, '_>| {
        repeat.is_some_and(|repeat| repeat.id() == child.id()) || test_node == Some(child.id())
    };
    let in_body = |child: &Pattern<'_, '_>| !child.kind().is_condition() && !is_test(child);

    with_leftovers(
        pattern,
        indent,
        options,
        |child: &Pattern<'_, '_>| is_test(child) || in_body(child),
        |indent| {
            let test = branch_test(repeat, pattern, options)?;
            let statements = body(pattern, indent + 1, options, &in_body)?;
            Ok(block(&format!("while ( {} )", test), vec![statements], indent, options))
        },
    )
}

/// Loop variable declaration and loop machinery of a `for`
pub(crate) fn for_parts<'t, 'a>(
    pattern: &Pattern<'t, 'a>,
) -> Option<(Pattern<'t, 'a>, Pattern<'t, 'a>)> {
    Some((
        pattern.child_of_kind(PatternKind::DeclareVariable)?,
        pattern.child_of_kind(PatternKind::Auxiliary)?,
    ))
}

/// `for ( <decl> <test>; <update> ) { <body> }`
pub(super) fn for_loop(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let variable = pattern.child_of_kind(PatternKind::DeclareVariable);
    let auxiliary = pattern.child_of_kind(PatternKind::Auxiliary);
    let absorbed = |child: &Pattern<'_, '_>| {
        [variable, auxiliary]
            .iter()
            .flatten()
            .any(|part| part.id() == child.id())
    };

    with_leftovers(pattern, indent, options, absorbed, |indent| {
        let declaration = match variable {
            Some(declaration) => declaration.decompile(0, options)?,
            None => format!("{};", MISSING),
        };
        let (test, update, body) = match auxiliary {
            Some(auxiliary) => (
                loop_test(auxiliary.condition(ConditionKind::Skip), options)?,
                loop_update(auxiliary.child_of_kind(PatternKind::LoopVariableUpdate), options)?,
                auxiliary.decompile(indent + 1, options)?,
            ),
            None => (MISSING.to_string(), MISSING.to_string(), String::new()),
        };

        let header = format!("for ( {} {}; {} )", declaration, test, update);
        Ok(block(&header, vec![body], indent, options))
    })
}

/// Body of a loop action or of the `for` machinery: everything but
/// conditions and the variable update
pub(super) fn loop_body(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    body(pattern, indent, options, |child| {
        !child.kind().is_condition() && child.kind() != PatternKind::LoopVariableUpdate
    })
}

/// The skip condition says when to stop; the loop test is its negation
fn loop_test(skip: Option<Pattern<'_, '_>>, options: &DecompileOptions) -> RenderResult {
    let Some(skip) = skip else {
        return Ok(MISSING.to_string());
    };
    options.tolerate(skip.recognize())?;

    let operands = skip.operands();
    match operands.first() {
        Some(Operand::Node(negation)) if negation.kind() == PatternKind::Not => {
            options.tolerate(negation.recognize())?;
            operand_or_missing(negation.operands().first(), options)
        }
        Some(other) => Ok(format!("!( {} )", operand(other, options)?)),
        None => Ok(MISSING.to_string()),
    }
}

fn loop_update(update: Option<Pattern<'_, '_>>, options: &DecompileOptions) -> RenderResult {
    let Some(update) = update else {
        return Ok(MISSING.to_string());
    };
    options.tolerate(update.recognize())?;
    match update.child_of_kind(PatternKind::Assignment) {
        Some(assignment) => {
            options.tolerate(assignment.recognize())?;
            assignment_expression(&assignment, options)
        }
        None => Ok(MISSING.to_string()),
    }
}

pub(super) fn loop_variable_update(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    match pattern.child_of_kind(PatternKind::Assignment) {
        Some(assignment) => assignment.decompile(indent, options),
        None => body(pattern, indent, options, |_| true),
    }
}

// =============================================================================
// CONCURRENCE
// =============================================================================

pub(super) fn concurrence(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let mut lines = Vec::new();
    for child in pattern.children() {
        if let PatternKind::Condition(kind) = child.kind() {
            if !matches!(
                kind,
                ConditionKind::Start | ConditionKind::End | ConditionKind::Repeat
            ) {
                continue;
            }
        }
        lines.push(child.decompile(indent + 1, options)?);
    }
    Ok(block(
        &labeled_header(pattern, Some("Concurrence")),
        lines,
        indent,
        options,
    ))
}
