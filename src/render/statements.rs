//! Statements: assignments, commands, updates, library calls

use super::{join_operands, operand, operand_or_missing, RenderResult, MISSING};
use crate::classify::{Operand, Pattern};
use crate::config::DecompileOptions;
use crate::pattern::PatternKind;

pub(super) fn assignment(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    Ok(format!(
        "{}{};",
        options.indent(indent),
        assignment_expression(pattern, options)?
    ))
}

/// `lhs = rhs` without indentation or terminator
pub(crate) fn assignment_expression(
    pattern: &Pattern<'_, '_>,
    options: &DecompileOptions,
) -> RenderResult {
    let operands = pattern.operands();
    Ok(format!(
        "{} = {}",
        operand_or_missing(operands.first(), options)?,
        operand_or_missing(operands.get(1), options)?
    ))
}

pub(crate) fn command_name_present(pattern: &Pattern<'_, '_>) -> bool {
    pattern.has_child_of_kind(PatternKind::Name) || pattern.has_quality("Name")
}

/// `[lhs = ]name(args);`
pub(super) fn command(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let name = match pattern.child_of_kind(PatternKind::Name) {
        Some(name) => name.decompile(0, options)?,
        None => pattern.quality_value("Name").unwrap_or(MISSING).to_string(),
    };
    let arguments = match pattern.child_of_kind(PatternKind::Arguments) {
        Some(arguments) => arguments.decompile(0, options)?,
        None => String::new(),
    };

    let target = pattern.operands().into_iter().find(|op| match op {
        Operand::Scalar(quality) => quality.name() != "Name",
        Operand::Node(node) => node.kind() == PatternKind::ArrayElement,
    });
    let target = match target {
        Some(target) => format!("{} = ", operand(&target, options)?),
        None => String::new(),
    };

    Ok(format!(
        "{}{}{}({});",
        options.indent(indent),
        target,
        name,
        arguments
    ))
}

/// A name is a string expression; literals lose their quotes
pub(super) fn name(pattern: &Pattern<'_, '_>, options: &DecompileOptions) -> RenderResult {
    match pattern.operands().first() {
        Some(Operand::Scalar(quality)) if quality.name() == "StringValue" => {
            Ok(quality.value().unwrap_or_default().to_string())
        }
        other => operand_or_missing(other, options),
    }
}

pub(super) fn arguments(pattern: &Pattern<'_, '_>, options: &DecompileOptions) -> RenderResult {
    join_operands(&pattern.operands(), ", ", options)
}

/// `Update a = 1, b = 2;`
pub(super) fn update(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let pairs = pattern
        .children_of_kind(PatternKind::Pair)
        .iter()
        .map(|pair| pair.decompile(0, options))
        .collect::<Result<Vec<_>, _>>()?;

    let pad = options.indent(indent);
    if pairs.is_empty() {
        return Ok(format!("{}Update;", pad));
    }
    Ok(format!("{}Update {};", pad, pairs.join(", ")))
}

/// `name = value`, where `name` is the quality called `key`
pub(super) fn pair(
    pattern: &Pattern<'_, '_>,
    key: &str,
    options: &DecompileOptions,
) -> RenderResult {
    let operands = pattern.operands();
    let value = operands.iter().find(|op| match op {
        Operand::Scalar(quality) => quality.name() != key,
        Operand::Node(_) => true,
    });
    Ok(format!(
        "{} = {}",
        pattern.quality_value(key).unwrap_or(MISSING),
        operand_or_missing(value, options)?
    ))
}

/// `LibraryCall Id(alias = value, ...);`
pub(super) fn library_call(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let aliases = pattern
        .children_of_kind(PatternKind::Alias)
        .iter()
        .map(|alias| alias.decompile(0, options))
        .collect::<Result<Vec<_>, _>>()?;

    let callee = pattern.node_id().unwrap_or(MISSING);
    let pad = options.indent(indent);
    if aliases.is_empty() {
        return Ok(format!("{}LibraryCall {};", pad, callee));
    }
    Ok(format!(
        "{}LibraryCall {}({});",
        pad,
        callee,
        aliases.join(", ")
    ))
}
