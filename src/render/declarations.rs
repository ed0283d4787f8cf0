//! Declarations

use super::{join_operands, operand, RenderResult, MISSING};
use crate::classify::Pattern;
use crate::config::DecompileOptions;
use crate::pattern::PatternKind;

/// ` = <initial value>` when the declaration has one
fn initializer(pattern: &Pattern<'_, '_>, options: &DecompileOptions) -> RenderResult {
    match pattern.child_of_kind(PatternKind::InitialValue) {
        Some(initial) => Ok(format!(" = {}", initial.decompile(0, options)?)),
        None => Ok(String::new()),
    }
}

/// `Type Name[ = init];`
pub(super) fn variable(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    Ok(format!(
        "{}{} {}{};",
        options.indent(indent),
        pattern.quality_value("Type").unwrap_or(MISSING),
        pattern.quality_value("Name").unwrap_or(MISSING),
        initializer(pattern, options)?
    ))
}

/// `Type Name[MaxSize][ = init];`
pub(super) fn array(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    Ok(format!(
        "{}{} {}[{}]{};",
        options.indent(indent),
        pattern.quality_value("Type").unwrap_or(MISSING),
        pattern.quality_value("Name").unwrap_or(MISSING),
        pattern.quality_value("MaxSize").unwrap_or_default(),
        initializer(pattern, options)?
    ))
}

/// A single value, or a bare list of array elements as an array literal
pub(super) fn initial_value(pattern: &Pattern<'_, '_>, options: &DecompileOptions) -> RenderResult {
    let operands = pattern.operands();
    match operands.as_slice() {
        [] => Ok(MISSING.to_string()),
        [only] => operand(only, options),
        many => Ok(format!("#({})", join_operands(many, " ", options)?)),
    }
}

fn parameter_list(pattern: &Pattern<'_, '_>, options: &DecompileOptions) -> RenderResult {
    let parameters = pattern
        .children_of_kind(PatternKind::Parameter)
        .iter()
        .map(|parameter| parameter.decompile(0, options))
        .collect::<Result<Vec<_>, _>>()?;
    if parameters.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("({})", parameters.join(", ")))
}

/// `[Type ]Command name[(params)];`
pub(super) fn command(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let returns = match pattern.child_of_kind(PatternKind::Return) {
        Some(returns) => format!("{} ", returns.decompile(0, options)?),
        None => String::new(),
    };
    Ok(format!(
        "{}{}Command {}{};",
        options.indent(indent),
        returns,
        pattern.quality_value("Name").unwrap_or(MISSING),
        parameter_list(pattern, options)?
    ))
}

/// `Type Lookup name[(params)];`
pub(super) fn state(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let returns = match pattern.child_of_kind(PatternKind::Return) {
        Some(returns) => returns.decompile(0, options)?,
        None => MISSING.to_string(),
    };
    Ok(format!(
        "{}{} Lookup {}{};",
        options.indent(indent),
        returns,
        pattern.quality_value("Name").unwrap_or(MISSING),
        parameter_list(pattern, options)?
    ))
}

pub(super) fn parameter(pattern: &Pattern<'_, '_>) -> String {
    if pattern.name() == "AnyParameters" {
        return "...".to_string();
    }
    let kind = pattern.quality_value("Type").unwrap_or(MISSING);
    match pattern.quality_value("Name") {
        Some(name) => format!("{} {}", kind, name),
        None => kind.to_string(),
    }
}

/// Interface variables: each wrapped declaration prefixed with `In`/`InOut`
pub(super) fn interface(
    pattern: &Pattern<'_, '_>,
    mode: &str,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let pad = options.indent(indent);
    let mut lines = Vec::new();
    for declaration in pattern.children() {
        let text = declaration.decompile(indent, options)?;
        lines.push(format!("{}{} {}", pad, mode, text.trim_start()));
    }
    Ok(lines.join("\n"))
}

/// `LibraryAction Name[(In Type a, InOut Type b)];`
pub(super) fn library(
    pattern: &Pattern<'_, '_>,
    indent: usize,
    options: &DecompileOptions,
) -> RenderResult {
    let mut parameters = Vec::new();
    for group in pattern.children() {
        let mode = match group.kind() {
            PatternKind::In => "In",
            PatternKind::InOut => "InOut",
            PatternKind::Out => "Out",
            _ => {
                parameters.push(group.decompile(0, options)?);
                continue;
            }
        };
        options.tolerate(group.recognize())?;
        for declaration in group.children() {
            let text = declaration.decompile(0, options)?;
            parameters.push(format!("{} {}", mode, text.trim_end_matches(';')));
        }
    }

    let parameters = if parameters.is_empty() {
        String::new()
    } else {
        format!("({})", parameters.join(", "))
    };
    Ok(format!(
        "{}LibraryAction {}{};",
        options.indent(indent),
        pattern.quality_value("Name").unwrap_or(MISSING),
        parameters
    ))
}
