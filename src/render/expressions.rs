//! Expressions
//!
//! Inline renderers; none of these emit indentation or line breaks.

use tracing::debug;

use super::{join_operands, operand, operand_or_missing, RenderResult, MISSING};
use crate::classify::{Operand, Pattern};
use crate::config::DecompileOptions;
use crate::pattern::{BinaryOperator, Function, LookupKind, PatternKind};
use crate::wrapper::Wrapper;

/// Render a quality used as an operand. String literals are re-quoted;
/// everything else (numbers, booleans, variable names, state values) is verbatim.
pub fn scalar(quality: &Wrapper<'_>) -> String {
    let text = quality.value().unwrap_or_default();
    match quality.name() {
        "StringValue" => quote(text),
        _ => text.to_string(),
    }
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

/// A single `NodeRef`/`NodeId` quality and nothing else
pub(crate) fn is_node_reference(pattern: &Pattern<'_, '_>) -> bool {
    matches!(
        pattern.operands().as_slice(),
        [Operand::Scalar(quality)] if matches!(quality.name(), "NodeRef" | "NodeId")
    )
}

pub(super) fn value(pattern: &Pattern<'_, '_>, options: &DecompileOptions) -> RenderResult {
    let operands = pattern.operands();
    match operands.as_slice() {
        [] => Ok(MISSING.to_string()),
        [only] => operand(only, options),
        many => join_operands(many, " ", options),
    }
}

pub(super) fn array_value(pattern: &Pattern<'_, '_>, options: &DecompileOptions) -> RenderResult {
    Ok(format!("#({})", join_operands(&pattern.operands(), " ", options)?))
}

pub(super) fn array_element(
    pattern: &Pattern<'_, '_>,
    options: &DecompileOptions,
) -> RenderResult {
    let array = pattern
        .quality_value("Name")
        .or_else(|| pattern.quality_value("ArrayVariable"))
        .unwrap_or(MISSING);
    let index = match pattern
        .children()
        .find(|child| child.kind() == PatternKind::Value && child.name() == "Index")
    {
        Some(index) => index.decompile(0, options)?,
        None => MISSING.to_string(),
    };
    Ok(format!("{}[{}]", array, index))
}

// =============================================================================
// OPERATORS
// =============================================================================

/// Infix rendering that mirrors the tree's nesting exactly.
///
/// A nested operator operand is parenthesized when a left-associative
/// precedence parser would otherwise regroup it: lower precedence than the
/// parent, or equal precedence in any position but the first.
pub(super) fn operator(
    pattern: &Pattern<'_, '_>,
    op: BinaryOperator,
    options: &DecompileOptions,
) -> RenderResult {
    let operands = pattern.operands();
    let mut parts = Vec::with_capacity(operands.len().max(2));

    for (position, item) in operands.iter().enumerate() {
        let text = operand(item, options)?;
        let nested = item.as_node().and_then(|node| match node.kind() {
            PatternKind::Operator(inner) => Some(inner),
            _ => None,
        });
        match nested {
            Some(inner) if needs_parens(op, inner, position) => {
                debug!(
                    parent = op.symbol(),
                    nested = inner.symbol(),
                    position,
                    "parenthesizing nested operator to keep tree grouping"
                );
                parts.push(format!("({})", text));
            }
            _ => parts.push(text),
        }
    }

    while !op.is_variadic() && parts.len() < 2 {
        parts.push(MISSING.to_string());
    }
    Ok(parts.join(&format!(" {} ", op.symbol())))
}

fn needs_parens(parent: BinaryOperator, nested: BinaryOperator, position: usize) -> bool {
    nested.precedence() < parent.precedence()
        || (nested.precedence() == parent.precedence() && position > 0)
}

pub(super) fn not(pattern: &Pattern<'_, '_>, options: &DecompileOptions) -> RenderResult {
    let operands = pattern.operands();
    Ok(format!("!( {} )", operand_or_missing(operands.first(), options)?))
}

pub(super) fn function(
    pattern: &Pattern<'_, '_>,
    function: Function,
    options: &DecompileOptions,
) -> RenderResult {
    Ok(format!(
        "{}({})",
        function.name(),
        join_operands(&pattern.operands(), ", ", options)?
    ))
}

/// `Lookup(name)`, `Lookup(name(args))`, `LookupOnChange(name, tolerance)`,
/// `LookupWithFrequency(name, low[, high])`
pub(super) fn lookup(
    pattern: &Pattern<'_, '_>,
    kind: LookupKind,
    options: &DecompileOptions,
) -> RenderResult {
    let mut name = match pattern.child_of_kind(PatternKind::Name) {
        Some(name) => name.decompile(0, options)?,
        None => pattern.quality_value("Name").unwrap_or(MISSING).to_string(),
    };

    if let Some(arguments) = pattern.child_of_kind(PatternKind::Arguments) {
        let arguments = arguments.decompile(0, options)?;
        if !arguments.is_empty() {
            name = format!("{}({})", name, arguments);
        }
    }

    for modifier in pattern.children().filter(|child| child.kind() == PatternKind::Value) {
        match modifier.name() {
            "Tolerance" => name = format!("{}, {}", name, modifier.decompile(0, options)?),
            "Frequency" => {
                options.tolerate(modifier.recognize())?;
                name = format!("{}, {}", name, join_operands(&modifier.operands(), ", ", options)?);
            }
            _ => {}
        }
    }

    Ok(format!("{}({})", kind.keyword(), name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::PlanTree;
    use crate::raw::RawNode;
    use pretty_assertions::assert_eq;

    fn render(expr: RawNode) -> String {
        let raw = RawNode::element("Plan").with_child(expr);
        let tree = PlanTree::classify(&raw);
        let expr = tree.root().children().next().unwrap();
        expr.decompile(0, &DecompileOptions::strict()).unwrap()
    }

    fn int(value: &str) -> RawNode {
        RawNode::leaf("IntegerValue", value)
    }

    fn var(name: &str) -> RawNode {
        RawNode::leaf("IntegerVariable", name)
    }

    fn binary(tag: &str, lhs: RawNode, rhs: RawNode) -> RawNode {
        RawNode::element(tag).with_child(lhs).with_child(rhs)
    }

    #[test]
    fn test_scalar_quoting() {
        let raw = RawNode::leaf("StringValue", "say \"hi\"");
        let wrapper = Wrapper::new(&raw);
        assert_eq!(scalar(&wrapper), r#""say \"hi\"""#);

        let raw = RawNode::leaf("RealValue", "2.5");
        assert_eq!(scalar(&Wrapper::new(&raw)), "2.5");
    }

    #[test]
    fn test_nesting_follows_tree() {
        // (a + b) * c keeps its parentheses, a + b * c needs none
        let product = binary("MUL", binary("ADD", var("a"), var("b")), var("c"));
        assert_eq!(render(product), "(a + b) * c");

        let sum = binary("ADD", var("a"), binary("MUL", var("b"), var("c")));
        assert_eq!(render(sum), "a + b * c");
    }

    #[test]
    fn test_right_nested_same_precedence() {
        let left = binary("SUB", binary("SUB", var("a"), var("b")), var("c"));
        assert_eq!(render(left), "a - b - c");

        let right = binary("SUB", var("a"), binary("SUB", var("b"), var("c")));
        assert_eq!(render(right), "a - (b - c)");
    }

    #[test]
    fn test_variadic_and() {
        let and = RawNode::element("AND")
            .with_child(RawNode::leaf("BooleanVariable", "a"))
            .with_child(binary("GT", var("x"), int("0")))
            .with_child(RawNode::leaf("BooleanValue", "true"));
        assert_eq!(render(and), "a && x > 0 && true");
    }

    #[test]
    fn test_not_and_functions() {
        let not = RawNode::element("NOT").with_child(binary("LT", var("i"), int("10")));
        assert_eq!(render(not), "!( i < 10 )");

        let max = RawNode::element("MAX").with_child(var("a")).with_child(int("3"));
        assert_eq!(render(max), "max(a, 3)");

        let known = RawNode::element("IsKnown").with_child(var("a"));
        assert_eq!(render(known), "isKnown(a)");
    }

    #[test]
    fn test_array_element_and_value() {
        let element = RawNode::element("ArrayElement")
            .with_child(RawNode::leaf("Name", "readings"))
            .with_child(RawNode::element("Index").with_child(var("i")));
        assert_eq!(render(element), "readings[i]");

        let array = RawNode::element("ArrayValue")
            .with_child(RawNode::leaf("StringValue", "a"))
            .with_child(RawNode::leaf("StringValue", "b"));
        assert_eq!(render(array), r#"#("a" "b")"#);
    }

    #[test]
    fn test_lookups() {
        let now = RawNode::element("LookupNow").with_child(
            RawNode::element("Name").with_child(RawNode::leaf("StringValue", "temperature")),
        );
        assert_eq!(render(now), "Lookup(temperature)");

        let on_change = RawNode::element("LookupOnChange")
            .with_child(
                RawNode::element("Name").with_child(RawNode::leaf("StringValue", "position")),
            )
            .with_child(RawNode::element("Arguments").with_child(int("2")))
            .with_child(
                RawNode::element("Tolerance").with_child(RawNode::leaf("RealValue", "0.5")),
            );
        assert_eq!(render(on_change), "LookupOnChange(position(2), 0.5)");

        let sampled = RawNode::element("LookupWithFrequency")
            .with_child(
                RawNode::element("Frequency")
                    .with_child(RawNode::element("Low").with_child(RawNode::leaf("RealValue", "1.0")))
                    .with_child(RawNode::element("High").with_child(RawNode::leaf("RealValue", "4.0"))),
            )
            .with_child(RawNode::element("Name").with_child(RawNode::leaf("StringValue", "heading")));
        assert_eq!(render(sampled), "LookupWithFrequency(heading, 1.0, 4.0)");
    }

    #[test]
    fn test_empty_element_constants() {
        let bounded = binary("LT", var("x"), RawNode::element("PlusInfinity"));
        assert_eq!(render(bounded), "x < PLUS_INFINITY");

        let state = RawNode::element("EQInternal")
            .with_child(
                RawNode::element("NodeStateVariable").with_child(RawNode::leaf("NodeId", "Drive")),
            )
            .with_child(RawNode::element("Executing"));
        assert_eq!(render(state), "Drive.state == EXECUTING");
        assert_eq!(render(RawNode::element("MinusInfinity")), "MINUS_INFINITY");
    }

    #[test]
    fn test_node_variables() {
        let state = RawNode::element("NodeStateVariable")
            .with_child(RawNode::leaf("NodeRef", "Drive").with_attribute("dir", "sibling"));
        assert_eq!(render(state), "Drive.state");

        let timepoint = RawNode::element("NodeTimepointValue")
            .with_child(RawNode::leaf("NodeId", "Drive"))
            .with_child(RawNode::leaf("NodeStateValue", "EXECUTING"))
            .with_child(RawNode::leaf("Timepoint", "START"));
        assert_eq!(render(timepoint), "Drive.EXECUTING.START");
    }
}
