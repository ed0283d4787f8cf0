//! Property tests over generated lowered trees

use proptest::prelude::*;

use plexil_decompiler::{decompile, DecompileOptions, RawNode, Wrapper};

const TAGS: &[&str] = &[
    "Node",
    "NodeList",
    "NodeBody",
    "VariableDeclarations",
    "StartCondition",
    "RepeatCondition",
    "SkipCondition",
    "PostCondition",
    "ADD",
    "LT",
    "AND",
    "NOT",
    "Assignment",
    "Command",
    "Name",
    "Arguments",
    "DeclareVariable",
    "NumericRHS",
    "IntegerVariable",
    "IntegerValue",
    "NodeRef",
    "Frobnicate",
];

fn arb_tag() -> impl Strategy<Value = String> {
    prop::sample::select(TAGS).prop_map(String::from)
}

fn arb_hints() -> impl Strategy<Value = Vec<(&'static str, &'static str)>> {
    let node_type = prop::sample::select(vec!["Assignment", "Command", "Empty", "NodeList"])
        .prop_map(|value| ("NodeType", value));
    let epx = prop::sample::select(vec![
        "If",
        "Then",
        "ElseIf",
        "Else",
        "While",
        "For",
        "aux",
        "LoopVariableUpdate",
        "Try",
        "Action",
        "Condition",
        "Concurrence",
        "Sequence",
    ])
    .prop_map(|value| ("epx", value));
    prop::collection::vec(prop_oneof![node_type, epx], 0..3)
}

fn arb_node() -> impl Strategy<Value = RawNode> {
    let leaf = prop_oneof![
        (arb_tag(), "[a-z0-9]{1,6}").prop_map(|(tag, value)| RawNode::leaf(tag, value)),
        arb_tag().prop_map(|tag| RawNode::element(tag)),
    ];
    leaf.prop_recursive(5, 64, 6, |inner| {
        (arb_tag(), arb_hints(), prop::collection::vec(inner, 0..6)).prop_map(
            |(tag, hints, children)| {
                hints
                    .into_iter()
                    .fold(RawNode::element(tag).with_children(children), |node, (k, v)| {
                        node.with_attribute(k, v)
                    })
            },
        )
    })
}

fn arb_plan() -> impl Strategy<Value = RawNode> {
    prop::collection::vec(arb_node(), 0..4)
        .prop_map(|children| RawNode::element("PlexilPlan").with_children(children))
}

/// Every raw child lands in exactly one group, in its original position
fn check_partition(raw: &RawNode, wrapper: &Wrapper<'_>) -> Result<(), TestCaseError> {
    let mut seen: Vec<usize> = wrapper
        .qualities()
        .iter()
        .chain(wrapper.structural_children())
        .map(|child| child.order())
        .collect();
    seen.sort_unstable();
    prop_assert_eq!(seen, (0..raw.children.len()).collect::<Vec<_>>());

    for quality in wrapper.qualities() {
        prop_assert!(raw.children[quality.order()].is_text_only());
        prop_assert_eq!(quality.name(), raw.children[quality.order()].name.as_str());
    }
    for child in wrapper.structural_children() {
        let raw_child = &raw.children[child.order()];
        prop_assert!(!raw_child.is_text_only());
        prop_assert_eq!(child.depth(), wrapper.depth() + 1);
        check_partition(raw_child, child)?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_partition_is_complete(raw in arb_plan()) {
        check_partition(&raw, &Wrapper::new(&raw))?;
    }

    #[test]
    fn prop_force_mode_is_total(raw in arb_plan()) {
        prop_assert!(decompile(&raw, &DecompileOptions::force()).is_ok());
    }

    #[test]
    fn prop_strict_success_matches_force(raw in arb_plan()) {
        if let Ok(text) = decompile(&raw, &DecompileOptions::strict()) {
            prop_assert_eq!(decompile(&raw, &DecompileOptions::force()).unwrap(), text);
        }
    }

    #[test]
    fn prop_dereferenced_test_replaces_marker(
        id in "N[0-9]{1,3}",
        var in "[a-z]{1,4}",
        bound in 0i64..1000,
    ) {
        let test = RawNode::element("Node")
            .with_attribute("NodeType", "Empty")
            .with_attribute("epx", "Condition")
            .with_child(RawNode::leaf("NodeId", id.clone()))
            .with_child(
                RawNode::element("PostCondition").with_child(
                    RawNode::element("GE")
                        .with_child(RawNode::leaf("IntegerVariable", var.clone()))
                        .with_child(RawNode::leaf("IntegerValue", bound.to_string())),
                ),
            );
        let then = RawNode::element("Node")
            .with_attribute("NodeType", "Empty")
            .with_attribute("epx", "Then")
            .with_child(RawNode::leaf("NodeId", "Branch"))
            .with_child(RawNode::element("StartCondition").with_child(RawNode::leaf("NodeRef", id)));
        let raw = RawNode::element("PlexilPlan").with_child(
            RawNode::element("Node")
                .with_attribute("NodeType", "NodeList")
                .with_attribute("epx", "If")
                .with_child(RawNode::leaf("NodeId", "Check"))
                .with_child(test)
                .with_child(then),
        );

        let text = decompile(&raw, &DecompileOptions::strict()).unwrap();
        prop_assert!(!text.contains("@{"), "output contains \"@{{\"");
        prop_assert_eq!(text, format!("if ( {} >= {} ) {{}}", var, bound));
    }
}
