//! Scenario tests over lowered plan fixtures
//!
//! Each fixture in tests/fixtures/ is a lowered (core) plan document. Tests
//! decompile it in strict and/or force mode and compare the reconstruction.
//! `rover.plx` has a golden reconstruction next to it in `rover.ple`.

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use plexil_decompiler::{
    decompile, decompile_str, parse_document, DecompileError, DecompileOptions, DiagnosticCode,
    Error, PatternKind, PlanTree, RawNode, SourceLocation,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e))
}

fn strict(name: &str) -> Result<String, Error> {
    decompile_str(&fixture(name), &DecompileOptions::strict())
}

fn forced(name: &str) -> String {
    decompile_str(&fixture(name), &DecompileOptions::force()).expect("force mode always renders")
}

// =============================================================================
// CONCRETE SCENARIOS
// =============================================================================

#[test]
fn test_concurrence_keeps_start_end_repeat_only() {
    let text = strict("concurrence.plx").unwrap();
    assert_eq!(
        text,
        [
            "Monitor: Concurrence {",
            "    StartCondition armed;",
            "    EndCondition done;",
            "    RepeatCondition false;",
            "    Ping: ping();",
            "    Count: n = n + 1;",
            "}",
        ]
        .join("\n")
    );
    assert!(!text.contains("InvariantCondition"));
    assert!(!text.contains("healthy"));
}

#[test]
fn test_for_loop_reconstruction() {
    let text = strict("for_loop.plx").unwrap();
    assert_eq!(
        text,
        "for ( Integer i; i < 10; i = i + 1 ) {\n    log(i);\n}"
    );
}

#[test]
fn test_if_dereferences_condition_nodes() {
    let text = strict("if_dereference.plx").unwrap();
    assert_eq!(
        text,
        [
            "Command announce(String);",
            "Root: {",
            "    Integer x = 3;",
            "    if ( x > 0 ) {",
            "        announce(\"positive\");",
            "    }",
            "    elseif ( x == 0 ) {",
            "        announce(\"zero\");",
            "    }",
            "    else {",
            "        announce(\"negative\");",
            "    }",
            "}",
        ]
        .join("\n")
    );
    assert!(!text.contains("@{"));
}

#[test]
fn test_unknown_tag_strict_aborts_with_tag_and_location() {
    let err = strict("unknown_in_command.plx").unwrap_err();
    let Error::Decompile(err) = err else {
        panic!("expected a decompile error, got {:?}", err);
    };
    assert_eq!(err.tag(), "Frobnicate");
    assert_eq!(err.kind(), PatternKind::Unrecognized);
    assert_eq!(err.location(), Some(SourceLocation::new(7, None)));
    assert_eq!(err.to_string(), "unrecognized element <Frobnicate> at line 7");
}

#[test]
fn test_unknown_tag_force_leaves_notice() {
    assert_eq!(
        forced("unknown_in_command.plx"),
        "Fire: {\n    // unrecognized element <Frobnicate>\n    fire();\n}"
    );
}

#[test]
fn test_unknown_tag_is_noted_during_classification() {
    let root = parse_document(&fixture("unknown_in_command.plx")).unwrap();
    let tree = PlanTree::classify(&root);
    let notes = tree.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].code, DiagnosticCode::UnrecognizedTag);
    assert_eq!(notes[0].message, "unrecognized element <Frobnicate>");
}

#[test]
fn test_golden_rover_plan() {
    let expected = fixture("rover.ple");
    assert_eq!(strict("rover.plx").unwrap(), expected.trim_end());
}

#[test]
fn test_indent_width_option() {
    let options = DecompileOptions::strict().with_indent_width(2);
    let text = decompile_str(&fixture("for_loop.plx"), &options).unwrap();
    assert_eq!(text, "for ( Integer i; i < 10; i = i + 1 ) {\n  log(i);\n}");
}

// =============================================================================
// FAILURE POLICY
// =============================================================================

fn node(node_type: &str, epx: &str, id: &str) -> RawNode {
    RawNode::element("Node")
        .with_attribute("NodeType", node_type)
        .with_attribute("epx", epx)
        .with_child(RawNode::leaf("NodeId", id))
}

#[test]
fn test_failed_precondition_reports_construct_and_location() {
    // A For without its loop machinery
    let raw = RawNode::element("PlexilPlan").with_child(
        node("NodeList", "For", "Broken")
            .with_attribute("LineNo", "12")
            .with_attribute("ColNo", "9")
            .with_child(
                RawNode::element("VariableDeclarations").with_child(
                    RawNode::element("DeclareVariable")
                        .with_child(RawNode::leaf("Name", "i"))
                        .with_child(RawNode::leaf("Type", "Integer")),
                ),
            ),
    );

    let err = decompile(&raw, &DecompileOptions::strict()).unwrap_err();
    assert_eq!(
        err,
        DecompileError::PatternRecognition {
            kind: PatternKind::For,
            tag: "Node".to_string(),
            location: Some(SourceLocation::new(12, Some(9))),
        }
    );
    assert_eq!(
        err.to_string(),
        "failed to recognize For pattern in <Node> at line 12, column 9"
    );

    let text = decompile(&raw, &DecompileOptions::force()).unwrap();
    assert_eq!(text, "for ( Integer i; <?>; <?> ) {}");
}

#[test]
fn test_force_renders_while_without_test() {
    let raw = RawNode::element("PlexilPlan").with_child(
        node("NodeList", "While", "Spin").with_child(
            RawNode::element("NodeBody").with_child(
                RawNode::element("Assignment")
                    .with_child(RawNode::leaf("BooleanVariable", "spun"))
                    .with_child(
                        RawNode::element("BooleanRHS")
                            .with_child(RawNode::leaf("BooleanValue", "true")),
                    ),
            ),
        ),
    );

    assert!(decompile(&raw, &DecompileOptions::strict()).is_err());
    assert_eq!(
        decompile(&raw, &DecompileOptions::force()).unwrap(),
        "while ( <?> ) {\n    spun = true;\n}"
    );
}

#[test]
fn test_unresolved_reference_stays_visible() {
    let then = node("Empty", "Then", "Branch").with_child(
        RawNode::element("StartCondition")
            .with_child(RawNode::leaf("NodeRef", "Ghost").with_attribute("dir", "sibling")),
    );
    let raw = RawNode::element("PlexilPlan")
        .with_child(node("NodeList", "If", "Check").with_child(then));

    let text = decompile(&raw, &DecompileOptions::strict()).unwrap();
    assert_eq!(text, "if ( @{Ghost} ) {}");
}

#[test]
fn test_load_error_surfaces() {
    let err = decompile_str("<PlexilPlan><Node>", &DecompileOptions::force()).unwrap_err();
    assert!(matches!(err, Error::Load(_)));
}

// =============================================================================
// FLATTENING
// =============================================================================

fn kinds(raw: &RawNode) -> Vec<PatternKind> {
    let tree = PlanTree::classify(raw);
    let root_node = tree.root().children().next().unwrap();
    root_node.children().map(|child| child.kind()).collect()
}

#[test]
fn test_flattening_is_invisible() {
    let declare = |name: &str| {
        RawNode::element("DeclareVariable")
            .with_child(RawNode::leaf("Name", name))
            .with_child(RawNode::leaf("Type", "Real"))
    };
    let child = |id: &str| {
        RawNode::element("Node")
            .with_attribute("NodeType", "Empty")
            .with_child(RawNode::leaf("NodeId", id))
    };

    let nested = RawNode::element("PlexilPlan").with_child(
        RawNode::element("Node")
            .with_attribute("NodeType", "NodeList")
            .with_child(RawNode::leaf("NodeId", "Root"))
            .with_child(
                RawNode::element("VariableDeclarations")
                    .with_child(declare("a"))
                    .with_child(declare("b")),
            )
            .with_child(
                RawNode::element("NodeBody").with_child(
                    RawNode::element("NodeList")
                        .with_child(child("One"))
                        .with_child(child("Two")),
                ),
            ),
    );
    let flat = RawNode::element("PlexilPlan").with_child(
        RawNode::element("Node")
            .with_attribute("NodeType", "NodeList")
            .with_child(RawNode::leaf("NodeId", "Root"))
            .with_child(declare("a"))
            .with_child(declare("b"))
            .with_child(child("One"))
            .with_child(child("Two")),
    );

    assert_eq!(kinds(&nested), kinds(&flat));
    assert_eq!(
        decompile(&nested, &DecompileOptions::strict()).unwrap(),
        decompile(&flat, &DecompileOptions::strict()).unwrap()
    );
}

// =============================================================================
// SHAPE STABILITY
// =============================================================================

#[test]
fn test_control_fixtures_classify_to_verified_variants() {
    for name in ["for_loop.plx", "if_dereference.plx", "concurrence.plx", "rover.plx"] {
        let root = parse_document(&fixture(name)).unwrap();
        let tree = PlanTree::classify(&root);
        for pattern in tree.patterns() {
            assert!(pattern.verify(), "{}: {:?} failed verify", name, pattern);
        }

        let again = PlanTree::classify(&root);
        assert_eq!(
            tree.patterns().map(|p| p.kind()).collect::<Vec<_>>(),
            again.patterns().map(|p| p.kind()).collect::<Vec<_>>()
        );
    }
}
