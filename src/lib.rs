//! plexil-decompiler: reconstruct plan source text from lowered PLEXIL trees
//!
//! The lowering pass flattens high-level constructs (if/while/for, try,
//! concurrence) into uniform `Node` elements tagged with hint attributes.
//! This crate recovers the surface constructs:
//! - Raw tree type and an XML provider for it
//! - Generic wrapper splitting children into qualities and structure
//! - Structural classifier producing an arena-backed `PlanTree`
//! - Per-construct preconditions and renderers
//! - Dereferencing of node-reference markers
//! - Strict / force failure policy carried by `DecompileOptions`
//!
//! ```text
//! XML ──▶ RawNode ──▶ Wrapper ──▶ PlanTree ──▶ decompile ──▶ text
//! ```

pub mod classify;
pub mod config;
pub mod decompile;
pub mod dereference;
pub mod diagnostics;
pub mod pattern;
pub mod raw;
pub mod render;
pub mod wrapper;
pub mod xml;

use thiserror::Error;

// Re-export commonly used types
pub use classify::{NodeId, Operand, Pattern, PlanTree};
pub use config::DecompileOptions;
pub use dereference::reference_marker;
pub use diagnostics::{
    DecompileError, Diagnostic, DiagnosticCode, Severity, SourceLocation,
};
pub use pattern::{
    BinaryOperator, ConditionKind, Constant, Function, LookupKind, NodeVariableKind, PatternKind,
};
pub use raw::RawNode;
pub use wrapper::Wrapper;
pub use xml::{parse_document, LoadError};

/// Any failure on the way from XML text to source text
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Decompile(#[from] DecompileError),
}

/// Classify `root` and decompile the whole plan
pub fn decompile(root: &RawNode, options: &DecompileOptions) -> Result<String, DecompileError> {
    PlanTree::classify(root).root().decompile(0, options)
}

/// Parse a lowered plan document and decompile it
pub fn decompile_str(source: &str, options: &DecompileOptions) -> Result<String, Error> {
    let root = parse_document(source)?;
    Ok(decompile(&root, options)?)
}
