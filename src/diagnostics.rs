//! Diagnostics
//!
//! Two kinds of reports come out of a decompilation run:
//! - [`Diagnostic`] notes recorded while classifying (never fatal)
//! - [`DecompileError`] when a construct fails its structural precondition
//!   during rendering in strict mode

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::pattern::PatternKind;

/// Diagnostic severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning,
    Info,
}

/// Diagnostic codes for categorizing issues
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCode {
    /// Tag with no dedicated pattern variant
    UnrecognizedTag,
    /// Sequence kept as its own block because it owns a scope
    ScopedSequence,
}

/// Position of a node in the source plan, from its `LineNo`/`ColNo` hints
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: Option<u32>,
}

impl SourceLocation {
    pub fn new(line: u32, column: Option<u32>) -> Self {
        Self { line, column }
    }

    /// Build from raw attribute text; a missing or unparsable line yields `None`
    pub fn from_hints(line: Option<&str>, column: Option<&str>) -> Option<Self> {
        let line = line?.trim().parse().ok()?;
        let column = column.and_then(|c| c.trim().parse().ok());
        Some(Self::new(line, column))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "line {}, column {}", self.line, column),
            None => write!(f, "line {}", self.line),
        }
    }
}

/// A note attached to a classified plan
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    /// Create a warning diagnostic
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            location: None,
        }
    }

    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            code,
            message: message.into(),
            location: None,
        }
    }

    /// Attach a source location when one is known
    pub fn with_location(mut self, location: Option<SourceLocation>) -> Self {
        self.location = location;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{}: {}", severity, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " ({})", location)?;
        }
        Ok(())
    }
}

/// Note recorded when a `Sequence` node keeps its block instead of being flattened
pub fn scoped_sequence(id: Option<&str>, location: Option<SourceLocation>) -> Diagnostic {
    Diagnostic::info(
        DiagnosticCode::ScopedSequence,
        format!(
            "sequence {} kept as a block: it owns conditions, declarations or a priority",
            id.unwrap_or("<anonymous>")
        ),
    )
    .with_location(location)
}

/// Create the note recorded for a tag the classifier has no variant for
pub fn unrecognized_tag(tag: &str, location: Option<SourceLocation>) -> Diagnostic {
    Diagnostic::warning(
        DiagnosticCode::UnrecognizedTag,
        format!("unrecognized element <{}>", tag),
    )
    .with_location(location)
}

// =============================================================================
// ERRORS
// =============================================================================

/// A construct could not be reconstructed with confidence
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecompileError {
    #[error("unrecognized element <{tag}>{}", at(.location))]
    UnrecognizedElement {
        tag: String,
        location: Option<SourceLocation>,
    },

    #[error("failed to recognize {kind} pattern in <{tag}>{}", at(.location))]
    PatternRecognition {
        kind: PatternKind,
        tag: String,
        location: Option<SourceLocation>,
    },
}

impl DecompileError {
    pub fn kind(&self) -> PatternKind {
        match self {
            DecompileError::UnrecognizedElement { .. } => PatternKind::Unrecognized,
            DecompileError::PatternRecognition { kind, .. } => *kind,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            DecompileError::UnrecognizedElement { tag, .. }
            | DecompileError::PatternRecognition { tag, .. } => tag,
        }
    }

    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            DecompileError::UnrecognizedElement { location, .. }
            | DecompileError::PatternRecognition { location, .. } => *location,
        }
    }
}

fn at(location: &Option<SourceLocation>) -> String {
    location
        .map(|l| format!(" at {}", l))
        .unwrap_or_default()
}
