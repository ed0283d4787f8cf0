//! Decompilation options
//!
//! Options are plain values passed into every `decompile` call. They can be
//! built in code, read from the environment, or loaded from a YAML file:
//!
//! ```yaml
//! force: true
//! indent_width: 2
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::diagnostics::DecompileError;

/// Environment variable enabling force mode
pub const FORCE_ENV: &str = "PLEXIL_DECOMPILE_FORCE";
/// Environment variable overriding the indent width
pub const INDENT_ENV: &str = "PLEXIL_DECOMPILE_INDENT";

pub const DEFAULT_INDENT_WIDTH: usize = 4;
const MAX_INDENT_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecompileOptions {
    /// Render constructs whose precondition failed instead of aborting
    pub force: bool,
    /// Spaces per indent level
    pub indent_width: usize,
}

impl Default for DecompileOptions {
    fn default() -> Self {
        Self {
            force: false,
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

impl DecompileOptions {
    /// Abort on the first construct that fails its precondition
    pub fn strict() -> Self {
        Self::default()
    }

    /// Always produce output
    pub fn force() -> Self {
        Self::default().with_force(true)
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    /// Defaults overridden by `PLEXIL_DECOMPILE_FORCE` / `PLEXIL_DECOMPILE_INDENT`
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) over an arbitrary variable source
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();

        if let Some(value) = lookup(FORCE_ENV) {
            options.force = is_truthy(&value);
        }

        if let Some(value) = lookup(INDENT_ENV) {
            match value.trim().parse::<usize>() {
                Ok(width) if width <= MAX_INDENT_WIDTH => options.indent_width = width,
                _ => warn!(
                    variable = INDENT_ENV,
                    value = %value,
                    "ignoring invalid indent width"
                ),
            }
        }

        options
    }

    /// Load options from a YAML file; missing keys take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading decompile options from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let options: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        options.validate()?;
        Ok(options)
    }

    /// Reject settings no source may carry, whichever layer supplied them
    pub fn validate(&self) -> Result<()> {
        if self.indent_width > MAX_INDENT_WIDTH {
            bail!(
                "indent_width {} exceeds the maximum of {}",
                self.indent_width,
                MAX_INDENT_WIDTH
            );
        }
        Ok(())
    }

    /// Apply the strict/force policy to a recognition outcome.
    ///
    /// Strict mode passes the failure through; force mode logs it and lets
    /// rendering continue.
    pub fn tolerate(&self, outcome: Result<(), DecompileError>) -> Result<(), DecompileError> {
        match outcome {
            Err(err) if self.force => {
                warn!(kind = %err.kind(), tag = err.tag(), "{}; rendering anyway", err);
                Ok(())
            }
            other => other,
        }
    }

    /// Leading whitespace for an indent level
    pub fn indent(&self, level: usize) -> String {
        " ".repeat(self.indent_width * level)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
