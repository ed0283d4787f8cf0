//! Lowered plan decompiler CLI
//!
//! Reads a lowered (core) PLEXIL plan and prints the reconstructed source.
//!
//! # Usage
//!
//! ```bash
//! # Decompile a plan file
//! plexil-decompile plan.plx
//!
//! # Best-effort output even when a construct is not recognized
//! plexil-decompile --force plan.plx -o plan.ple
//!
//! # Read from stdin, two-space indent, debug logging
//! cat plan.plx | plexil-decompile --indent 2 -v
//!
//! # Machine-readable output with classification notes
//! plexil-decompile --format json plan.plx
//! ```
//!
//! Options are resolved as: flags > `--config` file > environment
//! (`PLEXIL_DECOMPILE_FORCE`, `PLEXIL_DECOMPILE_INDENT`) > defaults.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use plexil_decompiler::{parse_document, DecompileOptions, Diagnostic, PlanTree, Severity};

#[derive(Parser)]
#[command(name = "plexil-decompile")]
#[command(version)]
#[command(about = "Reconstruct PLEXIL source from a lowered plan document")]
#[command(long_about = None)]
struct Cli {
    /// Lowered plan file (reads stdin if not provided)
    file: Option<PathBuf>,

    /// Render constructs that fail recognition instead of aborting
    #[arg(short, long)]
    force: bool,

    /// Log debug details (unresolved references, added parentheses)
    #[arg(short, long)]
    verbose: bool,

    /// Spaces per indent level
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// YAML file with decompile options
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the reconstruction here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    source: &'a str,
    notes: &'a [Diagnostic],
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let options = resolve_options(cli)?;
    let source = read_input(cli.file.as_ref())?;

    let root = parse_document(&source).context("Failed to load lowered plan")?;
    let tree = PlanTree::classify(&root);
    let text = tree.root().decompile(0, &options)?;

    let rendered = match cli.format {
        OutputFormat::Text => {
            print_notes(tree.notes());
            format!("{}\n", text)
        }
        OutputFormat::Json => {
            let report = Report {
                source: &text,
                notes: tree.notes(),
            };
            format!("{}\n", serde_json::to_string_pretty(&report)?)
        }
    };

    match &cli.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", rendered),
    }
    Ok(())
}

fn resolve_options(cli: &Cli) -> Result<DecompileOptions> {
    let mut options = match &cli.config {
        Some(path) => DecompileOptions::load(path)?,
        None => DecompileOptions::from_env(),
    };
    if cli.force {
        options = options.with_force(true);
    }
    if let Some(width) = cli.indent {
        options = options.with_indent_width(width);
    }
    options.validate()?;
    Ok(options)
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn print_notes(notes: &[Diagnostic]) {
    for note in notes {
        let severity = match note.severity {
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };
        match &note.location {
            Some(location) => eprintln!("{}: {} ({})", severity, note.message, location),
            None => eprintln!("{}: {}", severity, note.message),
        }
    }
}
