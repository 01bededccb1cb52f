//! CLI module for the Pyrite compiler
//!
//! `pyrite <file>` compiles the entry file and every module it imports, printing one diagnostic
//! block per failed module.
//!
//! ## Exit codes
//!
//! - `0` - every module compiled
//! - `1` - at least one module failed; diagnostics were printed
//! - `2` - the compiler could not be set up (e.g. no standard library found)
//!
//! ## Design
//!
//! Argument parsing uses clap derive. Command functions return `CliResult<T>` instead of calling
//! `process::exit`; only [`run`] handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod console;

use std::fmt;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use crate::compiler::{Compiler, DiagnosticSink};
use crate::config::CompilerOptions;
use crate::errors::UserError;
use console::ConsoleLogger;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    pub const SETUP_FAILURE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// A setup failure, rendered through miette.
    pub fn setup(err: UserError) -> Self {
        Self::new(format!("{:?}", miette::Report::new(err)), ExitCode::SETUP_FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The Pyrite compiler front-end
#[derive(Parser, Debug)]
#[command(name = "pyrite")]
#[command(version = VERSION)]
#[command(about = "Check a Pyrite program and every module it imports", long_about = None)]
pub struct Cli {
    /// Entry file of the program
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse arguments, run, and exit. The only place that calls `process::exit`.
pub fn run() {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(code) => process::exit(code.0),
        Err(err) => {
            eprintln!("{err}");
            process::exit(err.exit_code.0);
        }
    }
}

/// Build `cli.file` with options taken from the environment.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let options = CompilerOptions::from_environment().map_err(CliError::setup)?;
    tracing::debug!(stdlib = %options.stdlib_path.display(), "compiler options ready");
    let mut logger = ConsoleLogger::new(options.enable_color);
    Ok(build_file(&options, &cli.file, &mut logger))
}

/// Compile `file` as the entry module, reporting failures to `sink`.
pub fn build_file(options: &CompilerOptions, file: &Path, sink: &mut dyn DiagnosticSink) -> ExitCode {
    let mut compiler = Compiler::new(options);
    compiler.add_source_file(file, true);
    let report = compiler.build(sink);
    tracing::info!(
        compiled = report.compiled_count(),
        failed = report.failed().count(),
        "build finished"
    );
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
