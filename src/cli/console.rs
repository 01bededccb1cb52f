//! Console rendering of build diagnostics.
//!
//! ```text
//! Error in module src/main.py:
//!   on line 3: Unresolved symbol 'y'
//!   | x = y + 1
//! ```
//!
//! Semantic errors show the line number and the literal source line; other compile errors show
//! `error: <message>`. User errors are a single `error: <message>` line.

use std::io::{self, Write};

use crate::compiler::DiagnosticSink;
use crate::errors::{CompileError, UserError};
use crate::frontend::module::Module;

const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

const INDENT: &str = "  ";

/// Writes rendered diagnostics to `out` (stdout by default).
#[derive(Debug)]
pub struct ConsoleLogger<W: Write = io::Stdout> {
    enable_color: bool,
    out: W,
}

impl ConsoleLogger<io::Stdout> {
    pub fn new(enable_color: bool) -> Self {
        Self::with_writer(enable_color, io::stdout())
    }
}

impl<W: Write> ConsoleLogger<W> {
    pub fn with_writer(enable_color: bool, out: W) -> Self {
        Self { enable_color, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn render_compile_error(&self, module: &Module, error: &CompileError) -> String {
        let header = format!(
            "{}{}{}",
            self.paint(RED, "Error in module "),
            self.paint(CYAN, &module.display_path()),
            self.paint(RED, ":"),
        );

        let body = match (error.as_semantic(), module.source_text()) {
            (Some(semantic), Some(text)) => format!(
                "on line {}: {}\n| {}",
                semantic.line(text),
                semantic.message,
                semantic.source_line(text)
            ),
            _ => format!("error: {}", error.message()),
        };

        format!("{header}\n{}", indented(&body))
    }

    pub fn render_user_error(&self, error: &UserError) -> String {
        format!("{} {}", self.paint(RED, "error:"), error.message)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.enable_color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn emit(&mut self, rendered: &str) {
        // Nowhere left to report a failed write to the console.
        let _ = writeln!(self.out, "{rendered}");
    }
}

impl<W: Write> DiagnosticSink for ConsoleLogger<W> {
    fn compile_error(&mut self, module: &Module, error: &CompileError) {
        let rendered = self.render_compile_error(module, error);
        self.emit(&rendered);
    }

    fn user_error(&mut self, _module: &Module, error: &UserError) {
        let rendered = self.render_user_error(error);
        self.emit(&rendered);
    }
}

fn indented(text: &str) -> String {
    text.lines()
        .map(|line| format!("{INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
