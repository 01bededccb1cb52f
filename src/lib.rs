#![forbid(unsafe_code)]
//! Pyrite compiler front-end
//!
//! Pyrite compiles a statically typed subset of Python. This crate turns a set of source files into
//! resolved modules: it loads and parses each file, discovers the modules it imports, orders them
//! dependencies-first, and registers every module's types, functions and globals. Each failure is
//! reported per module without aborting the rest of the build.
//!
//! ## Layout
//!
//! - [`frontend`] - modules, scopes, symbols, types and import resolution
//! - [`compiler`] - the build driver and its diagnostic sink
//! - [`backend`] - handing generated IR to the native toolchain
//! - [`cli`] - the `pyrite` command
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a compiler bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod backend;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod frontend;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;

pub use compiler::{BuildReport, CollectingSink, Compiler, DiagnosticSink};
pub use config::CompilerOptions;
pub use errors::{BuildError, CompileError, SemanticError, UserError};
pub use frontend::module::{Module, ModuleState};
pub use frontend::source::{ModuleId, ModuleSource};
