//! Pyrite compiler backend
//!
//! Lowering to LLVM IR happens downstream of the frontend; this module covers handing finished IR
//! to the native toolchain.
//!
//! ## Module Organization
//!
//! - `command.rs` - Subprocess runner with captured, newline-normalized output
//! - `llvm.rs` - Backend compiler discovery and IR compilation

pub mod command;
pub mod llvm;

pub use command::{CommandOutput, run_command};
pub use llvm::BackendCompiler;
