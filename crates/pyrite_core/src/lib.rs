//! Canonical language vocabulary for the Pyrite compiler.
//!
//! This crate is intentionally small and dependency-free. It holds the tables that both the syntax
//! frontend and the semantic core agree on: reserved words, operators, punctuation, the built-in
//! primitive types, the compiler-provided intrinsics, and the pragma vocabulary.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no compiler-specific types.

pub mod lang;
