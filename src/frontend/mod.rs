//! Pyrite compiler frontend
//!
//! - `source`: where module text comes from, and module ids
//! - `types`: types and the per-module type registry
//! - `symbols` / `scope`: resolvable entities and the lexical scope chain
//! - `module`: one compilation unit and its load → seed → declare pipeline
//! - `declare` / `body` / `pragma`: the declaration-registration passes
//! - `resolver`: locating imported modules and ordering them dependencies-first

// Syntax components are provided by the shared pyrite_syntax crate.
pub use pyrite_syntax::{ast, diagnostics, lexer, parser};

pub mod body;
mod declare;
pub mod module;
pub mod pragma;
pub mod resolver;
pub mod scope;
pub mod source;
pub mod symbols;
pub mod types;
