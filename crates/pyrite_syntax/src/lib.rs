//! Syntax frontend for the Pyrite language: lexer, parser, AST, diagnostics.
//!
//! ## Notes
//! - This crate is syntax-only: it does not resolve names or types. The root `pyrite` crate
//!   consumes the [`ast::Program`] it produces.
//! - Vocabulary identity (keywords/operators/punctuation) comes from `pyrite_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use pyrite_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("def f() -> int:\n    return 1\n").unwrap();
//! let program = parser::parse(&tokens).unwrap();
//! assert_eq!(program.statements.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
