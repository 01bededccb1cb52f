//! Parser for the Pyrite programming language
//!
//! Converts a token stream into a [`Program`].
//!
//! ## Examples
//!
//! ```rust
//! use pyrite_syntax::{lexer, parser};
//!
//! let source = "def foo() -> int:\n    return 42\n";
//! let tokens = lexer::lex(source).unwrap();
//! let ast = parser::parse(&tokens).unwrap();
//! assert_eq!(ast.statements.len(), 1);
//! ```

use crate::ast::*;
use crate::diagnostics::SyntaxError;
use crate::lexer::{Token, TokenKind};
use pyrite_core::lang::keywords::KeywordId;
use pyrite_core::lang::operators::OperatorId;
use pyrite_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
