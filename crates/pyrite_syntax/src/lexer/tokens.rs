//! Token types for the Pyrite lexer.
//!
//! Reserved words, operators, and punctuation carry registry ids from `pyrite_core::lang` so the
//! parser never compares spellings. Use `crate::token_helpers` for matching at call sites.

use crate::ast::Span;
use pyrite_core::lang::keywords::{self, KeywordId};
use pyrite_core::lang::operators::OperatorId;
use pyrite_core::lang::punctuation::PunctuationId;

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    Ident(String),
    Int(i64),
    Float(f64),
    String(String),

    Newline,
    Indent,
    Dedent,

    Eof,
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
