//! Punctuation vocabulary.
//!
//! Delimiters, separators, and structural markers used by the lexer/parser.
//!
//! ## Examples
//! ```rust
//! use pyrite_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_str("->"), Some(PunctuationId::Arrow));
//! assert_eq!(punctuation::as_str(PunctuationId::Ellipsis), "...");
//! ```

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    Comma,
    Colon,
    Dot,
    Arrow,
    Ellipsis,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
}

/// Registry of all punctuation tokens.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    PunctuationInfo { id: PunctuationId::Comma, canonical: "," },
    PunctuationInfo { id: PunctuationId::Colon, canonical: ":" },
    PunctuationInfo { id: PunctuationId::Dot, canonical: "." },
    PunctuationInfo { id: PunctuationId::Arrow, canonical: "->" },
    PunctuationInfo { id: PunctuationId::Ellipsis, canonical: "..." },
    PunctuationInfo { id: PunctuationId::LParen, canonical: "(" },
    PunctuationInfo { id: PunctuationId::RParen, canonical: ")" },
    PunctuationInfo { id: PunctuationId::LBracket, canonical: "[" },
    PunctuationInfo { id: PunctuationId::RBracket, canonical: "]" },
    PunctuationInfo { id: PunctuationId::LBrace, canonical: "{" },
    PunctuationInfo { id: PunctuationId::RBrace, canonical: "}" },
];

/// Resolve a spelling to its punctuation id.
pub fn from_str(spelling: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == spelling).map(|p| p.id)
}

/// Return the canonical spelling of a punctuation token.
pub fn as_str(id: PunctuationId) -> &'static str {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.canonical)
        .expect("INVARIANT: every PunctuationId has a registry entry")
}
