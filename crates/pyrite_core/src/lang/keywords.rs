//! Define the reserved keyword vocabulary for the Pyrite language.
//!
//! This module is the single source of truth for reserved words: a stable identifier
//! ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) that records canonical spellings and
//! categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** (`None` is a keyword, `none` is an identifier).
//! - Some reserved words are also “word operators” (e.g. `and`). Operator precedence lives in the parser.
//!
//! ## Examples
//! ```rust
//! use pyrite_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("while"), Some(KeywordId::While));
//! assert_eq!(keywords::as_str(KeywordId::None), "None");
//! assert_eq!(keywords::from_str("print"), None);
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Control flow / statements
    If,
    Elif,
    Else,
    While,
    Break,
    Continue,
    Return,
    Pass,

    // Definitions
    Def,
    Class,

    // Imports
    Import,
    From,
    As,

    // Literals
    True,
    False,
    None,

    // Word operators
    And,
    Or,
    Not,
    In,
    Is,
}

/// High-level grouping for documentation and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    ControlFlow,
    Definition,
    Import,
    Literal,
    Operator,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
}

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
    }
}

/// Registry of all keywords.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::If, "if", KeywordCategory::ControlFlow),
    info(KeywordId::Elif, "elif", KeywordCategory::ControlFlow),
    info(KeywordId::Else, "else", KeywordCategory::ControlFlow),
    info(KeywordId::While, "while", KeywordCategory::ControlFlow),
    info(KeywordId::Break, "break", KeywordCategory::ControlFlow),
    info(KeywordId::Continue, "continue", KeywordCategory::ControlFlow),
    info(KeywordId::Return, "return", KeywordCategory::ControlFlow),
    info(KeywordId::Pass, "pass", KeywordCategory::ControlFlow),
    info(KeywordId::Def, "def", KeywordCategory::Definition),
    info(KeywordId::Class, "class", KeywordCategory::Definition),
    info(KeywordId::Import, "import", KeywordCategory::Import),
    info(KeywordId::From, "from", KeywordCategory::Import),
    info(KeywordId::As, "as", KeywordCategory::Import),
    info(KeywordId::True, "True", KeywordCategory::Literal),
    info(KeywordId::False, "False", KeywordCategory::Literal),
    info(KeywordId::None, "None", KeywordCategory::Literal),
    info(KeywordId::And, "and", KeywordCategory::Operator),
    info(KeywordId::Or, "or", KeywordCategory::Operator),
    info(KeywordId::Not, "not", KeywordCategory::Operator),
    info(KeywordId::In, "in", KeywordCategory::Operator),
    info(KeywordId::Is, "is", KeywordCategory::Operator),
];

/// Resolve a spelling to its keyword id.
pub fn from_str(spelling: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == spelling).map(|k| k.id)
}

/// Return the metadata entry for a keyword.
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS
        .iter()
        .find(|k| k.id == id)
        .expect("INVARIANT: every KeywordId has a registry entry")
}

/// Return the canonical spelling of a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}
