//! Symbolic operator vocabulary.
//!
//! Word operators (`and`, `or`, `not`, `in`, `is`) are reserved words and live in
//! [`crate::lang::keywords`]; this table only covers operators spelled with symbols.
//!
//! ## Examples
//! ```rust
//! use pyrite_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("//="), Some(OperatorId::SlashSlashEq));
//! assert_eq!(operators::as_str(OperatorId::StarStar), "**");
//! ```

/// Stable identifier for symbolic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    SlashSlashEq,
    PercentEq,
}

/// Broad grouping for operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    Arithmetic,
    Comparison,
    Assignment,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub category: OperatorCategory,
}

const fn info(id: OperatorId, spelling: &'static str, category: OperatorCategory) -> OperatorInfo {
    OperatorInfo { id, spelling, category }
}

/// Registry of all symbolic operators.
pub const OPERATORS: &[OperatorInfo] = &[
    info(OperatorId::Plus, "+", OperatorCategory::Arithmetic),
    info(OperatorId::Minus, "-", OperatorCategory::Arithmetic),
    info(OperatorId::Star, "*", OperatorCategory::Arithmetic),
    info(OperatorId::StarStar, "**", OperatorCategory::Arithmetic),
    info(OperatorId::Slash, "/", OperatorCategory::Arithmetic),
    info(OperatorId::SlashSlash, "//", OperatorCategory::Arithmetic),
    info(OperatorId::Percent, "%", OperatorCategory::Arithmetic),
    info(OperatorId::EqEq, "==", OperatorCategory::Comparison),
    info(OperatorId::NotEq, "!=", OperatorCategory::Comparison),
    info(OperatorId::Lt, "<", OperatorCategory::Comparison),
    info(OperatorId::LtEq, "<=", OperatorCategory::Comparison),
    info(OperatorId::Gt, ">", OperatorCategory::Comparison),
    info(OperatorId::GtEq, ">=", OperatorCategory::Comparison),
    info(OperatorId::Eq, "=", OperatorCategory::Assignment),
    info(OperatorId::PlusEq, "+=", OperatorCategory::Assignment),
    info(OperatorId::MinusEq, "-=", OperatorCategory::Assignment),
    info(OperatorId::StarEq, "*=", OperatorCategory::Assignment),
    info(OperatorId::SlashEq, "/=", OperatorCategory::Assignment),
    info(OperatorId::SlashSlashEq, "//=", OperatorCategory::Assignment),
    info(OperatorId::PercentEq, "%=", OperatorCategory::Assignment),
];

/// Resolve a spelling to its operator id.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

/// Return the metadata entry for an operator.
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS
        .iter()
        .find(|o| o.id == id)
        .expect("INVARIANT: every OperatorId has a registry entry")
}

/// Return the spelling of an operator.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}
