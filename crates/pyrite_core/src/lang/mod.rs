//! Pyrite language vocabulary registries.
//!
//! Callers work with **stable IDs** (e.g. `KeywordId`, `OperatorId`) and look up spellings and
//! metadata via registry tables, instead of scattering string comparisons across the compiler.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries only provide spellings and metadata.
//!
//! ## Examples
//! ```rust
//! use pyrite_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("def"), Some(KeywordId::Def));
//! assert_eq!(keywords::as_str(KeywordId::Def), "def");
//! ```

pub mod intrinsics;
pub mod keywords;
pub mod operators;
pub mod pragmas;
pub mod punctuation;
pub mod types;
