//! Pragma marker vocabulary.
//!
//! A pragma is a top-level assignment whose target starts with [`PRAGMA_PREFIX`], e.g.
//! `__PRAGMA_EXTERN = ["_ext_malloc"]`. The suffix selects the [`PragmaKind`].

/// Reserved prefix for pragma declarations.
pub const PRAGMA_PREFIX: &str = "__PRAGMA_";

/// Known pragma kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PragmaKind {
    /// Functions visible only to standard-library modules.
    Private,
    /// Compiler intrinsics linked into the declaring module.
    Extern,
}

const PRAGMAS: &[(PragmaKind, &str)] = &[(PragmaKind::Private, "PRIVATE"), (PragmaKind::Extern, "EXTERN")];

/// Return `true` if `name` uses the reserved pragma prefix.
pub fn is_pragma_name(name: &str) -> bool {
    name.starts_with(PRAGMA_PREFIX)
}

/// Parse a full pragma name (`__PRAGMA_EXTERN`) into its kind.
///
/// Returns `None` for names without the prefix or with an unknown suffix.
pub fn from_name(name: &str) -> Option<PragmaKind> {
    let suffix = name.strip_prefix(PRAGMA_PREFIX)?;
    PRAGMAS.iter().find(|(_, s)| *s == suffix).map(|(k, _)| *k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_known_kinds() {
        assert_eq!(from_name("__PRAGMA_PRIVATE"), Some(PragmaKind::Private));
        assert_eq!(from_name("__PRAGMA_EXTERN"), Some(PragmaKind::Extern));
        assert_eq!(from_name("__PRAGMA_INTERNAL"), None);
        assert!(is_pragma_name("__PRAGMA_INTERNAL"));
        assert!(!is_pragma_name("PRAGMA_EXTERN"));
    }
}
