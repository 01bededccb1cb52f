//! Pragma declarations.
//!
//! ```python
//! __PRAGMA_EXTERN = ["_ext_malloc", "_ext_free"]
//! __PRAGMA_PRIVATE = ["_malloc"]
//! ```
//!
//! A pragma is a top-level assignment to a name with the reserved prefix whose value is a list of
//! string literals. Only the internal module may declare them; the module pipeline enforces that
//! and checks the listed names once declarations are registered.

use pyrite_core::lang::pragmas::{self, PragmaKind};
use pyrite_syntax::ast::{AssignStmt, Expr, Program, Span, Spanned, Statement};

use crate::errors::SemanticError;

#[derive(Debug, Clone, PartialEq)]
pub struct Pragma {
    pub kind: PragmaKind,
    pub names: Vec<Spanned<String>>,
    /// Span of the whole declaration.
    pub span: Span,
}

/// All pragmas declared by one module, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModulePragmas {
    pragmas: Vec<Pragma>,
}

impl ModulePragmas {
    pub fn is_empty(&self) -> bool {
        self.pragmas.is_empty()
    }

    pub fn first_span(&self) -> Option<Span> {
        self.pragmas.first().map(|p| p.span)
    }

    /// Names listed by every pragma of `kind`.
    pub fn names(&self, kind: PragmaKind) -> impl Iterator<Item = &Spanned<String>> {
        self.pragmas
            .iter()
            .filter(move |p| p.kind == kind)
            .flat_map(|p| p.names.iter())
    }

    pub fn is_private(&self, name: &str) -> bool {
        self.names(PragmaKind::Private).any(|n| n.node == name)
    }
}

/// Pragma name assigned by `assign`, if it is a pragma declaration.
pub fn pragma_target(assign: &AssignStmt) -> Option<&str> {
    match &assign.target.node {
        Expr::Name(name) if pragmas::is_pragma_name(name) => Some(name),
        _ => None,
    }
}

/// Collect and validate the shape of every top-level pragma.
pub fn collect_pragmas(program: &Program) -> Result<ModulePragmas, SemanticError> {
    let mut out = ModulePragmas::default();

    for stmt in &program.statements {
        let Statement::Assign(assign) = &stmt.node else {
            continue;
        };
        let Some(name) = pragma_target(assign) else {
            continue;
        };

        let kind = pragmas::from_name(name)
            .ok_or_else(|| SemanticError::new(format!("Unknown pragma '{name}'"), assign.target.span))?;

        let malformed = || {
            SemanticError::new(
                format!("Pragma '{name}' must be assigned a list of string literals"),
                stmt.span,
            )
        };
        let Some(Spanned {
            node: Expr::List(items),
            ..
        }) = &assign.value
        else {
            return Err(malformed());
        };

        let mut names = Vec::with_capacity(items.len());
        for item in items {
            match &item.node {
                Expr::Str(symbol) => names.push(Spanned::new(symbol.clone(), item.span)),
                _ => return Err(malformed()),
            }
        }

        out.pragmas.push(Pragma {
            kind,
            names,
            span: stmt.span,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyrite_syntax::parser::parse_source;

    #[test]
    fn test_collects_both_kinds() {
        let program = parse_source("__PRAGMA_EXTERN = [\"_ext_abort\"]\n__PRAGMA_PRIVATE = ['a', 'b']\n").unwrap();
        let pragmas = collect_pragmas(&program).unwrap();
        let externs: Vec<_> = pragmas.names(PragmaKind::Extern).map(|n| n.node.as_str()).collect();
        assert_eq!(externs, vec!["_ext_abort"]);
        assert!(pragmas.is_private("b"));
        assert!(!pragmas.is_private("_ext_abort"));
        assert_eq!(pragmas.first_span().unwrap().start, 0);
    }

    #[test]
    fn test_unknown_pragma() {
        let program = parse_source("__PRAGMA_INTERNAL = ['x']\n").unwrap();
        let err = collect_pragmas(&program).unwrap_err();
        assert_eq!(err.message, "Unknown pragma '__PRAGMA_INTERNAL'");
    }

    #[test]
    fn test_malformed_value() {
        for source in ["__PRAGMA_EXTERN = 'x'\n", "__PRAGMA_EXTERN = [x]\n", "__PRAGMA_EXTERN: int\n"] {
            let program = parse_source(source).unwrap();
            let err = collect_pragmas(&program).unwrap_err();
            assert!(err.message.contains("list of string literals"), "{source}: {}", err.message);
        }
    }

    #[test]
    fn test_ordinary_assignments_are_ignored() {
        let program = parse_source("PRAGMA = [1]\nx = 2\n").unwrap();
        assert!(collect_pragmas(&program).unwrap().is_empty());
    }
}
