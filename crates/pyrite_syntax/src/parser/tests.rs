#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on specific syntactic forms and on error recovery (avoiding cascaded errors).
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_str(source: &str) -> Result<Program, Vec<SyntaxError>> {
        let tokens = lexer::lex(source)?;
        parse(&tokens)
    }

    fn single(source: &str) -> Statement {
        let program = parse_str(source).unwrap_or_else(|e| panic!("parse failed: {:?}", e));
        assert_eq!(program.statements.len(), 1, "{:?}", program.statements);
        program.statements.into_iter().next().unwrap().node
    }

    #[test]
    fn test_parse_function() {
        let source = "def add(a: int, b: int) -> int:\n    return a + b\n";
        match single(source) {
            Statement::FunctionDef(f) => {
                assert_eq!(f.name.node, "add");
                assert_eq!(f.params.len(), 2);
                assert_eq!(f.params[1].node.name, "b");
                assert_eq!(f.return_type.map(|t| t.node), Some(Expr::Name("int".into())));
                assert!(matches!(f.body[0].node, Statement::Return(Some(_))));
            }
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_function_without_return_annotation_parses() {
        match single("def f(x):\n    pass\n") {
            Statement::FunctionDef(f) => {
                assert!(f.return_type.is_none());
                assert!(f.params[0].node.annotation.is_none());
            }
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_inline_suite() {
        match single("def f() -> None: pass\n") {
            Statement::FunctionDef(f) => assert_eq!(f.body.len(), 1),
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_class() {
        let source = "class Point:\n    x: int\n    y: int\n\n    def norm(self) -> int:\n        return self.x\n";
        match single(source) {
            Statement::ClassDef(c) => {
                assert_eq!(c.name.node, "Point");
                assert_eq!(c.body.len(), 3);
            }
            other => panic!("Expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_import_forms() {
        let program = parse_str("import a, b.c as d, x.y.z\nfrom e.f import g, h as i\n").unwrap();
        assert_eq!(program.imported_modules(), vec!["a", "b.c", "x.y.z", "e.f"]);
        match &program.statements[0].node {
            Statement::Import(import) => {
                assert_eq!(import.names[1].node.bound_name(), "d");
                assert_eq!(import.names[0].node.bound_name(), "a");
                assert_eq!(import.names[2].node.bound_name(), "x");
            }
            other => panic!("Expected import, got {:?}", other),
        }
        match &program.statements[1].node {
            Statement::FromImport(from) => {
                assert_eq!(from.module.node, "e.f");
                assert_eq!(from.names[1].node.path, "h");
                assert_eq!(from.names[1].node.alias.as_deref(), Some("i"));
            }
            other => panic!("Expected from-import, got {:?}", other),
        }
    }

    #[test]
    fn test_annotated_and_augmented_assignment() {
        let program = parse_str("x: int = 1\ny: str\nx += 2\nobj.field = 3\n").unwrap();
        assert!(matches!(
            &program.statements[0].node,
            Statement::Assign(AssignStmt { annotation: Some(_), value: Some(_), .. })
        ));
        assert!(matches!(
            &program.statements[1].node,
            Statement::Assign(AssignStmt { annotation: Some(_), value: None, .. })
        ));
        assert!(matches!(
            &program.statements[2].node,
            Statement::AugAssign(AugAssignStmt { op: BinaryOp::Add, .. })
        ));
        assert!(matches!(&program.statements[3].node, Statement::Assign(_)));
    }

    #[test]
    fn test_if_elif_else() {
        let source = "if a:\n    pass\nelif b:\n    pass\nelif c:\n    pass\nelse:\n    pass\n";
        match single(source) {
            Statement::If(stmt) => {
                assert_eq!(stmt.branches.len(), 3);
                assert!(stmt.else_body.is_some());
            }
            other => panic!("Expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        let Statement::Expr(expr) = single("-2 ** 2 + 3 * 4\n") else {
            panic!("expected expression statement");
        };
        let Expr::Binary { left, op: BinaryOp::Add, right } = expr.node else {
            panic!("expected addition at the root");
        };
        assert!(matches!(left.node, Expr::Unary { op: UnaryOp::Neg, .. }));
        assert!(matches!(right.node, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_not_in_and_is_not() {
        let Statement::Expr(expr) = single("a not in b and c is not None\n") else {
            panic!("expected expression statement");
        };
        let Expr::BoolOp { left, op: BoolOp::And, right } = expr.node else {
            panic!("expected `and` at the root");
        };
        assert!(matches!(left.node, Expr::Compare { op: CompareOp::NotIn, .. }));
        assert!(matches!(right.node, Expr::Compare { op: CompareOp::IsNot, .. }));
    }

    #[test]
    fn test_postfix_chain() {
        let Statement::Expr(expr) = single("a.b(1, 2)[0]\n") else {
            panic!("expected expression statement");
        };
        assert_eq!(expr.span, Span::new(0, 12));
        let Expr::Subscript { value, .. } = expr.node else {
            panic!("expected subscript");
        };
        assert!(matches!(value.node, Expr::Call { ref args, .. } if args.len() == 2));
    }

    #[test]
    fn test_statement_span_excludes_layout() {
        let program = parse_str("x = 1\ndef f() -> int:\n    return 1\n").unwrap();
        assert_eq!(program.statements[0].span, Span::new(0, 5));
        assert_eq!(program.statements[1].span, Span::new(6, 34));
    }

    #[test]
    fn test_unexpected_indent_at_toplevel_is_single_clear_error() {
        let err = parse_str("  x = 1\n").expect_err("top-level indentation should be rejected");
        assert_eq!(err.len(), 1, "no cascade: {:?}", err);
        assert_eq!(err[0].message, "Unexpected indent");
    }

    #[test]
    fn test_recovers_after_error() {
        let err = parse_str("x = = 1\ny = *\nz = 3\n").unwrap_err();
        assert_eq!(err.len(), 2, "{:?}", err);
        assert!(err[0].message.starts_with("Expected expression"));
    }

    #[test]
    fn test_cannot_assign_to_call() {
        let err = parse_str("f() = 1\n").unwrap_err();
        assert_eq!(err[0].message, "Cannot assign to call");
    }

    #[test]
    fn test_missing_colon() {
        let err = parse_str("while x\n    pass\n").unwrap_err();
        assert_eq!(err[0].message, "Expected ':' before 'while' body, found end of line");
    }
}
