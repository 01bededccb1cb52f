/// Statement parsing methods.
///
/// This chunk parses statement forms (`if`, `while`, `return`, assignments, ...) as well as
/// indentation-based suites.
///
/// ## Notes
/// - Simple statements end at a `Newline`; compound statements end after their suite's `Dedent`.
/// - Statement spans cover source text only, never the trailing layout tokens.
impl<'a> Parser<'a> {
    fn statement(&mut self) -> Result<Spanned<Statement>, SyntaxError> {
        let start = self.current_span().start;

        let stmt = if self.check(&TokenKind::Indent) {
            return Err(SyntaxError::new("Unexpected indent", self.current_span()));
        } else if self.check_keyword(KeywordId::Def) {
            self.function_def()?
        } else if self.check_keyword(KeywordId::Class) {
            self.class_def()?
        } else if self.check_keyword(KeywordId::If) {
            self.if_stmt()?
        } else if self.check_keyword(KeywordId::While) {
            self.while_stmt()?
        } else {
            let stmt = self.simple_statement()?;
            let span = Span::new(start, self.previous_end());
            self.end_of_statement()?;
            return Ok(Spanned::new(stmt, span));
        };

        Ok(Spanned::new(stmt, Span::new(start, self.last_code_end())))
    }

    fn simple_statement(&mut self) -> Result<Statement, SyntaxError> {
        if self.match_keyword(KeywordId::Return) {
            let value = if self.is_at_expr_start() {
                Some(self.expression()?)
            } else {
                None
            };
            Ok(Statement::Return(value))
        } else if self.match_keyword(KeywordId::Pass) || self.match_punct(PunctuationId::Ellipsis) {
            Ok(Statement::Pass)
        } else if self.match_keyword(KeywordId::Break) {
            Ok(Statement::Break)
        } else if self.match_keyword(KeywordId::Continue) {
            Ok(Statement::Continue)
        } else if self.check_keyword(KeywordId::Import) {
            self.import_stmt()
        } else if self.check_keyword(KeywordId::From) {
            self.from_import_stmt()
        } else {
            self.assignment_or_expr_stmt()
        }
    }

    fn end_of_statement(&mut self) -> Result<(), SyntaxError> {
        if self.match_token(&TokenKind::Newline)
            || self.check(&TokenKind::Dedent)
            || self.is_at_end()
        {
            Ok(())
        } else {
            Err(self.unexpected("Expected end of statement"))
        }
    }

    /// `: NEWLINE INDENT stmts DEDENT`, or a single simple statement on the same line.
    fn suite(&mut self, what: &str) -> Result<Vec<Spanned<Statement>>, SyntaxError> {
        self.expect_punct(PunctuationId::Colon, &format!("Expected ':' before {}", what))?;

        if !self.check(&TokenKind::Newline) {
            let start = self.current_span().start;
            let stmt = self.simple_statement()?;
            let span = Span::new(start, self.previous_end());
            self.end_of_statement()?;
            return Ok(vec![Spanned::new(stmt, span)]);
        }

        self.expect(&TokenKind::Newline, "Expected newline after ':'")?;
        self.skip_newlines();
        self.expect(&TokenKind::Indent, &format!("Expected an indented {}", what))?;

        let mut stmts = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenKind::Dedent) && !self.is_at_end() {
            stmts.push(self.statement()?);
            self.skip_newlines();
        }
        self.match_token(&TokenKind::Dedent);
        Ok(stmts)
    }

    fn if_stmt(&mut self) -> Result<Statement, SyntaxError> {
        self.expect_keyword(KeywordId::If, "Expected 'if'")?;
        let condition = self.expression()?;
        let body = self.suite("'if' body")?;
        let mut branches = vec![(condition, body)];

        while self.match_keyword(KeywordId::Elif) {
            let condition = self.expression()?;
            let body = self.suite("'elif' body")?;
            branches.push((condition, body));
        }

        let else_body = if self.match_keyword(KeywordId::Else) {
            Some(self.suite("'else' body")?)
        } else {
            None
        };

        Ok(Statement::If(IfStmt { branches, else_body }))
    }

    fn while_stmt(&mut self) -> Result<Statement, SyntaxError> {
        self.expect_keyword(KeywordId::While, "Expected 'while'")?;
        let condition = self.expression()?;
        let body = self.suite("'while' body")?;
        Ok(Statement::While(WhileStmt { condition, body }))
    }

    fn assignment_or_expr_stmt(&mut self) -> Result<Statement, SyntaxError> {
        let expr = self.expression()?;

        if self.match_punct(PunctuationId::Colon) {
            Self::check_assign_target(&expr)?;
            let annotation = self.expression()?;
            let value = if self.match_op(OperatorId::Eq) {
                Some(self.expression()?)
            } else {
                None
            };
            return Ok(Statement::Assign(AssignStmt {
                target: expr,
                annotation: Some(annotation),
                value,
            }));
        }

        if self.match_op(OperatorId::Eq) {
            Self::check_assign_target(&expr)?;
            let value = self.expression()?;
            if self.check_op(OperatorId::Eq) {
                return Err(SyntaxError::new(
                    "Chained assignment is not supported",
                    self.current_span(),
                ));
            }
            return Ok(Statement::Assign(AssignStmt {
                target: expr,
                annotation: None,
                value: Some(value),
            }));
        }

        if let Some(op) = self.peek().operator_id().and_then(augmented_op) {
            self.advance();
            Self::check_assign_target(&expr)?;
            let value = self.expression()?;
            return Ok(Statement::AugAssign(AugAssignStmt {
                target: expr,
                op,
                value,
            }));
        }

        Ok(Statement::Expr(expr))
    }

    fn check_assign_target(target: &Spanned<Expr>) -> Result<(), SyntaxError> {
        match target.node {
            Expr::Name(_) | Expr::Attribute { .. } | Expr::Subscript { .. } => Ok(()),
            ref other => Err(SyntaxError::new(
                format!("Cannot assign to {}", other.describe()),
                target.span,
            )),
        }
    }
}

/// Map an augmented-assignment operator (`+=`, ...) to its arithmetic operator.
fn augmented_op(id: OperatorId) -> Option<BinaryOp> {
    match id {
        OperatorId::PlusEq => Some(BinaryOp::Add),
        OperatorId::MinusEq => Some(BinaryOp::Sub),
        OperatorId::StarEq => Some(BinaryOp::Mul),
        OperatorId::SlashEq => Some(BinaryOp::Div),
        OperatorId::SlashSlashEq => Some(BinaryOp::FloorDiv),
        OperatorId::PercentEq => Some(BinaryOp::Mod),
        _ => None,
    }
}
