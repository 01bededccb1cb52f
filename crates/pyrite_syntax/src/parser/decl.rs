/// Definition and import parsing.
///
/// This chunk parses `def`, `class`, `import`, and `from ... import` statements.
impl<'a> Parser<'a> {
    fn function_def(&mut self) -> Result<Statement, SyntaxError> {
        self.expect_keyword(KeywordId::Def, "Expected 'def'")?;
        let name = self.identifier_spanned()?;

        self.expect_punct(PunctuationId::LParen, "Expected '(' after function name")?;
        let mut params = Vec::new();
        while !self.check_punct(PunctuationId::RParen) {
            params.push(self.param()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' after parameters")?;

        let return_type = if self.match_punct(PunctuationId::Arrow) {
            Some(self.expression()?)
        } else {
            None
        };

        let body = self.suite("function body")?;

        Ok(Statement::FunctionDef(FunctionDef {
            name,
            params,
            return_type,
            body,
        }))
    }

    /// `name [: annotation]`
    fn param(&mut self) -> Result<Spanned<Param>, SyntaxError> {
        let name = self.identifier_spanned()?;
        let annotation = if self.match_punct(PunctuationId::Colon) {
            Some(self.expression()?)
        } else {
            None
        };
        if self.check_op(OperatorId::Eq) {
            return Err(SyntaxError::new(
                "Default parameter values are not supported",
                self.current_span(),
            ));
        }
        let span = Span::new(name.span.start, self.previous_end());
        Ok(Spanned::new(
            Param {
                name: name.node,
                annotation,
            },
            span,
        ))
    }

    fn class_def(&mut self) -> Result<Statement, SyntaxError> {
        self.expect_keyword(KeywordId::Class, "Expected 'class'")?;
        let name = self.identifier_spanned()?;
        if self.match_punct(PunctuationId::LParen) {
            return Err(SyntaxError::new(
                "Class inheritance is not supported",
                Span::new(self.tokens[self.pos - 1].span.start, self.current_span().end),
            ));
        }
        let body = self.suite("class body")?;
        Ok(Statement::ClassDef(ClassDef { name, body }))
    }

    /// `import a, b.c as d`
    fn import_stmt(&mut self) -> Result<Statement, SyntaxError> {
        self.expect_keyword(KeywordId::Import, "Expected 'import'")?;
        let mut names = vec![self.import_alias(true)?];
        while self.match_punct(PunctuationId::Comma) {
            names.push(self.import_alias(true)?);
        }
        Ok(Statement::Import(ImportStmt { names }))
    }

    /// `from a.b import x, y as z`
    fn from_import_stmt(&mut self) -> Result<Statement, SyntaxError> {
        self.expect_keyword(KeywordId::From, "Expected 'from'")?;
        let module = self.dotted_name()?;
        self.expect_keyword(KeywordId::Import, "Expected 'import' after module name")?;

        let parenthesized = self.match_punct(PunctuationId::LParen);
        let mut names = vec![self.import_alias(false)?];
        while self.match_punct(PunctuationId::Comma) {
            if parenthesized && self.check_punct(PunctuationId::RParen) {
                break;
            }
            names.push(self.import_alias(false)?);
        }
        if parenthesized {
            self.expect_punct(PunctuationId::RParen, "Expected ')' after imported names")?;
        }
        Ok(Statement::FromImport(FromImportStmt { module, names }))
    }

    /// One `path [as alias]` entry. `dotted` allows `a.b.c` paths (plain `import` only).
    fn import_alias(&mut self, dotted: bool) -> Result<Spanned<ImportAlias>, SyntaxError> {
        let path = if dotted {
            self.dotted_name()?
        } else {
            self.identifier_spanned()?
        };
        let alias = if self.match_keyword(KeywordId::As) {
            Some(self.identifier()?)
        } else {
            None
        };
        let span = Span::new(path.span.start, self.previous_end());
        Ok(Spanned::new(
            ImportAlias {
                path: path.node,
                alias,
            },
            span,
        ))
    }
}
