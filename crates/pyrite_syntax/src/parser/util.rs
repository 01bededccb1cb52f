/// Miscellaneous parser utilities: identifiers and span bookkeeping.
impl<'a> Parser<'a> {
    fn identifier(&mut self) -> Result<Ident, SyntaxError> {
        Ok(self.identifier_spanned()?.node)
    }

    fn identifier_spanned(&mut self) -> Result<Spanned<Ident>, SyntaxError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let span = self.current_span();
                let name = name.clone();
                self.advance();
                Ok(Spanned::new(name, span))
            }
            _ => Err(self.unexpected("Expected identifier")),
        }
    }

    /// `a.b.c`, joined back into a single dotted string.
    fn dotted_name(&mut self) -> Result<Spanned<String>, SyntaxError> {
        let first = self.identifier_spanned()?;
        let mut name = first.node;
        let mut span = first.span;
        while self.match_punct(PunctuationId::Dot) {
            let part = self.identifier_spanned()?;
            name.push('.');
            name.push_str(&part.node);
            span = span.merge(part.span);
        }
        Ok(Spanned::new(name, span))
    }

    /// End offset of the last consumed token that is not layout (newline/indent/dedent).
    fn last_code_end(&self) -> usize {
        self.tokens[..self.pos]
            .iter()
            .rev()
            .find(|t| !t.kind.is_layout())
            .map(|t| t.span.end)
            .unwrap_or(0)
    }
}
