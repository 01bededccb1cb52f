/// Expression parsing methods.
///
/// Precedence ladder, loosest first:
/// `or` → `and` → `not` → comparison → additive → multiplicative → unary minus → power →
/// postfix (call/attribute/subscript) → primary.
impl<'a> Parser<'a> {
    fn expression(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let mut left = self.and_expr()?;
        while self.match_keyword(KeywordId::Or) {
            let right = self.and_expr()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(
                Expr::BoolOp {
                    left: Box::new(left),
                    op: BoolOp::Or,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let mut left = self.not_expr()?;
        while self.match_keyword(KeywordId::And) {
            let right = self.not_expr()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(
                Expr::BoolOp {
                    left: Box::new(left),
                    op: BoolOp::And,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        if self.match_keyword(KeywordId::Not) {
            let start = self.tokens[self.pos - 1].span.start;
            let operand = self.not_expr()?;
            let span = Span::new(start, operand.span.end);
            Ok(Spanned::new(
                Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                span,
            ))
        } else {
            self.comparison()
        }
    }

    fn comparison(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let mut left = self.additive()?;

        loop {
            let op = if self.match_op(OperatorId::EqEq) {
                CompareOp::Eq
            } else if self.match_op(OperatorId::NotEq) {
                CompareOp::NotEq
            } else if self.match_op(OperatorId::Lt) {
                CompareOp::Lt
            } else if self.match_op(OperatorId::LtEq) {
                CompareOp::LtEq
            } else if self.match_op(OperatorId::Gt) {
                CompareOp::Gt
            } else if self.match_op(OperatorId::GtEq) {
                CompareOp::GtEq
            } else if self.match_keyword(KeywordId::In) {
                CompareOp::In
            } else if self.check_keyword(KeywordId::Not) && self.peek_next().kind.is_keyword(KeywordId::In) {
                self.advance(); // not
                self.advance(); // in
                CompareOp::NotIn
            } else if self.match_keyword(KeywordId::Is) {
                if self.match_keyword(KeywordId::Not) {
                    CompareOp::IsNot
                } else {
                    CompareOp::Is
                }
            } else {
                break;
            };

            let right = self.additive()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(
                Expr::Compare {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn additive(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let mut left = self.multiplicative()?;

        loop {
            let op = if self.match_op(OperatorId::Plus) {
                BinaryOp::Add
            } else if self.match_op(OperatorId::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let right = self.multiplicative()?;
            left = binary(left, op, right);
        }

        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let mut left = self.unary()?;

        loop {
            let op = if self.match_op(OperatorId::Star) {
                BinaryOp::Mul
            } else if self.match_op(OperatorId::Slash) {
                BinaryOp::Div
            } else if self.match_op(OperatorId::SlashSlash) {
                BinaryOp::FloorDiv
            } else if self.match_op(OperatorId::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };
            let right = self.unary()?;
            left = binary(left, op, right);
        }

        Ok(left)
    }

    /// Unary minus binds looser than `**`: `-2 ** 2` is `-(2 ** 2)`.
    fn unary(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        if self.match_op(OperatorId::Minus) {
            let start = self.tokens[self.pos - 1].span.start;
            let operand = self.unary()?;
            let span = Span::new(start, operand.span.end);
            Ok(Spanned::new(
                Expr::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                },
                span,
            ))
        } else {
            self.power()
        }
    }

    fn power(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let left = self.postfix()?;

        // Right-associative: 2**3**2 = 2**(3**2)
        if self.match_op(OperatorId::StarStar) {
            let right = self.unary()?;
            return Ok(binary(left, BinaryOp::Pow, right));
        }

        Ok(left)
    }

    fn postfix(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let mut expr = self.primary()?;

        loop {
            if self.match_punct(PunctuationId::Dot) {
                let attr = self.identifier()?;
                let span = Span::new(expr.span.start, self.previous_end());
                expr = Spanned::new(
                    Expr::Attribute {
                        value: Box::new(expr),
                        attr,
                    },
                    span,
                );
            } else if self.match_punct(PunctuationId::LBracket) {
                let index = self.expression()?;
                self.expect_punct(PunctuationId::RBracket, "Expected ']' after index")?;
                let span = Span::new(expr.span.start, self.previous_end());
                expr = Spanned::new(
                    Expr::Subscript {
                        value: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else if self.match_punct(PunctuationId::LParen) {
                let args = self.expression_list(PunctuationId::RParen)?;
                self.expect_punct(PunctuationId::RParen, "Expected ')' after arguments")?;
                let span = Span::new(expr.span.start, self.previous_end());
                expr = Spanned::new(
                    Expr::Call {
                        func: Box::new(expr),
                        args,
                    },
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let start = self.current_span().start;

        let expr = match &self.peek().kind {
            TokenKind::Ident(name) => Expr::Name(name.clone()),
            TokenKind::Int(v) => Expr::Int(*v),
            TokenKind::Float(v) => Expr::Float(*v),
            TokenKind::String(s) => {
                let mut value = s.clone();
                self.advance();
                // Adjacent string literals concatenate
                while let TokenKind::String(next) = &self.peek().kind {
                    value.push_str(next);
                    self.advance();
                }
                return Ok(Spanned::new(Expr::Str(value), Span::new(start, self.previous_end())));
            }
            TokenKind::Keyword(KeywordId::True) => Expr::Bool(true),
            TokenKind::Keyword(KeywordId::False) => Expr::Bool(false),
            TokenKind::Keyword(KeywordId::None) => Expr::None,
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                let inner = self.expression()?;
                if self.check_punct(PunctuationId::Comma) {
                    return Err(SyntaxError::new("Tuples are not supported", self.current_span()));
                }
                self.expect_punct(PunctuationId::RParen, "Expected ')'")?;
                // Parentheses widen the span but do not create a node.
                return Ok(Spanned::new(inner.node, Span::new(start, self.previous_end())));
            }
            TokenKind::Punctuation(PunctuationId::LBracket) => {
                self.advance();
                let items = self.expression_list(PunctuationId::RBracket)?;
                self.expect_punct(PunctuationId::RBracket, "Expected ']' after list items")?;
                return Ok(Spanned::new(Expr::List(items), Span::new(start, self.previous_end())));
            }
            _ => return Err(self.unexpected("Expected expression")),
        };

        self.advance();
        Ok(Spanned::new(expr, Span::new(start, self.previous_end())))
    }

    /// Comma-separated expressions up to (not including) `close`. A trailing comma is allowed.
    fn expression_list(&mut self, close: PunctuationId) -> Result<Vec<Spanned<Expr>>, SyntaxError> {
        let mut items = Vec::new();
        while !self.check_punct(close) {
            items.push(self.expression()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        Ok(items)
    }
}

fn binary(left: Spanned<Expr>, op: BinaryOp, right: Spanned<Expr>) -> Spanned<Expr> {
    let span = left.span.merge(right.span);
    Spanned::new(
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}
