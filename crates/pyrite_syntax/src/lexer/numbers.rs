//! Number scanning for the Pyrite lexer
//!
//! Handles integer and floating-point literals. Underscores are accepted as digit separators.

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::Span;
use crate::diagnostics::SyntaxError;

impl<'a> Lexer<'a> {
    /// Scan a numeric literal whose first character (`first`) has already been consumed.
    ///
    /// `first` is either a digit or the `.` of a literal like `.5`.
    pub(super) fn scan_number(&mut self, start: usize, first: char) {
        let mut value = String::from(first);
        let mut is_float = first == '.';

        self.scan_digits(&mut value);

        if !is_float && self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            value.push('.');
            self.advance();
            self.scan_digits(&mut value);
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            value.push('e');
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.peek() {
                value.push(sign);
                self.advance();
            }
            self.scan_digits(&mut value);
        }

        let span = Span::new(start, self.current_pos);
        if is_float {
            match value.parse::<f64>() {
                Ok(f) => self.add_token(TokenKind::Float(f), start),
                Err(_) => self
                    .errors
                    .push(SyntaxError::new(format!("Invalid float literal: {}", value), span)),
            }
        } else {
            match value.parse::<i64>() {
                Ok(i) => self.add_token(TokenKind::Int(i), start),
                Err(_) => self
                    .errors
                    .push(SyntaxError::new(format!("Invalid integer literal: {}", value), span)),
            }
        }
    }

    fn scan_digits(&mut self, value: &mut String) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                value.push(c);
                self.advance();
            } else if c == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, lex};

    fn first(source: &str) -> TokenKind {
        lex(source).unwrap()[0].kind.clone()
    }

    #[test]
    fn test_integers_and_floats() {
        assert_eq!(first("42"), TokenKind::Int(42));
        assert_eq!(first("1_000"), TokenKind::Int(1000));
        assert_eq!(first("3.25"), TokenKind::Float(3.25));
        assert_eq!(first(".5"), TokenKind::Float(0.5));
        assert_eq!(first("2e3"), TokenKind::Float(2000.0));
    }

    #[test]
    fn test_attribute_after_integer_is_not_a_float() {
        let tokens = lex("1.real").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Int(1));
    }

    #[test]
    fn test_integer_overflow_is_reported() {
        let errs = lex("99999999999999999999").unwrap_err();
        assert!(errs[0].message.starts_with("Invalid integer literal"));
    }
}
