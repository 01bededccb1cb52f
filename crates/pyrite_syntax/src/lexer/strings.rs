//! String scanning for the Pyrite lexer
//!
//! Handles single- and double-quoted strings plus triple-quoted (docstring) forms.

use super::Lexer;
use super::tokens::{Token, TokenKind};
use crate::ast::Span;
use crate::diagnostics::SyntaxError;

impl<'a> Lexer<'a> {
    /// Process an escape sequence. Called after consuming the backslash.
    ///
    /// Unknown escapes are kept verbatim (backslash included). Returns `None` at end of input.
    fn scan_escape(&mut self, value: &mut String) -> Option<()> {
        let c = self.advance()?;
        match c {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            '0' => value.push('\0'),
            '\\' | '\'' | '"' => value.push(c),
            // Escaped newline joins lines
            '\n' => {}
            other => {
                value.push('\\');
                value.push(other);
            }
        }
        Some(())
    }

    /// Scan a string literal whose opening quote has already been consumed.
    pub(super) fn scan_string(&mut self, start: usize, quote: char) {
        let triple = self.peek() == Some(quote) && self.peek_next() == Some(quote);
        if triple {
            self.advance();
            self.advance();
        }

        let mut value = String::new();

        loop {
            let Some(c) = self.advance() else {
                self.errors.push(SyntaxError::new(
                    "Unterminated string",
                    Span::new(start, self.current_pos),
                ));
                return;
            };

            match c {
                '\\' => {
                    if self.scan_escape(&mut value).is_none() {
                        self.errors.push(SyntaxError::new(
                            "Unterminated string",
                            Span::new(start, self.current_pos),
                        ));
                        return;
                    }
                }
                c if c == quote && !triple => break,
                c if c == quote => {
                    if self.peek() == Some(quote) && self.peek_next() == Some(quote) {
                        self.advance();
                        self.advance();
                        break;
                    }
                    value.push(c);
                }
                '\n' if !triple => {
                    self.errors.push(SyntaxError::new(
                        "Unterminated string",
                        Span::new(start, self.current_pos - 1),
                    ));
                    // Leave the line break for the main loop.
                    self.at_line_start = true;
                    self.tokens.push(Token::new(
                        TokenKind::Newline,
                        Span::new(self.current_pos - 1, self.current_pos),
                    ));
                    return;
                }
                '\r' => {}
                c => value.push(c),
            }
        }

        self.add_token(TokenKind::String(value), start);
    }
}
