//! Indentation handling for the Pyrite lexer
//!
//! Implements Python-style INDENT/DEDENT tokens.

use super::Lexer;
use super::tokens::{Token, TokenKind};
use crate::ast::Span;
use crate::diagnostics::SyntaxError;

impl<'a> Lexer<'a> {
    pub(super) fn handle_indentation(&mut self) {
        let start = self.current_pos;
        let mut indent = 0;

        while let Some(c) = self.peek() {
            match c {
                ' ' => {
                    indent += 1;
                    self.advance();
                }
                '\t' => {
                    // A tab counts as 4 spaces
                    indent += 4;
                    self.advance();
                }
                '#' => {
                    // Comment-only line
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                    if self.peek() == Some('\n') {
                        self.advance();
                    }
                    return;
                }
                '\n' => {
                    // Blank line
                    self.advance();
                    return;
                }
                '\r' => {
                    self.advance();
                }
                _ => break,
            }
        }

        if self.is_at_end() {
            self.at_line_start = false;
            return;
        }

        let current_indent = self.indent_stack.last().copied().unwrap_or(0);

        if indent > current_indent {
            self.indent_stack.push(indent);
            self.tokens
                .push(Token::new(TokenKind::Indent, Span::new(start, self.current_pos)));
        } else if indent < current_indent {
            let mut count = 0;
            while let Some(&top) = self.indent_stack.last() {
                if indent >= top || self.indent_stack.len() == 1 {
                    break;
                }
                self.indent_stack.pop();
                count += 1;
            }

            let final_indent = self.indent_stack.last().copied().unwrap_or(0);
            if indent != final_indent {
                self.errors.push(SyntaxError::new(
                    format!(
                        "Inconsistent indentation: expected {} spaces, got {}",
                        final_indent, indent
                    ),
                    Span::new(start, self.current_pos),
                ));
            }

            if count > 0 {
                self.tokens
                    .push(Token::new(TokenKind::Dedent, Span::new(start, self.current_pos)));
                self.pending_dedents = count - 1;
            }
        }

        self.at_line_start = false;
    }
}
