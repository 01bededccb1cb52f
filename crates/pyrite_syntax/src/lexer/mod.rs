//! Lexer for the Pyrite programming language
//!
//! Handles tokenization including:
//! - Keywords and identifiers
//! - Integer, float, and string literals (including triple-quoted docstrings)
//! - Operators and punctuation
//! - Indentation-based blocks (INDENT/DEDENT tokens)
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `strings` - String scanning
//! - `numbers` - Numeric literal scanning
//! - `indent` - INDENT/DEDENT handling

mod indent;
mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::SyntaxError;
use pyrite_core::lang::operators::OperatorId;
use pyrite_core::lang::punctuation::PunctuationId;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// [Start of line] → count spaces → [Inside code]
//                                       ↓
//                                      see '(' → [bracket_depth++]
//                                       ↓
//                                      see '\n' → skip (inside brackets)
//                                       ↓
//                                      see ')' → [bracket_depth--]
// ============================================================================

/// Lexer for Pyrite source code.
///
/// Converts source text into a stream of tokens. Newlines inside brackets are implicit line
/// continuations and produce no `Newline` token.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    indent_stack: Vec<usize>,
    pending_dedents: usize,
    at_line_start: bool,
    bracket_depth: usize,
    tokens: Vec<Token>,
    errors: Vec<SyntaxError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            indent_stack: vec![0],
            pending_dedents: 0,
            at_line_start: true,
            bracket_depth: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// The token stream always ends with an `Eof` token, and the last logical line is always
    /// terminated by a `Newline` even when the file lacks a trailing newline.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<SyntaxError>> {
        while !self.is_at_end() || self.pending_dedents > 0 {
            self.scan_token();
        }

        let end = Span::new(self.current_pos, self.current_pos);

        if self.bracket_depth > 0 {
            self.errors.push(SyntaxError::new("Unclosed bracket at end of file", end));
        }

        if self.tokens.last().is_some_and(|t| !t.kind.is_layout()) {
            self.tokens.push(Token::new(TokenKind::Newline, end));
        }

        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.tokens.push(Token::new(TokenKind::Dedent, end));
        }

        self.tokens.push(Token::new(TokenKind::Eof, end));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        if self.pending_dedents > 0 {
            self.pending_dedents -= 1;
            self.tokens.push(Token::new(
                TokenKind::Dedent,
                Span::new(self.current_pos, self.current_pos),
            ));
            return;
        }

        if self.at_line_start && self.bracket_depth == 0 {
            self.handle_indentation();
            return;
        }

        // Skip whitespace (but not newlines)
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }

        let start = self.current_pos;

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            '#' => {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            }

            '\n' => {
                if self.bracket_depth > 0 {
                    return;
                }
                self.tokens
                    .push(Token::new(TokenKind::Newline, Span::new(start, self.current_pos)));
                self.at_line_start = true;
            }

            // Explicit line continuation
            '\\' if self.peek() == Some('\n') => {
                self.advance();
            }

            '+' => self.operator(start, OperatorId::Plus, &[('=', OperatorId::PlusEq)]),
            '-' => {
                if self.match_char('>') {
                    self.add_punct(PunctuationId::Arrow, start);
                } else if self.match_char('=') {
                    self.add_op(OperatorId::MinusEq, start);
                } else {
                    self.add_op(OperatorId::Minus, start);
                }
            }
            '*' => self.operator(
                start,
                OperatorId::Star,
                &[('*', OperatorId::StarStar), ('=', OperatorId::StarEq)],
            ),
            '/' => self.scan_slash(start),
            '%' => self.operator(start, OperatorId::Percent, &[('=', OperatorId::PercentEq)]),
            ',' => self.add_punct(PunctuationId::Comma, start),
            ':' => self.add_punct(PunctuationId::Colon, start),
            '(' => self.open_bracket(PunctuationId::LParen, start),
            ')' => self.close_bracket(PunctuationId::RParen, start),
            '[' => self.open_bracket(PunctuationId::LBracket, start),
            ']' => self.close_bracket(PunctuationId::RBracket, start),
            '{' => self.open_bracket(PunctuationId::LBrace, start),
            '}' => self.close_bracket(PunctuationId::RBrace, start),
            '=' => self.operator(start, OperatorId::Eq, &[('=', OperatorId::EqEq)]),
            '!' => {
                if self.match_char('=') {
                    self.add_op(OperatorId::NotEq, start);
                } else {
                    self.errors.push(SyntaxError::new(
                        "Unexpected character '!'",
                        Span::new(start, self.current_pos),
                    ));
                }
            }
            '<' => self.operator(start, OperatorId::Lt, &[('=', OperatorId::LtEq)]),
            '>' => self.operator(start, OperatorId::Gt, &[('=', OperatorId::GtEq)]),
            '.' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number(start, c);
                } else if self.peek() == Some('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    self.add_punct(PunctuationId::Ellipsis, start);
                } else {
                    self.add_punct(PunctuationId::Dot, start);
                }
            }

            '"' => self.scan_string(start, '"'),
            '\'' => self.scan_string(start, '\''),

            '0'..='9' => self.scan_number(start, c),

            _ if is_ident_start(c) => self.scan_identifier(start),

            _ => {
                self.errors.push(SyntaxError::new(
                    format!("Unexpected character '{}'", c),
                    Span::new(start, self.current_pos),
                ));
            }
        }
    }

    // ========================================================================
    // Operator helpers
    // ========================================================================

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos)));
    }

    fn add_op(&mut self, id: OperatorId, start: usize) {
        self.add_token(TokenKind::Operator(id), start);
    }

    fn add_punct(&mut self, id: PunctuationId, start: usize) {
        self.add_token(TokenKind::Punctuation(id), start);
    }

    /// Try to match a compound operator, falling back to the simple one.
    fn operator(&mut self, start: usize, simple: OperatorId, compounds: &[(char, OperatorId)]) {
        for (c, id) in compounds {
            if self.match_char(*c) {
                self.add_op(*id, start);
                return;
            }
        }
        self.add_op(simple, start);
    }

    /// Scan slash operators: `/`, `/=`, `//`, `//=`.
    fn scan_slash(&mut self, start: usize) {
        if self.match_char('/') {
            if self.match_char('=') {
                self.add_op(OperatorId::SlashSlashEq, start);
            } else {
                self.add_op(OperatorId::SlashSlash, start);
            }
        } else if self.match_char('=') {
            self.add_op(OperatorId::SlashEq, start);
        } else {
            self.add_op(OperatorId::Slash, start);
        }
    }

    fn open_bracket(&mut self, kind: PunctuationId, start: usize) {
        self.bracket_depth += 1;
        self.add_punct(kind, start);
    }

    fn close_bracket(&mut self, kind: PunctuationId, start: usize) {
        if self.bracket_depth == 0 {
            self.errors.push(SyntaxError::new(
                "Unmatched closing bracket",
                Span::new(start, self.current_pos),
            ));
        } else {
            self.bracket_depth -= 1;
        }
        self.add_punct(kind, start);
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start);
        }
    }
}

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<SyntaxError>> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pyrite_core::lang::keywords::KeywordId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .unwrap_or_else(|errs| panic!("lex({:?}) failed: {:?}", source, errs))
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keyword_registry_parity() {
        use pyrite_core::lang::keywords;

        for k in keywords::KEYWORDS {
            let tokens = kinds(k.canonical);
            assert_eq!(tokens[0], TokenKind::Keyword(k.id), "keyword {:?}", k.id);
        }
    }

    #[test]
    fn test_operator_registry_parity() {
        use pyrite_core::lang::operators;

        for o in operators::OPERATORS {
            let tokens = kinds(o.spelling);
            assert_eq!(tokens[0], TokenKind::Operator(o.id), "operator {:?}", o.id);
        }
    }

    #[test]
    fn test_simple_function() {
        let tokens = kinds("def f(x: int) -> int:\n    return x\n");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Keyword(KeywordId::Def),
                TokenKind::Ident("f".into()),
                TokenKind::Punctuation(PunctuationId::LParen),
                TokenKind::Ident("x".into()),
                TokenKind::Punctuation(PunctuationId::Colon),
                TokenKind::Ident("int".into()),
                TokenKind::Punctuation(PunctuationId::RParen),
                TokenKind::Punctuation(PunctuationId::Arrow),
                TokenKind::Ident("int".into()),
                TokenKind::Punctuation(PunctuationId::Colon),
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Keyword(KeywordId::Return),
                TokenKind::Ident("x".into()),
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_missing_trailing_newline_is_terminated() {
        let tokens = kinds("pass");
        assert_eq!(
            tokens,
            vec![TokenKind::Keyword(KeywordId::Pass), TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn test_newlines_inside_brackets_are_ignored() {
        let tokens = kinds("f(1,\n  2)\n");
        assert!(!tokens[..tokens.len() - 2].contains(&TokenKind::Newline));
        assert!(!tokens.contains(&TokenKind::Indent));
    }

    #[test]
    fn test_blank_and_comment_lines_do_not_affect_indentation() {
        let tokens = kinds("if x:\n\n    # note\n    pass\n");
        let indents = tokens.iter().filter(|t| **t == TokenKind::Indent).count();
        let dedents = tokens.iter().filter(|t| **t == TokenKind::Dedent).count();
        assert_eq!(indents, 1);
        assert_eq!(dedents, 1);
    }

    #[test]
    fn test_multiple_dedents() {
        let tokens = kinds("if a:\n    if b:\n        pass\nx\n");
        let pos = tokens
            .iter()
            .position(|t| *t == TokenKind::Ident("x".into()))
            .unwrap();
        assert_eq!(tokens[pos - 1], TokenKind::Dedent);
        assert_eq!(tokens[pos - 2], TokenKind::Dedent);
    }

    #[test]
    fn test_inconsistent_dedent_is_an_error() {
        let errs = lex("if a:\n    pass\n  pass\n").unwrap_err();
        assert!(errs[0].message.contains("Inconsistent indentation"));
    }

    #[test]
    fn test_unexpected_character() {
        let errs = lex("x = $\n").unwrap_err();
        assert_eq!(errs[0].message, "Unexpected character '$'");
        assert_eq!(errs[0].span, Span::new(4, 5));
    }

    #[test]
    fn test_ellipsis_and_dot() {
        let tokens = kinds("a.b ...");
        assert_eq!(tokens[1], TokenKind::Punctuation(PunctuationId::Dot));
        assert_eq!(tokens[3], TokenKind::Punctuation(PunctuationId::Ellipsis));
    }
}
