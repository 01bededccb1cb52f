//! Syntax diagnostics.
//!
//! The lexer and parser report [`SyntaxError`]s carrying a byte span. Line/column lookup lives here
//! too, since every later phase that points at source text needs the same arithmetic.

use crate::ast::Span;

/// A lexing or parsing error with location information.
#[derive(Debug, Clone, PartialEq, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
#[diagnostic(code(pyrite::syntax))]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// 1-based line number of the error in `source`.
    pub fn line(&self, source: &str) -> usize {
        line_info(source, self.span.start).0
    }
}

/// Get line number, column number, and line text for a byte offset.
///
/// Line and column are 1-based. Offsets past the end clamp to the last line.
pub fn line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());

    let line_text = &source[line_start..line_end];
    let col_num = offset - line_start + 1;

    (line_num, col_num, line_text)
}

/// Render a syntax error with its source line and a caret, without color.
pub fn format_error(file_name: &str, source: &str, error: &SyntaxError) -> String {
    let (line_num, col_num, line_text) = line_info(source, error.span.start);
    let width = line_num.to_string().len();

    let underline_len = if error.span.end > error.span.start {
        (error.span.end - error.span.start).min(line_text.len().saturating_sub(col_num - 1)).max(1)
    } else {
        1
    };

    format!(
        "syntax error: {message}\n  --> {file_name}:{line_num}:{col_num}\n  {blank:>width$} |\n  {line_num:>width$} | {line_text}\n  {blank:>width$} | {pad}{carets}\n",
        message = error.message,
        blank = "",
        pad = " ".repeat(col_num - 1),
        carets = "^".repeat(underline_len),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_info() {
        let source = "line 1\nline 2\nline 3";

        let (line, col, text) = line_info(source, 0);
        assert_eq!(line, 1);
        assert_eq!(col, 1);
        assert_eq!(text, "line 1");

        let (line, col, text) = line_info(source, 7);
        assert_eq!(line, 2);
        assert_eq!(col, 1);
        assert_eq!(text, "line 2");

        let (line, col, text) = line_info(source, 10);
        assert_eq!(line, 2);
        assert_eq!(col, 4);
        assert_eq!(text, "line 2");
    }

    #[test]
    fn test_line_info_clamps_past_end() {
        let (line, _, text) = line_info("a\nb", 100);
        assert_eq!(line, 2);
        assert_eq!(text, "b");
    }

    #[test]
    fn test_format_error() {
        let source = "x = 1\ny = (2\n";
        let err = SyntaxError::new("Expected ')'", Span::new(10, 11));
        insta::assert_snapshot!(format_error("main.py", source, &err).trim_end(), @r"
        syntax error: Expected ')'
          --> main.py:2:5
            |
          2 | y = (2
            |     ^
        ");
    }
}
