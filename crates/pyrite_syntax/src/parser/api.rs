/// Parse a token stream into a [`Program`].
///
/// ## Errors
/// Returns `Err(Vec<SyntaxError>)` if parsing fails.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Program, Vec<SyntaxError>> {
    Parser::new(tokens).parse()
}

/// Lex and parse source text in one step.
///
/// Lexer errors are returned as-is; the parser only runs on a clean token stream.
pub fn parse_source(source: &str) -> Result<Program, Vec<SyntaxError>> {
    let tokens = crate::lexer::lex(source)?;
    parse(&tokens)
}
