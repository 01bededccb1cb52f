/// Parser core type and entrypoint.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// The stream must end with [`TokenKind::Eof`], as produced by `pyrite_syntax::lexer`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the entire token stream into a [`Program`].
    ///
    /// ## Errors
    /// Returns every [`SyntaxError`] found. After an error the parser skips to the next
    /// statement boundary and keeps going, so one pass can report several problems.
    pub fn parse(mut self) -> Result<Program, Vec<SyntaxError>> {
        let mut statements = Vec::new();

        self.skip_newlines();
        self.skip_dedents();

        while !self.is_at_end() {
            match self.statement() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
            self.skip_newlines();
            // Recovery can leave us on DEDENTs that belong to a block we bailed out of.
            self.skip_dedents();
        }

        if self.errors.is_empty() {
            Ok(Program { statements })
        } else {
            Err(self.errors)
        }
    }
}
