//! Error taxonomy for the compiler core.
//!
//! - [`CompileError`]: a source-related failure. [`SemanticError`] is the variant that points at the
//!   offending node, so diagnostics can print its line.
//! - [`UserError`]: an environment or setup failure unrelated to source content (unreadable file,
//!   missing backend compiler, missing standard library).
//! - [`BuildError`]: what one module's pipeline can fail with. The driver catches it per module.

use pyrite_syntax::ast::Span;
use pyrite_syntax::diagnostics::line_info;
use thiserror::Error;

/// A failure caused by the contents of a module's source.
#[derive(Debug, Clone, PartialEq, Error, miette::Diagnostic)]
pub enum CompileError {
    #[error("{message}")]
    #[diagnostic(code(pyrite::compile))]
    General { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Semantic(#[from] SemanticError),
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        CompileError::General {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CompileError::General { message } => message,
            CompileError::Semantic(err) => &err.message,
        }
    }

    pub fn as_semantic(&self) -> Option<&SemanticError> {
        match self {
            CompileError::Semantic(err) => Some(err),
            CompileError::General { .. } => None,
        }
    }
}

/// A compile error tied to a node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Error, miette::Diagnostic)]
#[error("{message}")]
#[diagnostic(code(pyrite::semantic))]
pub struct SemanticError {
    pub message: String,
    /// Byte span of the offending node in the module's source text.
    pub span: Span,
}

impl SemanticError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// 1-based line of the offending node.
    pub fn line(&self, source: &str) -> usize {
        line_info(source, self.span.start).0
    }

    /// Full text of the line holding the offending node, without its line break.
    pub fn source_line<'s>(&self, source: &'s str) -> &'s str {
        line_info(source, self.span.start).2
    }
}

/// An environment or setup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
#[error("{message}")]
#[diagnostic(code(pyrite::user))]
pub struct UserError {
    pub message: String,
}

impl UserError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure of a single module's pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    User(#[from] UserError),
}

impl From<SemanticError> for BuildError {
    fn from(err: SemanticError) -> Self {
        BuildError::Compile(CompileError::Semantic(err))
    }
}
