//! Abstract Syntax Tree definitions for Pyrite
//!
//! The tree is purely structural: names are plain strings and nothing here knows about types,
//! scopes, or modules. Every statement and expression carries a byte [`Span`] so later phases
//! can point diagnostics at the offending source line.

use std::fmt;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

/// A parsed source file: an ordered sequence of top-level statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Spanned<Statement>>,
}

impl Program {
    /// Dotted names of every module imported by a top-level `import`/`from` statement, in source
    /// order. Duplicates are kept.
    pub fn imported_modules(&self) -> Vec<String> {
        let mut out = Vec::new();
        for stmt in &self.statements {
            match &stmt.node {
                Statement::Import(import) => {
                    out.extend(import.names.iter().map(|alias| alias.node.path.clone()));
                }
                Statement::FromImport(from) => out.push(from.module.node.clone()),
                _ => {}
            }
        }
        out
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Import(ImportStmt),
    FromImport(FromImportStmt),
    Assign(AssignStmt),
    AugAssign(AugAssignStmt),
    Return(Option<Spanned<Expr>>),
    If(IfStmt),
    While(WhileStmt),
    Pass,
    Break,
    Continue,
    Expr(Spanned<Expr>),
}

/// `def name(params) -> T: body`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Spanned<Ident>,
    pub params: Vec<Spanned<Param>>,
    /// The expression after `->`, if any. Kept as an expression; the type registry decides
    /// which shapes name a type.
    pub return_type: Option<Spanned<Expr>>,
    pub body: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub annotation: Option<Spanned<Expr>>,
}

/// `class Name: body`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: Spanned<Ident>,
    pub body: Vec<Spanned<Statement>>,
}

/// `import a, b.c as d`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    pub names: Vec<Spanned<ImportAlias>>,
}

/// One `path [as alias]` entry of an import statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportAlias {
    /// Dotted module or symbol path, e.g. `"os.path"`.
    pub path: String,
    pub alias: Option<Ident>,
}

impl ImportAlias {
    /// Name the import binds in the importing module.
    ///
    /// `import a.b` binds `a` (with `b` reachable as `a.b`), `import a.b as c` binds `c`.
    pub fn bound_name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.path.split('.').next().unwrap_or(&self.path),
        }
    }
}

/// `from module import a, b as c`
#[derive(Debug, Clone, PartialEq)]
pub struct FromImportStmt {
    pub module: Spanned<String>,
    pub names: Vec<Spanned<ImportAlias>>,
}

/// `target [: annotation] [= value]`
///
/// At least one of `annotation` and `value` is present.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: Spanned<Expr>,
    pub annotation: Option<Spanned<Expr>>,
    pub value: Option<Spanned<Expr>>,
}

/// `target op= value`
#[derive(Debug, Clone, PartialEq)]
pub struct AugAssignStmt {
    pub target: Spanned<Expr>,
    pub op: BinaryOp,
    pub value: Spanned<Expr>,
}

/// `if`/`elif` branches in order, then the optional `else` body.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub branches: Vec<(Spanned<Expr>, Vec<Spanned<Statement>>)>,
    pub else_body: Option<Vec<Spanned<Statement>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Spanned<Expr>,
    pub body: Vec<Spanned<Statement>>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(Ident),
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
    List(Vec<Spanned<Expr>>),
    Call {
        func: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    Attribute {
        value: Box<Spanned<Expr>>,
        attr: Ident,
    },
    Subscript {
        value: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Binary {
        left: Box<Spanned<Expr>>,
        op: BinaryOp,
        right: Box<Spanned<Expr>>,
    },
    Compare {
        left: Box<Spanned<Expr>>,
        op: CompareOp,
        right: Box<Spanned<Expr>>,
    },
    BoolOp {
        left: Box<Spanned<Expr>>,
        op: BoolOp,
        right: Box<Spanned<Expr>>,
    },
}

impl Expr {
    /// Short human-readable name of the expression shape, used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Expr::Name(_) => "name",
            Expr::Int(_) | Expr::Float(_) | Expr::Str(_) | Expr::Bool(_) | Expr::None => "literal",
            Expr::List(_) => "list",
            Expr::Call { .. } => "call",
            Expr::Attribute { .. } => "attribute access",
            Expr::Subscript { .. } => "subscript",
            Expr::Unary { .. } | Expr::Binary { .. } => "arithmetic expression",
            Expr::Compare { .. } => "comparison",
            Expr::BoolOp { .. } => "boolean expression",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Pow,
    Div,
    FloorDiv,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    NotIn,
    Is,
    IsNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Pow => "**",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
            CompareOp::In => "in",
            CompareOp::NotIn => "not in",
            CompareOp::Is => "is",
            CompareOp::IsNot => "is not",
        };
        write!(f, "{}", s)
    }
}
