//! Name resolution inside expressions and function bodies.
//!
//! [`ExprResolver`] resolves every identifier an expression reads against a [`Scope`] chain and
//! infers the expression's type where it is evident (literals, variables, call results).
//! [`BodyResolver`] walks one function body and collects the locals it assigns into the
//! function's [`BlockScope`]. Any name assigned somewhere in the body is local to the whole
//! function, so reading it before its first assignment is an error even when a global of the
//! same name exists.

use pyrite_syntax::ast::{AssignStmt, Expr, Ident, Span, Spanned, Statement, UnaryOp};

use crate::errors::SemanticError;
use crate::frontend::scope::{BlockScope, GlobalScope, Scope};
use crate::frontend::symbols::{LocalKind, LocalVariable, ModuleBinding, Symbol, TopLevelFunction};
use crate::frontend::types::{Type, TypeRegistry};

/// Resolves the names an expression reads.
pub struct ExprResolver<'s> {
    scope: &'s Scope<'s>,
    types: &'s TypeRegistry,
    /// Function locals not assigned yet.
    unbound: &'s [Ident],
}

impl<'s> ExprResolver<'s> {
    pub fn new(scope: &'s Scope<'s>, types: &'s TypeRegistry) -> Self {
        Self {
            scope,
            types,
            unbound: &[],
        }
    }

    /// Reject reads of `names` instead of resolving them further out.
    pub fn with_unbound(mut self, names: &'s [Ident]) -> Self {
        self.unbound = names;
        self
    }

    /// Resolve every identifier in `expr`; return its type when it can be inferred.
    pub fn infer(&self, expr: &Spanned<Expr>) -> Result<Option<Type>, SemanticError> {
        let ty = match &expr.node {
            Expr::Int(_) => self.builtin("int"),
            Expr::Float(_) => self.builtin("float"),
            Expr::Str(_) => self.builtin("str"),
            Expr::Bool(_) => self.builtin("bool"),
            Expr::None => self.builtin("None"),
            Expr::Name(name) => match self.lookup(name, expr.span)? {
                Some(symbol) => symbol.value_type().cloned(),
                // A type name used as a value
                None if self.types.contains(name) => None,
                None => return Err(unresolved(name, expr.span)),
            },
            Expr::List(items) => {
                for item in items {
                    self.infer(item)?;
                }
                None
            }
            Expr::Call { func, args } => {
                for arg in args {
                    self.infer(arg)?;
                }
                self.call_result(func)?
            }
            Expr::Attribute { value, attr } => match self.imported_module(value)? {
                Some(module) => {
                    if let Some(variable) = module.variable(attr) {
                        Some(variable.ty.clone())
                    } else if module.submodule(attr).is_some() {
                        None
                    } else {
                        member(module, attr, expr.span)?;
                        None
                    }
                }
                None => {
                    self.infer(value)?;
                    None
                }
            },
            Expr::Subscript { value, index } => {
                self.infer(value)?;
                self.infer(index)?;
                None
            }
            Expr::Unary { op, operand } => {
                let operand = self.infer(operand)?;
                match op {
                    UnaryOp::Neg => operand,
                    UnaryOp::Not => self.builtin("bool"),
                }
            }
            Expr::Binary { left, right, .. } | Expr::BoolOp { left, right, .. } => {
                let left = self.infer(left)?;
                self.infer(right)?;
                left
            }
            Expr::Compare { left, right, .. } => {
                self.infer(left)?;
                self.infer(right)?;
                self.builtin("bool")
            }
        };
        Ok(ty)
    }

    /// Type produced by calling `func`. Calling a type name constructs an instance.
    fn call_result(&self, func: &Spanned<Expr>) -> Result<Option<Type>, SemanticError> {
        match &func.node {
            Expr::Name(name) => match self.lookup(name, func.span)? {
                Some(symbol) => Ok(symbol.return_type().cloned()),
                None => self
                    .types
                    .resolve_by_name(name)
                    .cloned()
                    .map(Some)
                    .ok_or_else(|| unresolved(name, func.span)),
            },
            Expr::Attribute { value, attr } => match self.imported_module(value)? {
                Some(module) => member(module, attr, func.span).map(Some),
                None => {
                    self.infer(value)?;
                    Ok(None)
                }
            },
            _ => {
                self.infer(func)?;
                Ok(None)
            }
        }
    }

    fn lookup(&self, name: &str, span: Span) -> Result<Option<Symbol<'s>>, SemanticError> {
        if self.unbound.iter().any(|n| n == name) {
            return Err(SemanticError::new(
                format!("Local variable '{name}' referenced before assignment"),
                span,
            ));
        }
        Ok(self.scope.lookup(name))
    }

    /// The module `value` names, following `a.b.c` through submodules.
    fn imported_module(&self, value: &Spanned<Expr>) -> Result<Option<&'s ModuleBinding>, SemanticError> {
        match &value.node {
            Expr::Name(name) => match self.lookup(name, value.span)? {
                Some(Symbol::Module(module)) => Ok(Some(module)),
                _ => Ok(None),
            },
            Expr::Attribute { value, attr } => {
                Ok(self.imported_module(value)?.and_then(|package| package.submodule(attr)))
            }
            _ => Ok(None),
        }
    }

    fn builtin(&self, name: &str) -> Option<Type> {
        self.types.resolve_by_name(name).cloned()
    }
}

/// Result type of `module.attr` when called: a function's return type or a constructed type.
fn member(module: &ModuleBinding, attr: &str, span: Span) -> Result<Type, SemanticError> {
    module
        .function(attr)
        .map(|f| f.return_type.clone())
        .or_else(|| module.ty(attr).cloned())
        .ok_or_else(|| SemanticError::new(format!("Module '{}' has no attribute '{attr}'", module.name), span))
}

fn unresolved(name: &str, span: Span) -> SemanticError {
    SemanticError::new(format!("Unresolved symbol '{name}'"), span)
}

/// Walks one function body, binding the locals it assigns.
pub struct BodyResolver<'m> {
    globals: &'m GlobalScope,
    types: &'m TypeRegistry,
    function: &'m TopLevelFunction,
    block: BlockScope,
    unbound: Vec<Ident>,
    loop_depth: usize,
}

impl<'m> BodyResolver<'m> {
    pub fn new(globals: &'m GlobalScope, types: &'m TypeRegistry, function: &'m TopLevelFunction) -> Self {
        Self {
            globals,
            types,
            function,
            block: BlockScope::new(),
            unbound: Vec::new(),
            loop_depth: 0,
        }
    }

    /// Resolve `body` and return the function's populated block scope.
    pub fn resolve(mut self, body: &[Spanned<Statement>]) -> Result<BlockScope, SemanticError> {
        collect_assigned(body, &mut self.unbound);
        let arguments = self.function.scope();
        self.unbound.retain(|name| arguments.lookup(name).is_none());
        self.statements(body)?;
        Ok(self.block)
    }

    /// Run `f` against the chain Block → Function → Global as it stands right now.
    fn with_scope<R>(&self, f: impl FnOnce(&ExprResolver<'_>) -> R) -> R {
        let function = Scope::Function {
            scope: self.function.scope(),
            parent: self.globals,
        };
        let chain = Scope::Block {
            scope: &self.block,
            parent: &function,
        };
        f(&ExprResolver::new(&chain, self.types).with_unbound(&self.unbound))
    }

    fn infer(&self, expr: &Spanned<Expr>) -> Result<Option<Type>, SemanticError> {
        self.with_scope(|resolver| resolver.infer(expr))
    }

    fn statements(&mut self, body: &[Spanned<Statement>]) -> Result<(), SemanticError> {
        for stmt in body {
            self.statement(stmt)?;
        }
        Ok(())
    }

    fn statement(&mut self, stmt: &Spanned<Statement>) -> Result<(), SemanticError> {
        match &stmt.node {
            Statement::Assign(assign) => self.assign(assign),
            Statement::AugAssign(aug) => {
                self.infer(&aug.target)?;
                self.infer(&aug.value)?;
                Ok(())
            }
            Statement::Return(value) => {
                if let Some(value) = value {
                    self.infer(value)?;
                }
                Ok(())
            }
            Statement::If(if_stmt) => {
                for (condition, body) in &if_stmt.branches {
                    self.infer(condition)?;
                    self.statements(body)?;
                }
                if let Some(body) = &if_stmt.else_body {
                    self.statements(body)?;
                }
                Ok(())
            }
            Statement::While(while_stmt) => {
                self.infer(&while_stmt.condition)?;
                self.loop_depth += 1;
                let result = self.statements(&while_stmt.body);
                self.loop_depth -= 1;
                result
            }
            Statement::Break | Statement::Continue if self.loop_depth == 0 => {
                let keyword = if matches!(stmt.node, Statement::Break) { "break" } else { "continue" };
                Err(SemanticError::new(format!("'{keyword}' outside loop"), stmt.span))
            }
            Statement::Break | Statement::Continue | Statement::Pass => Ok(()),
            Statement::Expr(expr) => {
                self.infer(expr)?;
                Ok(())
            }
            Statement::FunctionDef(_) | Statement::ClassDef(_) => Err(SemanticError::new(
                "Nested definitions are not supported",
                stmt.span,
            )),
            Statement::Import(_) | Statement::FromImport(_) => Err(SemanticError::new(
                "Imports are only allowed at module level",
                stmt.span,
            )),
        }
    }

    /// Assigning a name not yet bound in the function makes it a local of the whole function.
    fn assign(&mut self, assign: &AssignStmt) -> Result<(), SemanticError> {
        let annotated = assign
            .annotation
            .as_ref()
            .map(|annotation| self.types.resolve_from_expression(annotation))
            .transpose()?;
        let inferred = match &assign.value {
            Some(value) => self.infer(value)?,
            None => None,
        };

        let Expr::Name(name) = &assign.target.node else {
            self.infer(&assign.target)?;
            return Ok(());
        };

        if self.function.scope().lookup(name).is_some() || self.block.lookup(name).is_some() {
            return Ok(());
        }

        let ty = annotated.or(inferred).ok_or_else(|| {
            SemanticError::new(
                format!("Cannot infer the type of '{name}'; add a type annotation"),
                assign.target.span,
            )
        })?;
        tracing::trace!(function = self.function.name(), local = %name, ty = %ty, "bound local");
        self.unbound.retain(|n| n != name);
        self.block.bind(LocalVariable {
            name: name.clone(),
            ty,
            function: self.function.name().to_string(),
            kind: LocalKind::Local,
            span: assign.target.span,
        });
        Ok(())
    }
}

/// Names bound by plain assignment anywhere in `body`, in first-assignment order.
fn collect_assigned(body: &[Spanned<Statement>], out: &mut Vec<Ident>) {
    for stmt in body {
        match &stmt.node {
            Statement::Assign(AssignStmt {
                target: Spanned {
                    node: Expr::Name(name), ..
                },
                ..
            }) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Statement::If(if_stmt) => {
                for (_, branch) in &if_stmt.branches {
                    collect_assigned(branch, out);
                }
                if let Some(body) = &if_stmt.else_body {
                    collect_assigned(body, out);
                }
            }
            Statement::While(while_stmt) => collect_assigned(&while_stmt.body, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::symbols::GlobalVariable;
    use pyrite_syntax::ast::{FunctionDef, Program};
    use pyrite_syntax::parser::parse_source;

    fn first_function(program: &Program) -> &FunctionDef {
        match &program.statements[0].node {
            Statement::FunctionDef(def) => def,
            other => panic!("expected a function, got {:?}", other),
        }
    }

    fn setup(arg: Option<(&str, &str)>) -> (GlobalScope, TypeRegistry, TopLevelFunction) {
        let types = TypeRegistry::with_builtins();
        let mut globals = GlobalScope::new();
        globals
            .add_variable(GlobalVariable {
                name: "limit".into(),
                ty: types.resolve_by_name("int").unwrap().clone(),
                span: Span::default(),
            })
            .unwrap();
        let mut function = TopLevelFunction::new("f", Span::default(), types.resolve_by_name("int").unwrap().clone());
        if let Some((name, ty)) = arg {
            function
                .add_argument(name, types.resolve_by_name(ty).unwrap().clone(), Span::default())
                .unwrap();
        }
        (globals, types, function)
    }

    #[test]
    fn test_locals_are_bound_with_inferred_types() {
        let program = parse_source("def f(n: int) -> int:\n    total = 0\n    done: bool = False\n    while total < limit:\n        total += n\n    return total\n").unwrap();
        let (globals, types, function) = setup(Some(("n", "int")));
        let block = BodyResolver::new(&globals, &types, &function)
            .resolve(&first_function(&program).body)
            .unwrap();
        let names: Vec<_> = block.locals().iter().map(|v| (v.name.as_str(), v.ty.name())).collect();
        assert_eq!(names, vec![("total", "int"), ("done", "bool")]);
    }

    #[test]
    fn test_unresolved_read_in_body() {
        let source = "def f() -> int:\n    return missing + 1\n";
        let program = parse_source(source).unwrap();
        let (globals, types, function) = setup(None);
        let err = BodyResolver::new(&globals, &types, &function)
            .resolve(&first_function(&program).body)
            .unwrap_err();
        assert_eq!(err.message, "Unresolved symbol 'missing'");
        assert_eq!(&source[err.span.start..err.span.end], "missing");
    }

    #[test]
    fn test_assignment_to_argument_does_not_rebind() {
        let program = parse_source("def f(limit: str) -> int:\n    limit = 'x'\n    return 0\n").unwrap();
        let (globals, types, function) = setup(Some(("limit", "str")));
        let block = BodyResolver::new(&globals, &types, &function)
            .resolve(&first_function(&program).body)
            .unwrap();
        assert!(block.locals().is_empty());
    }

    #[test]
    fn test_local_read_before_assignment_does_not_fall_back_to_global() {
        let source = "def f() -> int:\n    y = limit\n    limit = 1\n    return limit\n";
        let program = parse_source(source).unwrap();
        let (globals, types, function) = setup(None);
        let err = BodyResolver::new(&globals, &types, &function)
            .resolve(&first_function(&program).body)
            .unwrap_err();
        assert_eq!(err.message, "Local variable 'limit' referenced before assignment");
        assert_eq!(&source[err.span.start..err.span.end], "limit");
        assert_eq!(err.line(source), 2);
    }

    #[test]
    fn test_local_assigned_in_branch_is_local_everywhere() {
        let program =
            parse_source("def f(n: int) -> int:\n    if n > 0:\n        limit = n\n    return limit\n").unwrap();
        let (globals, types, function) = setup(Some(("n", "int")));
        let block = BodyResolver::new(&globals, &types, &function)
            .resolve(&first_function(&program).body)
            .unwrap();
        assert_eq!(block.lookup("limit").unwrap().kind, LocalKind::Local);

        let program = parse_source("def f() -> int:\n    while limit > 0:\n        limit = 0\n    return 0\n").unwrap();
        let (globals, types, function) = setup(None);
        let err = BodyResolver::new(&globals, &types, &function)
            .resolve(&first_function(&program).body)
            .unwrap_err();
        assert_eq!(err.message, "Local variable 'limit' referenced before assignment");
    }

    #[test]
    fn test_uninferable_local() {
        let program = parse_source("def f() -> int:\n    xs = []\n    return 0\n").unwrap();
        let (globals, types, function) = setup(None);
        let err = BodyResolver::new(&globals, &types, &function)
            .resolve(&first_function(&program).body)
            .unwrap_err();
        assert!(err.message.starts_with("Cannot infer the type of 'xs'"), "{}", err.message);
    }

    #[test]
    fn test_break_outside_loop() {
        let program = parse_source("def f() -> int:\n    break\n").unwrap();
        let (globals, types, function) = setup(None);
        let err = BodyResolver::new(&globals, &types, &function)
            .resolve(&first_function(&program).body)
            .unwrap_err();
        assert_eq!(err.message, "'break' outside loop");
    }

    #[test]
    fn test_nested_definitions_rejected() {
        let program = parse_source("def f() -> int:\n    def g() -> int:\n        return 1\n    return 0\n").unwrap();
        let (globals, types, function) = setup(None);
        let err = BodyResolver::new(&globals, &types, &function)
            .resolve(&first_function(&program).body)
            .unwrap_err();
        assert_eq!(err.message, "Nested definitions are not supported");
    }

    #[test]
    fn test_dotted_module_access() {
        let types = TypeRegistry::with_builtins();
        let int = types.resolve_by_name("int").unwrap().clone();
        let mut shapes = ModuleBinding::namespace("shapes", Span::default());
        shapes.module = Some(crate::frontend::source::ModuleId::new("mod_1"));
        shapes.functions.push(crate::frontend::symbols::FunctionSignature {
            name: "area".into(),
            params: Vec::new(),
            return_type: int,
        });
        let mut geometry = ModuleBinding::namespace("geometry", Span::default());
        geometry.submodules.push(shapes);
        let mut globals = GlobalScope::new();
        globals.add_module(geometry).unwrap();

        let scope = Scope::Global(&globals);
        let resolver = ExprResolver::new(&scope, &types);
        let infer = |source: &str| {
            let program = parse_source(source).unwrap();
            let Statement::Expr(expr) = &program.statements[0].node else {
                panic!("expected an expression statement");
            };
            resolver.infer(expr).map(|t| t.map(|t| t.name().to_string()))
        };
        assert_eq!(infer("geometry.shapes.area()\n").unwrap().as_deref(), Some("int"));
        assert_eq!(infer("geometry.shapes\n").unwrap(), None);
        assert_eq!(
            infer("geometry.lines.area()\n").unwrap_err().message,
            "Module 'geometry' has no attribute 'lines'"
        );
        assert_eq!(
            infer("geometry.shapes.volume()\n").unwrap_err().message,
            "Module 'shapes' has no attribute 'volume'"
        );
    }

    #[test]
    fn test_expression_inference() {
        let types = TypeRegistry::with_builtins();
        let globals = GlobalScope::new();
        let scope = Scope::Global(&globals);
        let resolver = ExprResolver::new(&scope, &types);
        let infer = |source: &str| {
            let program = parse_source(source).unwrap();
            let Statement::Expr(expr) = &program.statements[0].node else {
                panic!("expected an expression statement");
            };
            resolver.infer(expr).unwrap().map(|t| t.name().to_string())
        };
        assert_eq!(infer("1 + 2\n").as_deref(), Some("int"));
        assert_eq!(infer("-1.5\n").as_deref(), Some("float"));
        assert_eq!(infer("not 1\n").as_deref(), Some("bool"));
        assert_eq!(infer("1 < 2\n").as_deref(), Some("bool"));
        assert_eq!(infer("str(1)\n").as_deref(), Some("str"));
        assert_eq!(infer("[1, 2][0]\n"), None);
    }
}
