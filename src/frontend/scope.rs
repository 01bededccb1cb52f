//! The lexical scope chain.
//!
//! ```text
//! GlobalScope ← FunctionScope (arguments) ← BlockScope (body locals)
//! ```
//!
//! Every scope owns its bindings and grows append-only. [`Scope`] links a scope to its parent for
//! one lookup; resolution starts at the innermost scope and walks outward, so an argument or
//! local always shadows a global of the same name.

use pyrite_syntax::ast::Span;

use crate::errors::SemanticError;
use crate::frontend::symbols::{
    ExternalFunction, GlobalVariable, LocalVariable, ModuleBinding, Symbol, TopLevelFunction,
};

/// Argument bindings of one function.
#[derive(Debug, Clone, Default)]
pub struct FunctionScope {
    function: String,
    arguments: Vec<LocalVariable>,
}

impl FunctionScope {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            arguments: Vec::new(),
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn lookup(&self, name: &str) -> Option<&LocalVariable> {
        self.arguments.iter().find(|arg| arg.name == name)
    }

    pub fn arguments(&self) -> &[LocalVariable] {
        &self.arguments
    }

    /// Callers check for duplicates first (see [`TopLevelFunction::add_argument`]).
    pub(crate) fn bind(&mut self, var: LocalVariable) {
        self.arguments.push(var);
    }
}

/// Locals assigned in a function body.
#[derive(Debug, Clone, Default)]
pub struct BlockScope {
    locals: Vec<LocalVariable>,
}

impl BlockScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<&LocalVariable> {
        self.locals.iter().find(|var| var.name == name)
    }

    /// Bind `var` unless the name is already bound here. Returns whether it was inserted.
    pub fn bind(&mut self, var: LocalVariable) -> bool {
        if self.lookup(&var.name).is_some() {
            return false;
        }
        self.locals.push(var);
        true
    }

    pub fn locals(&self) -> &[LocalVariable] {
        &self.locals
    }
}

/// Root scope of a module.
#[derive(Debug, Clone, Default)]
pub struct GlobalScope {
    variables: Vec<GlobalVariable>,
    functions: Vec<TopLevelFunction>,
    externals: Vec<ExternalFunction>,
    modules: Vec<ModuleBinding>,
}

impl GlobalScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a global. Re-declaring with the same type is a plain rebinding; a different type
    /// is an error.
    pub fn add_variable(&mut self, var: GlobalVariable) -> Result<(), SemanticError> {
        if let Some(existing) = self.variable(&var.name) {
            if existing.ty != var.ty {
                return Err(SemanticError::new(
                    format!(
                        "Global '{}' was declared as '{}' and cannot be redeclared as '{}'",
                        var.name, existing.ty, var.ty
                    ),
                    var.span,
                ));
            }
            return Ok(());
        }
        self.variables.push(var);
        Ok(())
    }

    pub fn add_function(&mut self, function: TopLevelFunction) -> Result<(), SemanticError> {
        if self.function(function.name()).is_some() {
            return Err(SemanticError::new(
                format!("Function '{}' is already defined", function.name()),
                function.span(),
            ));
        }
        self.functions.push(function);
        Ok(())
    }

    /// Bind an external function. Binding the same function again is a no-op; binding the name to
    /// a different function is an error.
    pub fn add_external(&mut self, external: ExternalFunction, span: Span) -> Result<(), SemanticError> {
        match self.external(&external.binding) {
            Some(existing) if *existing == external => Ok(()),
            Some(_) => Err(SemanticError::new(
                format!("Name '{}' is already bound to another function", external.binding),
                span,
            )),
            None => {
                self.externals.push(external);
                Ok(())
            }
        }
    }

    /// Bind an imported module. A second import under the same name is merged into the first
    /// (see [`ModuleBinding::merge`]).
    pub fn add_module(&mut self, module: ModuleBinding) -> Result<(), SemanticError> {
        match self.modules.iter_mut().find(|m| m.name == module.name) {
            Some(existing) => existing.merge(module),
            None => {
                self.modules.push(module);
                Ok(())
            }
        }
    }

    pub fn variable(&self, name: &str) -> Option<&GlobalVariable> {
        self.variables.iter().find(|var| var.name == name)
    }

    pub fn function(&self, name: &str) -> Option<&TopLevelFunction> {
        self.functions.iter().find(|function| function.name() == name)
    }

    pub(crate) fn function_mut(&mut self, name: &str) -> Option<&mut TopLevelFunction> {
        self.functions.iter_mut().find(|function| function.name() == name)
    }

    pub fn external(&self, name: &str) -> Option<&ExternalFunction> {
        self.externals.iter().find(|e| e.binding == name)
    }

    pub fn module(&self, name: &str) -> Option<&ModuleBinding> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn variables(&self) -> &[GlobalVariable] {
        &self.variables
    }

    pub fn functions(&self) -> &[TopLevelFunction] {
        &self.functions
    }

    pub fn externals(&self) -> &[ExternalFunction] {
        &self.externals
    }

    pub fn modules(&self) -> &[ModuleBinding] {
        &self.modules
    }

    /// Global variables first, then declared functions, then external functions and modules.
    pub fn lookup(&self, name: &str) -> Option<Symbol<'_>> {
        if let Some(var) = self.variable(name) {
            return Some(Symbol::Global(var));
        }
        if let Some(function) = self.function(name) {
            return Some(Symbol::Function(function));
        }
        if let Some(external) = self.external(name) {
            return Some(Symbol::External(external));
        }
        self.module(name).map(Symbol::Module)
    }
}

/// One link of the scope chain, borrowed for the duration of a lookup.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Global(&'a GlobalScope),
    Function {
        scope: &'a FunctionScope,
        parent: &'a GlobalScope,
    },
    Block {
        scope: &'a BlockScope,
        parent: &'a Scope<'a>,
    },
}

impl<'a> Scope<'a> {
    /// Innermost binding of `name`, walking outward.
    pub fn lookup(&self, name: &str) -> Option<Symbol<'a>> {
        match *self {
            Scope::Global(global) => global.lookup(name),
            Scope::Function { scope, parent } => scope
                .lookup(name)
                .map(Symbol::Local)
                .or_else(|| parent.lookup(name)),
            Scope::Block { scope, parent } => scope
                .lookup(name)
                .map(Symbol::Local)
                .or_else(|| parent.lookup(name)),
        }
    }

    /// Like [`Scope::lookup`], failing with an error pointing at `span`.
    pub fn resolve(&self, name: &str, span: Span) -> Result<Symbol<'a>, SemanticError> {
        self.lookup(name)
            .ok_or_else(|| SemanticError::new(format!("Unresolved symbol '{name}'"), span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::symbols::LocalKind;
    use crate::frontend::types::Type;

    fn int() -> Type {
        Type::builtin("int", 4)
    }

    fn global(name: &str, ty: Type) -> GlobalVariable {
        GlobalVariable {
            name: name.into(),
            ty,
            span: Span::default(),
        }
    }

    #[test]
    fn test_argument_shadows_global() {
        let mut globals = GlobalScope::new();
        globals.add_variable(global("x", Type::builtin("str", 8))).unwrap();
        let mut function = TopLevelFunction::new("f", Span::default(), int());
        function.add_argument("x", int(), Span::default()).unwrap();

        let scope = Scope::Function {
            scope: function.scope(),
            parent: &globals,
        };
        match scope.lookup("x") {
            Some(Symbol::Local(var)) => assert_eq!(var.ty.name(), "int"),
            other => panic!("expected the argument, got {:?}", other),
        }
    }

    #[test]
    fn test_block_falls_back_to_function_then_global() {
        let mut globals = GlobalScope::new();
        globals.add_variable(global("g", int())).unwrap();
        globals
            .add_function(TopLevelFunction::new("helper", Span::default(), int()))
            .unwrap();
        let mut function = TopLevelFunction::new("f", Span::default(), int());
        function.add_argument("a", int(), Span::default()).unwrap();
        let mut block = BlockScope::new();
        assert!(block.bind(LocalVariable {
            name: "tmp".into(),
            ty: int(),
            function: "f".into(),
            kind: LocalKind::Local,
            span: Span::default(),
        }));

        let function_scope = Scope::Function {
            scope: function.scope(),
            parent: &globals,
        };
        let chain = Scope::Block {
            scope: &block,
            parent: &function_scope,
        };
        assert!(matches!(chain.lookup("tmp"), Some(Symbol::Local(_))));
        assert!(matches!(chain.lookup("a"), Some(Symbol::Local(_))));
        assert!(matches!(chain.lookup("g"), Some(Symbol::Global(_))));
        assert!(matches!(chain.lookup("helper"), Some(Symbol::Function(_))));
    }

    #[test]
    fn test_unresolved_symbol() {
        let globals = GlobalScope::new();
        let err = Scope::Global(&globals).resolve("nope", Span::new(4, 8)).unwrap_err();
        assert_eq!(err.message, "Unresolved symbol 'nope'");
        assert_eq!(err.span, Span::new(4, 8));
    }

    #[test]
    fn test_global_variable_wins_over_function() {
        let mut globals = GlobalScope::new();
        globals
            .add_function(TopLevelFunction::new("both", Span::default(), int()))
            .unwrap();
        globals.add_variable(global("both", int())).unwrap();
        assert!(matches!(globals.lookup("both"), Some(Symbol::Global(_))));
    }

    #[test]
    fn test_duplicate_function_and_global_retype() {
        let mut globals = GlobalScope::new();
        globals.add_function(TopLevelFunction::new("f", Span::default(), int())).unwrap();
        let err = globals
            .add_function(TopLevelFunction::new("f", Span::new(1, 2), int()))
            .unwrap_err();
        assert_eq!(err.message, "Function 'f' is already defined");

        globals.add_variable(global("x", int())).unwrap();
        globals.add_variable(global("x", int())).unwrap();
        assert_eq!(globals.variables().len(), 1);
        assert!(globals.add_variable(global("x", Type::builtin("str", 8))).is_err());
    }

    #[test]
    fn test_block_bind_is_first_wins() {
        let mut block = BlockScope::new();
        let var = |ty: Type| LocalVariable {
            name: "v".into(),
            ty,
            function: "f".into(),
            kind: LocalKind::Local,
            span: Span::default(),
        };
        assert!(block.bind(var(int())));
        assert!(!block.bind(var(Type::builtin("str", 8))));
        assert_eq!(block.lookup("v").unwrap().ty.name(), "int");
    }

    #[test]
    fn test_rebinding_never_drops_a_binding() {
        let mut globals = GlobalScope::new();
        let external = |module: &str| ExternalFunction {
            binding: "helper".into(),
            signature: crate::frontend::symbols::FunctionSignature {
                name: "helper".into(),
                params: Vec::new(),
                return_type: int(),
            },
            linkage: crate::frontend::symbols::Linkage::Imported(crate::frontend::source::ModuleId::new(module)),
        };
        globals.add_external(external("mod_1"), Span::default()).unwrap();
        globals.add_external(external("mod_1"), Span::default()).unwrap();
        let err = globals.add_external(external("mod_2"), Span::new(3, 9)).unwrap_err();
        assert_eq!(err.message, "Name 'helper' is already bound to another function");
        assert_eq!(err.span, Span::new(3, 9));
        assert_eq!(globals.externals().len(), 1);
        assert_eq!(globals.externals()[0], external("mod_1"));

        globals.add_module(ModuleBinding::namespace("pkg", Span::default())).unwrap();
        globals.add_module(ModuleBinding::namespace("pkg", Span::default())).unwrap();
        assert_eq!(globals.modules().len(), 1);
    }
}
