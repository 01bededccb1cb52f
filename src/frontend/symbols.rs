//! Named, resolvable entities: variables, functions, and module bindings.

use pyrite_syntax::ast::{Ident, Span};

use crate::errors::SemanticError;
use crate::frontend::scope::{BlockScope, FunctionScope};
use crate::frontend::source::ModuleId;
use crate::frontend::types::Type;

/// How a local variable came into scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalKind {
    Argument,
    /// First assigned in the function body.
    Local,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariable {
    pub name: Ident,
    pub ty: Type,
    /// Name of the owning function.
    pub function: Ident,
    pub kind: LocalKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalVariable {
    pub name: Ident,
    pub ty: Type,
    pub span: Span,
}

/// Parameter and return types of a callable, detached from its body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub name: Ident,
    pub params: Vec<(Ident, Type)>,
    pub return_type: Type,
}

/// Where an externally defined function's body lives.
#[derive(Debug, Clone, PartialEq)]
pub enum Linkage {
    /// Provided by the backend (declared through the extern pragma).
    Intrinsic,
    /// Defined in another module.
    Imported(ModuleId),
}

/// A function callable from this module but defined elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalFunction {
    /// Name the function is bound to here (differs from the signature name under `as`).
    pub binding: Ident,
    pub signature: FunctionSignature,
    pub linkage: Linkage,
}

/// `import m` binds `m` to the public surface of the imported module.
///
/// `import a.b` binds `a` with `b` as a submodule. When `a` itself was never imported it is a
/// bare namespace: no module and no surface of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleBinding {
    pub name: Ident,
    pub module: Option<ModuleId>,
    pub functions: Vec<FunctionSignature>,
    pub types: Vec<Type>,
    pub variables: Vec<GlobalVariable>,
    pub submodules: Vec<ModuleBinding>,
    pub span: Span,
}

impl ModuleBinding {
    /// A package reached only through the dotted path of one of its submodules.
    pub fn namespace(name: impl Into<Ident>, span: Span) -> Self {
        Self {
            name: name.into(),
            module: None,
            functions: Vec::new(),
            types: Vec::new(),
            variables: Vec::new(),
            submodules: Vec::new(),
            span,
        }
    }

    pub fn variable(&self, name: &str) -> Option<&GlobalVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn ty(&self, name: &str) -> Option<&Type> {
        self.types.iter().find(|t| t.name() == name)
    }

    pub fn submodule(&self, name: &str) -> Option<&ModuleBinding> {
        self.submodules.iter().find(|m| m.name == name)
    }

    /// Fold a second import of the same name into this binding. Nothing already bound is dropped;
    /// the two must not name different modules.
    pub fn merge(&mut self, other: ModuleBinding) -> Result<(), SemanticError> {
        if let Some(module) = other.module {
            if self.module.as_ref().is_some_and(|existing| *existing != module) {
                return Err(SemanticError::new(
                    format!("Name '{}' is already bound to another module", self.name),
                    other.span,
                ));
            }
            if self.module.is_none() {
                self.module = Some(module);
                self.functions = other.functions;
                self.types = other.types;
                self.variables = other.variables;
            }
        }
        for sub in other.submodules {
            match self.submodules.iter_mut().find(|m| m.name == sub.name) {
                Some(existing) => existing.merge(sub)?,
                None => self.submodules.push(sub),
            }
        }
        Ok(())
    }
}

/// A function declared at the top level of a module.
///
/// Owns one [`FunctionScope`] with its arguments and one [`BlockScope`] with the locals its body
/// assigns.
#[derive(Debug, Clone)]
pub struct TopLevelFunction {
    name: Ident,
    span: Span,
    return_type: Type,
    scope: FunctionScope,
    body: BlockScope,
    private: bool,
}

impl TopLevelFunction {
    pub fn new(name: impl Into<Ident>, span: Span, return_type: Type) -> Self {
        let name = name.into();
        Self {
            scope: FunctionScope::new(name.clone()),
            body: BlockScope::new(),
            name,
            span,
            return_type,
            private: false,
        }
    }

    /// Construct a function with its arguments, failing on the first duplicate name.
    pub fn with_arguments<I>(
        name: impl Into<Ident>,
        span: Span,
        return_type: Type,
        arguments: I,
    ) -> Result<Self, SemanticError>
    where
        I: IntoIterator<Item = (Ident, Type, Span)>,
    {
        let mut function = Self::new(name, span, return_type);
        for (arg, ty, arg_span) in arguments {
            function.add_argument(arg, ty, arg_span)?;
        }
        Ok(function)
    }

    /// Bind an argument. A name already bound is rejected before anything is inserted.
    pub fn add_argument(&mut self, name: impl Into<Ident>, ty: Type, span: Span) -> Result<(), SemanticError> {
        let name = name.into();
        if self.scope.lookup(&name).is_some() {
            return Err(SemanticError::new(format!("Duplicate argument '{name}'"), span));
        }
        self.scope.bind(LocalVariable {
            function: self.name.clone(),
            name,
            ty,
            kind: LocalKind::Argument,
            span,
        });
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn return_type(&self) -> &Type {
        &self.return_type
    }

    pub fn arguments(&self) -> &[LocalVariable] {
        self.scope.arguments()
    }

    pub fn scope(&self) -> &FunctionScope {
        &self.scope
    }

    pub fn body(&self) -> &BlockScope {
        &self.body
    }

    pub(crate) fn set_body(&mut self, body: BlockScope) {
        self.body = body;
    }

    /// Private functions are only visible to standard-library importers.
    pub fn is_private(&self) -> bool {
        self.private
    }

    pub(crate) fn mark_private(&mut self) {
        self.private = true;
    }

    pub fn signature(&self) -> FunctionSignature {
        FunctionSignature {
            name: self.name.clone(),
            params: self
                .arguments()
                .iter()
                .map(|arg| (arg.name.clone(), arg.ty.clone()))
                .collect(),
            return_type: self.return_type.clone(),
        }
    }
}

/// Result of resolving an identifier.
#[derive(Debug, Clone, Copy)]
pub enum Symbol<'a> {
    Local(&'a LocalVariable),
    Global(&'a GlobalVariable),
    Function(&'a TopLevelFunction),
    External(&'a ExternalFunction),
    Module(&'a ModuleBinding),
}

impl<'a> Symbol<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Symbol::Local(var) => &var.name,
            Symbol::Global(var) => &var.name,
            Symbol::Function(function) => function.name(),
            Symbol::External(function) => &function.binding,
            Symbol::Module(module) => &module.name,
        }
    }

    /// Type of the value a variable holds. `None` for functions and modules.
    pub fn value_type(&self) -> Option<&'a Type> {
        match self {
            Symbol::Local(var) => Some(&var.ty),
            Symbol::Global(var) => Some(&var.ty),
            _ => None,
        }
    }

    /// Return type when the symbol is callable.
    pub fn return_type(&self) -> Option<&'a Type> {
        match self {
            Symbol::Function(function) => Some(function.return_type()),
            Symbol::External(function) => Some(&function.signature.return_type),
            _ => None,
        }
    }
}
