//! Registration of a module's top-level declarations.
//!
//! Runs once the type registry is seeded. Passes, in order:
//! 1. reject statements that may not appear at module level
//! 2. imports
//! 3. classes (so annotations may name a class declared further down)
//! 4. pragmas and extern bindings
//! 5. function signatures, then the private pragma check
//! 6. globals and top-level expressions, in source order
//! 7. function bodies

use pyrite_core::lang::intrinsics::{self, COMPILER_DEFINED_MODULE};
use pyrite_core::lang::pragmas::PragmaKind;
use pyrite_core::lang::types::REFERENCE_SIZE_BYTES;
use pyrite_syntax::ast::{
    AssignStmt, ClassDef, Expr, FromImportStmt, FunctionDef, ImportStmt, Program, Span, Spanned, Statement,
};

use crate::errors::SemanticError;
use crate::frontend::body::{BodyResolver, ExprResolver};
use crate::frontend::module::{ImportedModules, ModuleExports, Semantics};
use crate::frontend::pragma::{ModulePragmas, collect_pragmas, pragma_target};
use crate::frontend::scope::Scope;
use crate::frontend::source::{INTERNAL_MODULE, ModuleId, ModuleSource};
use crate::frontend::symbols::{
    ExternalFunction, FunctionSignature, GlobalVariable, Linkage, ModuleBinding, TopLevelFunction,
};
use crate::frontend::types::Type;

pub(crate) struct Declarer<'m> {
    id: &'m ModuleId,
    source: &'m ModuleSource,
    semantics: &'m mut Semantics,
    imports: &'m ImportedModules,
    /// Exports of the internal module; `None` while compiling the internal module itself.
    internal: Option<&'m ModuleExports>,
}

impl<'m> Declarer<'m> {
    pub fn new(
        id: &'m ModuleId,
        source: &'m ModuleSource,
        semantics: &'m mut Semantics,
        imports: &'m ImportedModules,
        internal: Option<&'m ModuleExports>,
    ) -> Self {
        Self {
            id,
            source,
            semantics,
            imports,
            internal,
        }
    }

    pub fn register(mut self, program: &Program) -> Result<(), SemanticError> {
        check_top_level(program)?;

        for stmt in &program.statements {
            match &stmt.node {
                Statement::Import(import) => self.import(import)?,
                Statement::FromImport(from) => self.from_import(from)?,
                _ => {}
            }
        }

        let classes: Vec<_> = program
            .statements
            .iter()
            .filter_map(|stmt| match &stmt.node {
                Statement::ClassDef(class) => Some(class),
                _ => None,
            })
            .collect();
        for class in &classes {
            self.declare_class(class)?;
        }
        for class in &classes {
            self.check_class_body(class)?;
        }

        let pragmas = self.pragmas(program)?;

        for stmt in &program.statements {
            if let Statement::FunctionDef(def) = &stmt.node {
                self.declare_function(def, stmt.span, &pragmas)?;
            }
        }
        for name in pragmas.names(PragmaKind::Private) {
            if self.semantics.globals.function(&name.node).is_none() {
                return Err(SemanticError::new(
                    format!("Private symbol '{}' is not a function declared in this module", name.node),
                    name.span,
                ));
            }
        }

        for stmt in &program.statements {
            match &stmt.node {
                Statement::Assign(assign) if pragma_target(assign).is_none() => self.global_assign(assign)?,
                Statement::AugAssign(aug) => {
                    self.infer_global(&aug.target)?;
                    self.infer_global(&aug.value)?;
                }
                Statement::Expr(expr) => {
                    self.infer_global(expr)?;
                }
                _ => {}
            }
        }

        for stmt in &program.statements {
            if let Statement::FunctionDef(def) = &stmt.node {
                self.resolve_body(def)?;
            }
        }

        tracing::debug!(
            module = %self.id,
            functions = self.semantics.globals.functions().len(),
            globals = self.semantics.globals.variables().len(),
            "declarations registered"
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Imports
    // ------------------------------------------------------------------------

    fn import(&mut self, import: &ImportStmt) -> Result<(), SemanticError> {
        for alias in &import.names {
            let path = alias.node.path.as_str();
            if path == COMPILER_DEFINED_MODULE {
                self.require_internal(alias.span)?;
                continue;
            }
            // Always injected; importing it is allowed and changes nothing.
            if path == INTERNAL_MODULE {
                continue;
            }

            let exports = self.exports_of(path, alias.span)?;
            for ty in &exports.types {
                self.import_type(ty.name(), ty);
            }
            let binding = match &alias.node.alias {
                Some(name) => self.module_binding(name, exports, alias.span),
                None => self.package_chain(path, exports, alias.span),
            };
            tracing::debug!(module = %self.id, import = path, bound = %binding.name, "bound module");
            self.semantics.globals.add_module(binding)?;
        }
        Ok(())
    }

    fn module_binding(&self, name: &str, exports: &ModuleExports, span: Span) -> ModuleBinding {
        ModuleBinding {
            name: name.to_string(),
            module: Some(exports.module.clone()),
            functions: exports.visible_functions(self.source.is_stdlib()).cloned().collect(),
            types: exports.types.clone(),
            variables: exports.variables.clone(),
            submodules: Vec::new(),
            span,
        }
    }

    /// `import a.b.c` binds `a`, with `c` reachable through `b`. A package on the way carries its
    /// own surface only when this module imports it too.
    fn package_chain(&self, path: &str, exports: &ModuleExports, span: Span) -> ModuleBinding {
        let mut packages: Vec<&str> = path.split('.').collect();
        let leaf = packages.pop().unwrap_or(path);
        let mut binding = self.module_binding(leaf, exports, span);
        for depth in (0..packages.len()).rev() {
            let prefix = packages[..=depth].join(".");
            let mut package = match self.imports.get(&prefix) {
                Some(package) => self.module_binding(packages[depth], package, span),
                None => ModuleBinding::namespace(packages[depth], span),
            };
            package.submodules.push(binding);
            binding = package;
        }
        binding
    }

    fn from_import(&mut self, from: &FromImportStmt) -> Result<(), SemanticError> {
        let module = from.module.node.as_str();

        if module == COMPILER_DEFINED_MODULE {
            self.require_internal(from.module.span)?;
            for alias in &from.names {
                if !intrinsics::is_intrinsic(&alias.node.path) {
                    return Err(SemanticError::new(
                        format!("'{COMPILER_DEFINED_MODULE}' has no intrinsic '{}'", alias.node.path),
                        alias.span,
                    ));
                }
            }
            return Ok(());
        }

        if module == INTERNAL_MODULE {
            let Some(internal) = self.internal else {
                return Ok(());
            };
            let stdlib_importer = self.source.is_stdlib();
            for alias in &from.names {
                let name = alias.node.path.as_str();
                if internal.ty(name).is_none() && internal.function(name, stdlib_importer).is_none() {
                    return Err(cannot_import(name, module, alias.span));
                }
            }
            return Ok(());
        }

        let exports = self.exports_of(module, from.module.span)?;
        let stdlib_importer = self.source.is_stdlib();
        for alias in &from.names {
            let name = alias.node.path.as_str();
            let bound = alias.node.bound_name();
            if let Some(ty) = exports.ty(name) {
                self.import_type(bound, ty);
            } else if let Some(signature) = exports.function(name, stdlib_importer) {
                self.semantics.globals.add_external(
                    ExternalFunction {
                        binding: bound.to_string(),
                        signature: signature.clone(),
                        linkage: Linkage::Imported(exports.module.clone()),
                    },
                    alias.span,
                )?;
            } else if let Some(variable) = exports.variable(name) {
                self.semantics.globals.add_variable(GlobalVariable {
                    name: bound.to_string(),
                    ty: variable.ty.clone(),
                    span: alias.span,
                })?;
            } else {
                return Err(cannot_import(name, module, alias.span));
            }
        }
        Ok(())
    }

    fn exports_of(&self, module: &str, span: Span) -> Result<&'m ModuleExports, SemanticError> {
        self.imports
            .get(module)
            .ok_or_else(|| SemanticError::new(format!("No module named '{module}'"), span))
    }

    /// Imported types never replace a built-in primitive.
    fn import_type(&mut self, name: &str, ty: &Type) {
        let types = &mut self.semantics.types;
        if types.resolve_by_name(name).is_some_and(Type::is_builtin) {
            return;
        }
        types.register_as(name, ty.clone());
    }

    fn require_internal(&self, span: Span) -> Result<(), SemanticError> {
        if self.source.is_internal() {
            return Ok(());
        }
        Err(SemanticError::new(
            format!("'{COMPILER_DEFINED_MODULE}' can only be imported by the internal module"),
            span,
        ))
    }

    // ------------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------------

    fn declare_class(&mut self, class: &ClassDef) -> Result<(), SemanticError> {
        let name = &class.name.node;
        if let Some(existing) = self.semantics.types.resolve_by_name(name) {
            if existing.is_builtin() {
                return Err(SemanticError::new(
                    format!("Cannot redefine built-in type '{name}'"),
                    class.name.span,
                ));
            }
            if existing.owner() == Some(self.id) {
                return Err(SemanticError::new(
                    format!("Class '{name}' is already defined"),
                    class.name.span,
                ));
            }
        }
        self.semantics
            .types
            .register(Type::user(name.clone(), self.id, REFERENCE_SIZE_BYTES));
        Ok(())
    }

    /// Fields must name known types. Method bodies are not resolved.
    fn check_class_body(&self, class: &ClassDef) -> Result<(), SemanticError> {
        for stmt in &class.body {
            match &stmt.node {
                Statement::Assign(AssignStmt {
                    target:
                        Spanned {
                            node: Expr::Name(_), ..
                        },
                    annotation,
                    ..
                }) => {
                    if let Some(annotation) = annotation {
                        self.semantics.types.resolve_from_expression(annotation)?;
                    }
                }
                Statement::FunctionDef(_) | Statement::Pass => {}
                Statement::Expr(Spanned {
                    node: Expr::Str(_), ..
                }) => {}
                _ => {
                    return Err(SemanticError::new(
                        format!("Unsupported statement in body of class '{}'", class.name.node),
                        stmt.span,
                    ));
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Pragmas
    // ------------------------------------------------------------------------

    fn pragmas(&mut self, program: &Program) -> Result<ModulePragmas, SemanticError> {
        let pragmas = collect_pragmas(program)?;
        if pragmas.is_empty() {
            return Ok(pragmas);
        }
        if !self.source.is_internal() {
            return Err(SemanticError::new(
                "Pragmas may only be declared by the internal standard library module",
                pragmas.first_span().unwrap_or_default(),
            ));
        }

        for name in pragmas.names(PragmaKind::Extern) {
            if intrinsics::ty(&name.node).is_some() {
                continue;
            }
            let Some(intrinsic) = intrinsics::function(&name.node) else {
                return Err(SemanticError::new(
                    format!("Unknown compiler intrinsic '{}'", name.node),
                    name.span,
                ));
            };
            let mut params = Vec::with_capacity(intrinsic.params.len());
            for (i, ty) in intrinsic.params.iter().enumerate() {
                params.push((format!("arg{i}"), self.intrinsic_type(ty, name.span)?));
            }
            let signature = FunctionSignature {
                name: intrinsic.name.to_string(),
                params,
                return_type: self.intrinsic_type(intrinsic.returns, name.span)?,
            };
            self.semantics.globals.add_external(
                ExternalFunction {
                    binding: intrinsic.name.to_string(),
                    signature,
                    linkage: Linkage::Intrinsic,
                },
                name.span,
            )?;
        }
        Ok(pragmas)
    }

    fn intrinsic_type(&self, name: &str, span: Span) -> Result<Type, SemanticError> {
        self.semantics
            .types
            .resolve_by_name(name)
            .cloned()
            .ok_or_else(|| SemanticError::new(format!("Unknown type '{name}'"), span))
    }

    // ------------------------------------------------------------------------
    // Functions
    // ------------------------------------------------------------------------

    fn declare_function(&mut self, def: &FunctionDef, span: Span, pragmas: &ModulePragmas) -> Result<(), SemanticError> {
        let name = &def.name.node;
        let Some(return_annotation) = &def.return_type else {
            return Err(SemanticError::new(
                format!("Function '{name}' is missing return type"),
                def.name.span,
            ));
        };
        let types = &self.semantics.types;
        let return_type = types.resolve_from_expression(return_annotation)?;

        let mut arguments = Vec::with_capacity(def.params.len());
        for param in &def.params {
            let Some(annotation) = &param.node.annotation else {
                return Err(SemanticError::new(
                    format!(
                        "Argument '{}' of function '{name}' is missing a type annotation",
                        param.node.name
                    ),
                    param.span,
                ));
            };
            arguments.push((param.node.name.clone(), types.resolve_from_expression(annotation)?, param.span));
        }

        let mut function = TopLevelFunction::with_arguments(name.clone(), span, return_type, arguments)?;
        if pragmas.is_private(name) {
            function.mark_private();
        }
        self.semantics.globals.add_function(function)
    }

    fn resolve_body(&mut self, def: &FunctionDef) -> Result<(), SemanticError> {
        let name = def.name.node.as_str();
        let Some(function) = self.semantics.globals.function(name) else {
            return Ok(());
        };
        let block = BodyResolver::new(&self.semantics.globals, &self.semantics.types, function).resolve(&def.body)?;
        if let Some(function) = self.semantics.globals.function_mut(name) {
            function.set_body(block);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Globals
    // ------------------------------------------------------------------------

    fn global_assign(&mut self, assign: &AssignStmt) -> Result<(), SemanticError> {
        let annotated = assign
            .annotation
            .as_ref()
            .map(|annotation| self.semantics.types.resolve_from_expression(annotation))
            .transpose()?;
        let inferred = match &assign.value {
            Some(value) => self.infer_global(value)?,
            None => None,
        };

        let Expr::Name(name) = &assign.target.node else {
            self.infer_global(&assign.target)?;
            return Ok(());
        };

        let ty = annotated.or(inferred).ok_or_else(|| {
            SemanticError::new(
                format!("Cannot infer the type of global '{name}'; add a type annotation"),
                assign.target.span,
            )
        })?;
        self.semantics.globals.add_variable(GlobalVariable {
            name: name.clone(),
            ty,
            span: assign.target.span,
        })
    }

    fn infer_global(&self, expr: &Spanned<Expr>) -> Result<Option<Type>, SemanticError> {
        let scope = Scope::Global(&self.semantics.globals);
        ExprResolver::new(&scope, &self.semantics.types).infer(expr)
    }
}

fn cannot_import(name: &str, module: &str, span: Span) -> SemanticError {
    SemanticError::new(format!("Cannot import name '{name}' from '{module}'"), span)
}

/// Control flow only makes sense inside functions.
fn check_top_level(program: &Program) -> Result<(), SemanticError> {
    for stmt in &program.statements {
        let keyword = match &stmt.node {
            Statement::If(_) => "if",
            Statement::While(_) => "while",
            Statement::Return(_) => "return",
            Statement::Break => "break",
            Statement::Continue => "continue",
            _ => continue,
        };
        return Err(SemanticError::new(
            format!("'{keyword}' statements are not allowed at module level"),
            stmt.span,
        ));
    }
    Ok(())
}
