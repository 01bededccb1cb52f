//! One compilation unit and its pipeline.
//!
//! ```text
//! Unloaded → AstLoaded → TypesLoaded → Compiled
//!     └──────────┴────────────┴──────────→ Failed (terminal)
//! ```
//!
//! A [`Module`] is created without touching the file system. [`Module::load`] reads and parses
//! the source; [`Module::compile`] seeds the type registry (built-ins, then the internal module's
//! exports) and registers every top-level declaration. The parsed tree only exists in the loaded
//! states, so nothing can reach it before loading.

use std::collections::BTreeMap;

use pyrite_core::lang::intrinsics::INTRINSIC_TYPES;
use pyrite_syntax::ast::{Program, Span};
use pyrite_syntax::diagnostics::{SyntaxError, format_error};
use pyrite_syntax::parser::parse_source;

use crate::config::CompilerOptions;
use crate::errors::{BuildError, CompileError};
use crate::frontend::declare::Declarer;
use crate::frontend::scope::GlobalScope;
use crate::frontend::source::{INTERNAL_MODULE, ModuleId, ModuleSource};
use crate::frontend::symbols::{ExternalFunction, FunctionSignature, GlobalVariable, Linkage};
use crate::frontend::types::{Type, TypeRegistry};

/// Exports of already compiled modules, keyed by the dotted name the importer uses.
pub type ImportedModules = BTreeMap<String, ModuleExports>;

/// Loaded source text together with its syntax tree.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    pub text: String,
    pub program: Program,
}

#[derive(Debug, Clone)]
pub enum ModuleState {
    Unloaded,
    AstLoaded(ParsedSource),
    TypesLoaded(ParsedSource),
    Compiled(ParsedSource),
    /// Terminal. Keeps the source text when it could be read, for diagnostics.
    Failed(Option<String>),
}

impl ModuleState {
    pub fn name(&self) -> &'static str {
        match self {
            ModuleState::Unloaded => "unloaded",
            ModuleState::AstLoaded(_) => "ast-loaded",
            ModuleState::TypesLoaded(_) => "types-loaded",
            ModuleState::Compiled(_) => "compiled",
            ModuleState::Failed(_) => "failed",
        }
    }

    fn parsed(&self) -> Option<&ParsedSource> {
        match self {
            ModuleState::AstLoaded(parsed) | ModuleState::TypesLoaded(parsed) | ModuleState::Compiled(parsed) => {
                Some(parsed)
            }
            ModuleState::Unloaded | ModuleState::Failed(_) => None,
        }
    }
}

/// A function a module makes available to importers.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFunction {
    pub signature: FunctionSignature,
    /// Private functions are only visible to standard-library importers.
    pub private: bool,
}

/// The public surface of a compiled module.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleExports {
    pub module: ModuleId,
    /// Types the module declares itself. Built-ins are never exported.
    pub types: Vec<Type>,
    pub functions: Vec<ExportedFunction>,
    /// Readable as `m.name`, or bound by `from m import name`.
    pub variables: Vec<GlobalVariable>,
}

impl ModuleExports {
    pub fn ty(&self, name: &str) -> Option<&Type> {
        self.types.iter().find(|t| t.name() == name)
    }

    pub fn variable(&self, name: &str) -> Option<&GlobalVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Function `name`, if an importer of the given kind may see it.
    pub fn function(&self, name: &str, stdlib_importer: bool) -> Option<&FunctionSignature> {
        self.visible_functions(stdlib_importer).find(|f| f.name == name)
    }

    pub fn visible_functions(&self, stdlib_importer: bool) -> impl Iterator<Item = &FunctionSignature> {
        self.functions
            .iter()
            .filter(move |f| stdlib_importer || !f.private)
            .map(|f| &f.signature)
    }
}

/// Owned semantic state of a module: its type registry and global scope.
#[derive(Debug, Clone, Default)]
pub(crate) struct Semantics {
    pub types: TypeRegistry,
    pub globals: GlobalScope,
}

#[derive(Debug)]
pub struct Module {
    source: ModuleSource,
    id: ModuleId,
    state: ModuleState,
    semantics: Semantics,
}

impl Module {
    /// Wrap `source`. No I/O happens until [`Module::load`].
    pub fn new(source: ModuleSource) -> Self {
        Self {
            id: source.derive_id(),
            source,
            state: ModuleState::Unloaded,
            semantics: Semantics::default(),
        }
    }

    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    pub fn source(&self) -> &ModuleSource {
        &self.source
    }

    pub fn display_path(&self) -> String {
        self.source.display_path()
    }

    pub fn state(&self) -> &ModuleState {
        &self.state
    }

    pub fn is_internal(&self) -> bool {
        self.source.is_internal()
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self.state, ModuleState::Compiled(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, ModuleState::Failed(_))
    }

    pub fn parsed(&self) -> Option<&ParsedSource> {
        self.state.parsed()
    }

    /// Source text, once read. Still available after a failure past the read.
    pub fn source_text(&self) -> Option<&str> {
        match &self.state {
            ModuleState::Failed(text) => text.as_deref(),
            state => state.parsed().map(|p| p.text.as_str()),
        }
    }

    /// Dotted names of the modules this one imports, in source order. `None` before loading.
    pub fn imported_modules(&self) -> Option<Vec<String>> {
        self.parsed().map(|p| p.program.imported_modules())
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.semantics.types
    }

    pub fn globals(&self) -> &GlobalScope {
        &self.semantics.globals
    }

    /// Read and parse the source. Does nothing if it is already loaded.
    ///
    /// ## Errors
    /// - [`UserError`](crate::errors::UserError) when the source cannot be read.
    /// - [`CompileError`] for malformed syntax, or when the module already failed.
    #[tracing::instrument(skip_all, fields(module = %self.id))]
    pub fn load(&mut self, options: &CompilerOptions) -> Result<&ParsedSource, BuildError> {
        if let ModuleState::Unloaded = self.state {
            let text = match self.source.load_text(options) {
                Ok(text) => text,
                Err(err) => {
                    self.state = ModuleState::Failed(None);
                    return Err(err.into());
                }
            };
            match parse_source(&text) {
                Ok(program) => {
                    tracing::debug!(statements = program.statements.len(), "source loaded");
                    self.state = ModuleState::AstLoaded(ParsedSource { text, program });
                }
                Err(errors) => {
                    let err = syntax_failure(&self.display_path(), &text, &errors);
                    self.state = ModuleState::Failed(Some(text));
                    return Err(err.into());
                }
            }
        }

        self.state.parsed().ok_or_else(|| self.already_failed().into())
    }

    /// Run the pipeline to completion. Compiling a compiled module is a no-op; any failure moves
    /// the module to [`ModuleState::Failed`].
    ///
    /// `imports` must hold the exports of every module this one imports.
    #[tracing::instrument(skip_all, fields(module = %self.id))]
    pub fn compile(&mut self, options: &CompilerOptions, imports: &ImportedModules) -> Result<(), BuildError> {
        match self.state {
            ModuleState::Compiled(_) => return Ok(()),
            ModuleState::Failed(_) => return Err(self.already_failed().into()),
            _ => {}
        }

        let result = self.run_pipeline(options, imports);
        match &result {
            Ok(()) => tracing::debug!("compiled"),
            Err(err) => {
                tracing::debug!(error = %err, stage = self.state.name(), "pipeline failed");
                self.fail();
            }
        }
        result
    }

    fn run_pipeline(&mut self, options: &CompilerOptions, imports: &ImportedModules) -> Result<(), BuildError> {
        self.load(options)?;

        self.semantics = Semantics::default();
        let internal = self.seed_types(options)?;
        self.transition(ModuleState::TypesLoaded);

        let ModuleState::TypesLoaded(parsed) = &self.state else {
            return Err(CompileError::new("INVARIANT: module lost its syntax tree while compiling").into());
        };
        Declarer::new(&self.id, &self.source, &mut self.semantics, imports, internal.as_ref())
            .register(&parsed.program)?;
        self.transition(ModuleState::Compiled);
        Ok(())
    }

    /// Register the built-in primitives, then (unless this is the internal module itself) the
    /// internal module's exports. Returns those exports.
    fn seed_types(&mut self, options: &CompilerOptions) -> Result<Option<ModuleExports>, BuildError> {
        self.semantics.types = TypeRegistry::with_builtins();

        if self.is_internal() {
            for intrinsic in INTRINSIC_TYPES {
                self.semantics
                    .types
                    .register(Type::builtin(intrinsic.name, intrinsic.size_bytes));
            }
            return Ok(None);
        }

        let internal = load_internal_module(options)?;
        let stdlib_importer = self.source.is_stdlib();
        for ty in &internal.types {
            if self.semantics.types.resolve_by_name(ty.name()).is_some_and(Type::is_builtin) {
                continue;
            }
            self.semantics.types.register(ty.clone());
        }
        for signature in internal.visible_functions(stdlib_importer) {
            self.semantics.globals.add_external(
                ExternalFunction {
                    binding: signature.name.clone(),
                    signature: signature.clone(),
                    linkage: Linkage::Imported(internal.module.clone()),
                },
                Span::default(),
            )?;
        }
        tracing::trace!(types = internal.types.len(), "internal module injected");
        Ok(Some(internal))
    }

    /// The module's public surface. `None` unless compiled.
    pub fn exports(&self) -> Option<ModuleExports> {
        if !self.is_compiled() {
            return None;
        }
        let types = self
            .semantics
            .types
            .iter()
            .filter(|(name, ty)| ty.owner() == Some(&self.id) && ty.name() == *name)
            .map(|(_, ty)| ty.clone())
            .collect();
        let functions = self
            .semantics
            .globals
            .functions()
            .iter()
            .map(|f| ExportedFunction {
                signature: f.signature(),
                private: f.is_private(),
            })
            .collect();
        Some(ModuleExports {
            module: self.id.clone(),
            types,
            functions,
            variables: self.semantics.globals.variables().to_vec(),
        })
    }

    fn transition(&mut self, next: fn(ParsedSource) -> ModuleState) {
        self.state = match std::mem::replace(&mut self.state, ModuleState::Unloaded) {
            ModuleState::AstLoaded(parsed) | ModuleState::TypesLoaded(parsed) | ModuleState::Compiled(parsed) => {
                next(parsed)
            }
            other => other,
        };
    }

    fn fail(&mut self) {
        let text = match std::mem::replace(&mut self.state, ModuleState::Unloaded) {
            ModuleState::AstLoaded(parsed) | ModuleState::TypesLoaded(parsed) | ModuleState::Compiled(parsed) => {
                Some(parsed.text)
            }
            ModuleState::Failed(text) => text,
            ModuleState::Unloaded => None,
        };
        self.state = ModuleState::Failed(text);
    }

    fn already_failed(&self) -> CompileError {
        CompileError::new(format!("Module '{}' failed to load", self.display_path()))
    }
}

/// Compile a fresh copy of the internal module and return its exports.
///
/// Failures are reported against the importing module, so a compile error is flattened into a
/// message carrying the internal module's own line number.
fn load_internal_module(options: &CompilerOptions) -> Result<ModuleExports, BuildError> {
    let mut internal = Module::new(ModuleSource::Stdlib(INTERNAL_MODULE.to_string()));
    match internal.compile(options, &ImportedModules::new()) {
        Ok(()) => {}
        Err(BuildError::User(err)) => return Err(err.into()),
        Err(BuildError::Compile(err)) => {
            let location = match (err.as_semantic(), internal.source_text()) {
                (Some(semantic), Some(text)) => format!(" on line {}", semantic.line(text)),
                _ => String::new(),
            };
            return Err(CompileError::new(format!(
                "Internal module {}{location}: {}",
                internal.display_path(),
                err.message()
            ))
            .into());
        }
    }
    internal
        .exports()
        .ok_or_else(|| CompileError::new("INVARIANT: compiled internal module has no exports").into())
}

fn syntax_failure(display_path: &str, text: &str, errors: &[SyntaxError]) -> CompileError {
    for error in errors {
        tracing::debug!("{}", format_error(display_path, text, error));
    }
    match errors.first() {
        Some(first) => CompileError::new(format!(
            "invalid syntax on line {}: {}",
            first.line(text),
            first.message
        )),
        None => CompileError::new("invalid syntax"),
    }
}
