//! Compilation driver.
//!
//! The driver owns every [`Module`] of a build, in registration order. [`Compiler::build`]:
//!
//! 1. loads each module and registers the modules its imports resolve to (discovery)
//! 2. orders modules dependencies-first
//! 3. compiles each module against its dependencies' exports
//!
//! A failure is caught per module, reported to the [`DiagnosticSink`], and never aborts the
//! batch: every remaining module is still attempted.

use std::path::PathBuf;

use crate::config::CompilerOptions;
use crate::errors::{BuildError, CompileError, UserError};
use crate::frontend::module::{ImportedModules, Module};
use crate::frontend::resolver::{self, DependencyOrder};
use crate::frontend::source::{ModuleId, ModuleSource};

/// Receives per-module failures as the build runs.
pub trait DiagnosticSink {
    fn compile_error(&mut self, module: &Module, error: &CompileError);
    fn user_error(&mut self, module: &Module, error: &UserError);
}

/// Sink that keeps every reported failure, for tests and embedding.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub failures: Vec<(ModuleId, BuildError)>,
}

impl DiagnosticSink for CollectingSink {
    fn compile_error(&mut self, module: &Module, error: &CompileError) {
        self.failures.push((module.id().clone(), error.clone().into()));
    }

    fn user_error(&mut self, module: &Module, error: &UserError) {
        self.failures.push((module.id().clone(), error.clone().into()));
    }
}

/// Why a module failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Generic source-related failure (syntax, import cycle, failed dependency).
    Compile,
    /// Failure tied to a node of the module's syntax tree.
    Semantic,
    /// Environment or setup failure.
    User,
}

impl FailureKind {
    fn of(error: &BuildError) -> Self {
        match error {
            BuildError::Compile(CompileError::Semantic(_)) => FailureKind::Semantic,
            BuildError::Compile(CompileError::General { .. }) => FailureKind::Compile,
            BuildError::User(_) => FailureKind::User,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    Compiled,
    Failed(FailureKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOutcome {
    pub id: ModuleId,
    pub display_path: String,
    pub status: ModuleStatus,
}

/// Per-module results of one build, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub outcomes: Vec<ModuleOutcome>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.status == ModuleStatus::Compiled)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ModuleOutcome> {
        self.outcomes.iter().filter(|o| o.status != ModuleStatus::Compiled)
    }

    pub fn compiled_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status == ModuleStatus::Compiled).count()
    }

    pub fn outcome(&self, id: &ModuleId) -> Option<&ModuleOutcome> {
        self.outcomes.iter().find(|o| &o.id == id)
    }
}

pub struct Compiler<'o> {
    options: &'o CompilerOptions,
    modules: Vec<Module>,
    entry: Option<usize>,
}

impl<'o> Compiler<'o> {
    /// A driver with the configured standard-library modules already registered.
    pub fn new(options: &'o CompilerOptions) -> Self {
        let mut compiler = Self {
            options,
            modules: Vec::new(),
            entry: None,
        };
        for name in &options.stdlib_include {
            compiler.stdlib_include(name.clone());
        }
        compiler
    }

    pub fn options(&self) -> &CompilerOptions {
        self.options
    }

    /// Append a module. No I/O happens here.
    pub fn register_module(&mut self, source: ModuleSource) -> &Module {
        self.push(source);
        &self.modules[self.modules.len() - 1]
    }

    /// Register a file-backed module, optionally as the program entry point.
    ///
    /// A path resolving to an already registered file (`main.py` and `./main.py`) returns that
    /// module instead of registering a second one.
    pub fn add_source_file(&mut self, path: impl Into<PathBuf>, is_entry: bool) -> &Module {
        let index = self.find_or_push(ModuleSource::File(path.into()));
        if is_entry {
            self.entry = Some(index);
        }
        &self.modules[index]
    }

    /// Register a standard-library module by qualifier, once.
    pub fn stdlib_include(&mut self, name: impl Into<String>) -> &Module {
        let index = self.find_or_push(ModuleSource::Stdlib(name.into()));
        &self.modules[index]
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn entry(&self) -> Option<&Module> {
        self.entry.map(|i| &self.modules[i])
    }

    fn push(&mut self, source: ModuleSource) -> usize {
        let module = Module::new(source);
        tracing::debug!(module = %module.id(), path = %module.display_path(), "registered module");
        self.modules.push(module);
        self.modules.len() - 1
    }

    fn find_or_push(&mut self, source: ModuleSource) -> usize {
        match self.find(&source) {
            Some(index) => index,
            None => self.push(source),
        }
    }

    /// Index of the registered module with the same source, comparing file paths once resolved.
    fn find(&self, source: &ModuleSource) -> Option<usize> {
        let resolved = source.resolve_path(self.options);
        self.modules.iter().position(|m| match (&resolved, m.source()) {
            (_, ModuleSource::Inline(_)) => false,
            (Some(path), other) => other.resolve_path(self.options).as_ref() == Some(path),
            (None, _) => false,
        })
    }

    /// Compile every registered module, and every module they import.
    #[tracing::instrument(skip_all, fields(modules = self.modules.len()))]
    pub fn build(&mut self, sink: &mut dyn DiagnosticSink) -> BuildReport {
        let mut failures: Vec<Option<BuildError>> = Vec::new();
        let mut edges: Vec<Vec<(String, usize)>> = Vec::new();

        // Discovery: `modules` grows while it is walked.
        let mut index = 0;
        while index < self.modules.len() {
            failures.push(None);
            edges.push(Vec::new());
            let imports = match self.modules[index].load(self.options) {
                Ok(parsed) => parsed.program.imported_modules(),
                Err(err) => {
                    failures[index] = Some(err);
                    index += 1;
                    continue;
                }
            };

            let importer_dir = self.modules[index].source().source_directory(self.options);
            for name in imports {
                if resolver::is_virtual(&name) || edges[index].iter().any(|(n, _)| n == &name) {
                    continue;
                }
                let Some(source) = resolver::locate(&name, &importer_dir, self.options) else {
                    // The importer reports the missing module when it compiles.
                    tracing::debug!(import = %name, "import not found");
                    continue;
                };
                let dep = self.find_or_push(source);
                edges[index].push((name, dep));
            }
            index += 1;
        }

        let graph: Vec<Vec<usize>> = edges
            .iter()
            .map(|deps| deps.iter().map(|(_, dep)| *dep).collect())
            .collect();
        let order = dependency_order_logged(&graph);

        for &index in &order.order {
            if failures[index].is_some() {
                continue;
            }
            if let Some(cycle) = order.in_cycle(index) {
                failures[index] = Some(self.cycle_error(cycle).into());
                continue;
            }
            if let Some((name, _)) = edges[index].iter().find(|(_, dep)| failures[*dep].is_some()) {
                failures[index] = Some(
                    CompileError::new(format!("Imported module '{name}' failed to compile")).into(),
                );
                continue;
            }

            let mut imports = ImportedModules::new();
            for (name, dep) in &edges[index] {
                if let Some(exports) = self.modules[*dep].exports() {
                    imports.insert(name.clone(), exports);
                }
            }
            if let Err(err) = self.modules[index].compile(self.options, &imports) {
                failures[index] = Some(err);
            }
        }

        let mut report = BuildReport::default();
        for (module, failure) in self.modules.iter().zip(&failures) {
            let status = match failure {
                None => ModuleStatus::Compiled,
                Some(err) => {
                    tracing::warn!(module = %module.display_path(), error = %err, "module failed");
                    match err {
                        BuildError::Compile(err) => sink.compile_error(module, err),
                        BuildError::User(err) => sink.user_error(module, err),
                    }
                    ModuleStatus::Failed(FailureKind::of(err))
                }
            };
            report.outcomes.push(ModuleOutcome {
                id: module.id().clone(),
                display_path: module.display_path(),
                status,
            });
        }
        report
    }

    fn cycle_error(&self, cycle: &[usize]) -> CompileError {
        let mut names: Vec<String> = cycle.iter().map(|&i| self.modules[i].display_path()).collect();
        if let Some(first) = names.first().cloned() {
            names.push(first);
        }
        CompileError::new(format!("Circular import detected: {}", names.join(" -> ")))
    }
}

fn dependency_order_logged(graph: &[Vec<usize>]) -> DependencyOrder {
    let order = resolver::dependency_order(graph);
    tracing::debug!(order = ?order.order, cycles = order.cycles.len(), "module order");
    order
}
