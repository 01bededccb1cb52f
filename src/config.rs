//! Compiler configuration.
//!
//! [`CompilerOptions`] is built once before any module is registered and then passed by reference to
//! the driver, every module pipeline, and the backend invocation. Nothing reads configuration from
//! ambient global state after that point.

use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::errors::UserError;

/// Environment variable overriding the standard library location.
pub const STDLIB_ENV_VAR: &str = "PYRITE_STDLIB";
/// Environment variable overriding the backend compiler command.
pub const BACKEND_ENV_VAR: &str = "PYRITE_BACKEND";
/// Backend compiler used when nothing else is configured.
pub const DEFAULT_BACKEND_COMMAND: &str = "clang";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Directory holding the standard library sources (`_internal.py`, ...).
    pub stdlib_path: PathBuf,
    /// Standard library modules registered with every build, by qualifier.
    pub stdlib_include: Vec<String>,
    /// Extra directories searched for imports after the importer's own directory.
    pub include_paths: Vec<PathBuf>,
    /// Working directory: base for relative source paths and home of `_build/`.
    pub cwd: PathBuf,
    pub enable_color: bool,
    /// Name or path of the native backend compiler.
    pub backend_command: String,
}

impl CompilerOptions {
    /// Options with no includes, color off and the default backend command.
    pub fn new(stdlib_path: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            stdlib_path: stdlib_path.into(),
            stdlib_include: Vec::new(),
            include_paths: Vec::new(),
            cwd: cwd.into(),
            enable_color: false,
            backend_command: DEFAULT_BACKEND_COMMAND.to_string(),
        }
    }

    pub fn with_stdlib_include<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stdlib_include = modules.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_include_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.include_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_color(mut self, enable_color: bool) -> Self {
        self.enable_color = enable_color;
        self
    }

    pub fn with_backend_command(mut self, command: impl Into<String>) -> Self {
        self.backend_command = command.into();
        self
    }

    /// Build options from the running process: working directory, terminal, and environment.
    ///
    /// ## Errors
    /// Returns a [`UserError`] if the working directory is unavailable or the standard library
    /// cannot be located.
    pub fn from_environment() -> Result<Self, UserError> {
        let cwd = env::current_dir()
            .map_err(|err| UserError::new(format!("Cannot determine the working directory: {err}")))?;

        let stdlib_path = find_stdlib_dir(&cwd).ok_or_else(|| {
            UserError::new(format!(
                "Could not locate the Pyrite standard library; set {STDLIB_ENV_VAR} to its directory"
            ))
        })?;

        let enable_color = std::io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none();
        let backend_command =
            env::var(BACKEND_ENV_VAR).unwrap_or_else(|_| DEFAULT_BACKEND_COMMAND.to_string());

        tracing::debug!(stdlib = %stdlib_path.display(), cwd = %cwd.display(), "configuration loaded");

        Ok(Self::new(stdlib_path, cwd)
            .with_color(enable_color)
            .with_backend_command(backend_command))
    }
}

/// Find the standard library directory.
///
/// Search order: the `PYRITE_STDLIB` variable, then `stdlib/` next to the executable and up to two
/// parents (covers `target/debug`), then `stdlib/` under the working directory.
fn find_stdlib_dir(cwd: &Path) -> Option<PathBuf> {
    if let Ok(stdlib_path) = env::var(STDLIB_ENV_VAR) {
        let path = PathBuf::from(stdlib_path);
        if path.is_dir() {
            return Some(path);
        }
        tracing::warn!(path = %path.display(), "{STDLIB_ENV_VAR} is not a directory, ignoring");
    }

    if let Ok(exe_path) = env::current_exe() {
        let mut dir = exe_path.parent();
        for _ in 0..3 {
            let Some(current) = dir else { break };
            let stdlib = current.join("stdlib");
            if stdlib.is_dir() {
                return Some(stdlib);
            }
            dir = current.parent();
        }
    }

    let dev_stdlib = cwd.join("stdlib");
    dev_stdlib.is_dir().then_some(dev_stdlib)
}
