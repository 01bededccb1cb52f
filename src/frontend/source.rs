//! Where a module's text comes from.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use xxhash_rust::xxh64::xxh64;

use crate::config::CompilerOptions;
use crate::errors::UserError;

/// Qualifier of the privileged standard-library module injected into every other module.
pub const INTERNAL_MODULE: &str = "_internal";

/// Counter behind `src_NNNN` ids. Only ever incremented, so ids never repeat within a process.
static NEXT_STRING_MODULE: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a module, used as the prefix of its types' ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSource {
    /// A source file, relative to the working directory unless absolute.
    File(PathBuf),
    /// A standard-library module by dotted qualifier, e.g. `math`.
    Stdlib(String),
    /// Source text held in memory.
    Inline(String),
}

impl ModuleSource {
    /// Derive a fresh id for a module wrapping this source.
    ///
    /// File and stdlib ids hash the qualifier and are stable across runs. In-memory sources get a
    /// process-wide sequence number instead, so identical snippets never share type ids.
    pub fn derive_id(&self) -> ModuleId {
        match self {
            ModuleSource::File(path) => {
                let hash = xxh64(path.to_string_lossy().as_bytes(), 0);
                ModuleId(format!("mod_{hash:016x}"))
            }
            ModuleSource::Stdlib(qualifier) => {
                let hash = xxh64(qualifier.as_bytes(), 0);
                ModuleId(format!("lib_{hash:016x}"))
            }
            ModuleSource::Inline(_) => {
                let n = NEXT_STRING_MODULE.fetch_add(1, Ordering::Relaxed);
                ModuleId(format!("src_{n:04}"))
            }
        }
    }

    /// Path the source is read from. `None` for in-memory sources.
    pub fn resolve_path(&self, options: &CompilerOptions) -> Option<PathBuf> {
        match self {
            ModuleSource::File(path) if path.is_absolute() => Some(path.clone()),
            ModuleSource::File(path) => Some(options.cwd.join(path)),
            ModuleSource::Stdlib(qualifier) => Some(stdlib_file(&options.stdlib_path, qualifier)),
            ModuleSource::Inline(_) => None,
        }
    }

    /// Read the module's text.
    ///
    /// In-memory text is returned exactly as given. File contents have their line endings
    /// normalized to `\n`.
    pub fn load_text(&self, options: &CompilerOptions) -> Result<String, UserError> {
        match self {
            ModuleSource::Inline(code) => Ok(code.clone()),
            _ => {
                let path = self
                    .resolve_path(options)
                    .ok_or_else(|| UserError::new("Module has no source path"))?;
                let text = fs::read_to_string(&path).map_err(|err| {
                    UserError::new(format!("Cannot read module '{}': {err}", path.display()))
                })?;
                Ok(with_unix_endl(&text))
            }
        }
    }

    /// Directory imports are resolved against first.
    pub fn source_directory(&self, options: &CompilerOptions) -> PathBuf {
        self.resolve_path(options)
            .and_then(|path| path.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| options.cwd.clone())
    }

    /// Short human-readable location for diagnostics.
    pub fn display_path(&self) -> String {
        match self {
            ModuleSource::File(path) => path.display().to_string(),
            ModuleSource::Stdlib(qualifier) => {
                format!("<stdlib>/{}", stdlib_relative(qualifier).display())
            }
            ModuleSource::Inline(_) => "<string>".to_string(),
        }
    }

    pub fn is_stdlib(&self) -> bool {
        matches!(self, ModuleSource::Stdlib(_))
    }

    /// True for the privileged internal standard-library module.
    pub fn is_internal(&self) -> bool {
        matches!(self, ModuleSource::Stdlib(qualifier) if qualifier == INTERNAL_MODULE)
    }
}

/// `a.b` → `a/b.py`
fn stdlib_relative(qualifier: &str) -> PathBuf {
    let mut path: PathBuf = qualifier.split('.').collect();
    path.set_extension("py");
    path
}

fn stdlib_file(stdlib_path: &Path, qualifier: &str) -> PathBuf {
    stdlib_path.join(stdlib_relative(qualifier))
}

/// Normalize `\r\n` line endings to `\n` and drop stray `\r`.
pub fn with_unix_endl(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "")
}
