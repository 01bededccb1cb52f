//! Native backend invocation.
//!
//! Generated LLVM IR is written to `<cwd>/_build/build.ll` and handed to the configured backend
//! compiler (clang by default). Any output on the backend's stderr counts as a failure: the full
//! report goes to `_build/backend_error.txt` and the user gets a [`UserError`] pointing there.

use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::command::run_command;
use crate::config::CompilerOptions;
use crate::errors::UserError;

pub const BUILD_DIR: &str = "_build";
pub const IR_FILE: &str = "build.ll";
pub const ERROR_REPORT_FILE: &str = "backend_error.txt";

#[derive(Debug)]
pub struct BackendCompiler<'o> {
    options: &'o CompilerOptions,
    command_path: PathBuf,
}

impl<'o> BackendCompiler<'o> {
    /// Locate the configured backend command.
    ///
    /// ## Errors
    /// Returns a [`UserError`] when the command is not installed.
    pub fn new(options: &'o CompilerOptions) -> Result<Self, UserError> {
        let command_path = find_executable(&options.backend_command).ok_or_else(|| {
            UserError::new(format!(
                "Pyrite requires {} to be installed, but no such installation was found.",
                options.backend_command
            ))
        })?;
        tracing::debug!(backend = %command_path.display(), "backend compiler found");
        Ok(Self { options, command_path })
    }

    pub fn command_path(&self) -> &Path {
        &self.command_path
    }

    pub fn build_dir(&self) -> PathBuf {
        self.options.cwd.join(BUILD_DIR)
    }

    /// Compile `ir` into the executable `output`.
    pub fn compile_ir(&self, ir: &str, output: &Path) -> Result<(), UserError> {
        let build_dir = self.build_dir();
        fs::create_dir_all(&build_dir).map_err(|err| {
            UserError::new(format!("Cannot create build directory '{}': {err}", build_dir.display()))
        })?;

        let ir_path = build_dir.join(IR_FILE);
        fs::write(&ir_path, ir)
            .map_err(|err| UserError::new(format!("Cannot write '{}': {err}", ir_path.display())))?;

        let result = run_command(
            &self.command_path,
            [ir_path.as_os_str(), OsStr::new("-o"), output.as_os_str()],
            &self.options.cwd,
        )?;

        if !result.stderr.is_empty() {
            let report = build_dir.join(ERROR_REPORT_FILE);
            fs::write(&report, &result.stderr)
                .map_err(|err| UserError::new(format!("Cannot write '{}': {err}", report.display())))?;
            return Err(UserError::new(format!(
                "An unexpected error occurred during the compilation process. A detailed report has been written to {}",
                build_dir.display()
            )));
        }
        Ok(())
    }
}

/// Resolve `command` like a shell would: paths are taken as-is, bare names are searched on `PATH`.
fn find_executable(command: &str) -> Option<PathBuf> {
    let candidate = Path::new(command);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var).find_map(|dir| {
        let full = dir.join(command);
        if full.is_file() {
            return Some(full);
        }
        let exe = full.with_extension(env::consts::EXE_EXTENSION);
        (!env::consts::EXE_EXTENSION.is_empty() && exe.is_file()).then_some(exe)
    })
}
