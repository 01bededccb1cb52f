//! Subprocess invocation with captured output.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use crate::errors::UserError;
use crate::frontend::source::with_unix_endl;

/// Captured output of a finished command, with `\n` line endings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Run `program` with `args` in `cwd` and wait for it.
///
/// ## Errors
/// Returns a [`UserError`] when the process cannot be started.
pub fn run_command<I, S>(program: &Path, args: I, cwd: &Path) -> Result<CommandOutput, UserError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    tracing::debug!(program = %program.display(), "running command");
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|err| UserError::new(format!("Failed to run '{}': {err}", program.display())))?;

    Ok(CommandOutput {
        success: output.status.success(),
        exit_code: output.status.code(),
        stdout: with_unix_endl(&String::from_utf8_lossy(&output.stdout)),
        stderr: with_unix_endl(&String::from_utf8_lossy(&output.stderr)),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_both_streams() {
        let output = run_command(
            Path::new("/bin/sh"),
            ["-c", "printf 'out\\r\\n'; printf 'err' >&2; exit 3"],
            Path::new("/"),
        )
        .unwrap();
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err");
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(3));
    }

    #[test]
    fn test_missing_program() {
        let err = run_command(Path::new("/no/such/program"), Vec::<&str>::new(), Path::new("/")).unwrap_err();
        assert!(err.message.starts_with("Failed to run"), "{}", err.message);
    }
}
