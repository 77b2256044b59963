// src/system/executor.rs

use crate::system::settings::ShellConfig;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

/// Why a command line did not run to a successful exit.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The command line was blank.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The shell could not be launched.
    #[error("Could not start '{shell}' to run '{command}': {source}")]
    Spawn {
        /// Shell program.
        shell: String,
        /// Command line handed to it.
        command: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },
    /// The command ran and failed.
    #[error("Command '{command}' exited with code {code}.")]
    NonZeroExit {
        /// Command line.
        command: String,
        /// Exit status.
        code: i32,
    },
    /// The child was killed by a signal.
    #[error("Command '{command}' was interrupted.")]
    Interrupted {
        /// Command line.
        command: String,
    },
    /// A project path could not be quoted for the `cd` prefix.
    #[error("Path '{0}' cannot be used as a working directory in a shell command.")]
    UnquotablePath(String),
}

/// Launches command lines on behalf of the run plan executor.
pub trait ProcessRunner {
    /// Runs `command_line` to completion with the terminal's stdio attached
    /// and returns its exit code.
    fn passthrough(&mut self, command_line: &str) -> Result<i32, ExecutionError>;
}

/// Runs command lines through the configured shell (`sh -c`, `cmd /C`, ...).
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: ShellConfig,
}

impl ShellRunner {
    /// A runner that launches lines through `shell`.
    pub fn new(shell: ShellConfig) -> Self {
        Self { shell }
    }
}

impl ProcessRunner for ShellRunner {
    fn passthrough(&mut self, command_line: &str) -> Result<i32, ExecutionError> {
        let trimmed = command_line.trim();
        if trimmed.is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }

        log::debug!(
            "Spawning {} {:?} {:?}",
            self.shell.program.display(),
            self.shell.args,
            trimmed
        );

        let status = StdCommand::new(&self.shell.program)
            .args(&self.shell.args)
            .arg(trimmed)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ExecutionError::Spawn {
                shell: self.shell.program.display().to_string(),
                command: trimmed.to_string(),
                source: e,
            })?;

        // No exit code means the child was killed by a signal (e.g. Ctrl+C).
        status.code().ok_or_else(|| ExecutionError::Interrupted {
            command: trimmed.to_string(),
        })
    }
}

/// Prefixes `command` with a change into `dir`, so it runs from the project root.
pub fn in_directory(dir: &Path, command: &str) -> Result<String, ExecutionError> {
    let dir_str = dir.to_string_lossy();
    if cfg!(target_os = "windows") {
        if dir_str.contains('"') {
            return Err(ExecutionError::UnquotablePath(dir_str.into_owned()));
        }
        Ok(format!("cd /D \"{}\" && {}", dir_str, command))
    } else {
        let quoted = shlex::try_quote(&dir_str)
            .map_err(|_| ExecutionError::UnquotablePath(dir_str.to_string()))?;
        Ok(format!("cd {} && {}", quoted, command))
    }
}

/// Whether an I/O error means the shell program itself is missing.
pub fn is_missing_program(error: &ExecutionError) -> bool {
    matches!(error, ExecutionError::Spawn { source, .. } if source.kind() == ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_in_directory_quotes_paths() {
        let plain = in_directory(Path::new("/work/api"), "make").unwrap();
        assert_eq!(plain, "cd /work/api && make");

        let spaced = in_directory(Path::new("/work/my api"), "make").unwrap();
        assert_eq!(
            shlex::split(&spaced).unwrap(),
            vec!["cd", "/work/my api", "&&", "make"]
        );
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_shell_runner_reports_exit_codes() {
        let mut runner = ShellRunner::new(ShellConfig {
            program: PathBuf::from("sh"),
            args: vec!["-c".to_string()],
        });
        assert_eq!(runner.passthrough("true").unwrap(), 0);
        assert_eq!(runner.passthrough("exit 3").unwrap(), 3);
    }

    #[test]
    fn test_shell_runner_rejects_empty_command() {
        let mut runner = ShellRunner::new(ShellConfig {
            program: PathBuf::from("sh"),
            args: vec!["-c".to_string()],
        });
        assert!(matches!(
            runner.passthrough("   "),
            Err(ExecutionError::EmptyCommand)
        ));
    }

    #[test]
    fn test_missing_shell_program_is_detected() {
        let mut runner = ShellRunner::new(ShellConfig {
            program: PathBuf::from("pier-no-such-shell-program"),
            args: Vec::new(),
        });
        let error = runner.passthrough("echo hi").unwrap_err();
        assert!(is_missing_program(&error));
    }
}
