//! Delegated command execution.
//!
//! Every unit of maintenance work that touches the package manager or the
//! mirroring copy tool goes through [`Executor`], so phases can be exercised
//! in tests with a recording double instead of real system commands.
use anyhow::{Context, Result};
use std::process::{Command, Output};

use crate::error::ResourceError;

/// Result of a command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the command exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

impl ExecResult {
    /// Stdout and stderr joined, trimmed of surrounding whitespace.
    #[must_use]
    pub fn combined_output(&self) -> String {
        let out = self.stdout.trim();
        let err = self.stderr.trim();
        match (out.is_empty(), err.is_empty()) {
            (true, _) => err.to_string(),
            (false, true) => out.to_string(),
            (false, false) => format!("{out}\n{err}"),
        }
    }

    /// Convert a non-zero exit into a [`ResourceError::CommandFailed`].
    ///
    /// # Errors
    ///
    /// Returns an error carrying the captured output if the command failed.
    pub fn into_checked(self, label: &str) -> Result<Self, ResourceError> {
        if self.success {
            return Ok(self);
        }
        Err(ResourceError::CommandFailed {
            program: label.to_string(),
            code: self.code.unwrap_or(-1),
            output: self.combined_output(),
        })
    }
}

/// Abstraction over process execution.
///
/// Implemented by [`SystemExecutor`] for real runs; tests substitute a double
/// that records invocations and returns scripted results.
pub trait Executor: Send + Sync {
    /// Run a command and capture its output without interpreting the exit
    /// status.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process could not be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command and fail if it exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exits non-zero;
    /// the error carries the captured output.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let label = command_line(program, args);
        Ok(self.run_unchecked(program, args)?.into_checked(&label)?)
    }

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;

        Ok(ExecResult::from(output))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Render `program` and `args` as a single space-separated command line.
#[must_use]
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
