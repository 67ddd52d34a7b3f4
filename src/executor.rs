//! External command execution capability
//!
//! Every interaction with the container runtime goes through a
//! [`CommandExecutor`]. The shell-backed [`ShellExecutor`] is used in
//! production; tests substitute a scripted implementation and assert the
//! exact command sequence that was issued.

use async_trait::async_trait;
use tracing::debug;

use crate::errors::{ProvisionError, ProvisionResult};

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout and stderr joined, for error reporting
    pub fn combined(&self) -> String {
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (true, true) => String::new(),
            (false, true) => self.stdout.trim_end().to_string(),
            (true, false) => self.stderr.trim_end().to_string(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr.trim_end()),
        }
    }
}

/// Runs shell commands to completion
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run a command and capture its output regardless of exit status
    async fn execute(&self, command: &str) -> ProvisionResult<CommandOutput>;

    /// Run a command, failing on a non-zero exit status
    ///
    /// Returns captured stdout on success.
    async fn run(&self, command: &str) -> ProvisionResult<String> {
        debug!(command, "running command");
        let output = self.execute(command).await?;

        if !output.success() {
            return Err(ProvisionError::CommandExecution {
                command: command.to_string(),
                exit_code: output.exit_code,
                output: output.combined(),
            });
        }

        Ok(output.stdout)
    }
}

/// Executes commands through `sh -c` on the local host
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    async fn execute(&self, command: &str) -> ProvisionResult<CommandOutput> {
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .await
            .map_err(|source| ProvisionError::Spawn {
                command: command.to_string(),
                source,
            })?;

        // Killed by a signal: no exit code
        let exit_code = output.status.code().unwrap_or(-1);

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
        })
    }
}
