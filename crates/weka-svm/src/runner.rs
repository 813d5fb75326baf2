//! Running SMO commands.

use std::process::Stdio;

use crate::command::SmoCommand;
use crate::error::WekaError;

/// Executes an [`SmoCommand`] and returns what it printed on stdout.
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion.
    fn run(&self, command: &SmoCommand) -> Result<String, WekaError>;
}

/// Runs commands as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &SmoCommand) -> Result<String, WekaError> {
        tracing::debug!(command = %command, "running weka");

        let output = command
            .to_command()?
            .stdin(Stdio::null())
            .output()
            .map_err(|source| WekaError::Spawn {
                program: command.java.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(WekaError::CommandFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
