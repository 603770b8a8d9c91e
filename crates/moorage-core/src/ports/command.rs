//! External command port.
//!
//! Compose actions shell out to the compose CLI. This port keeps the
//! services free of process-spawning details so they can be tested with a
//! scripted runner.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use super::CommandError;

/// A command to run: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I, working_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: working_dir.into(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// stdout and stderr interleaved in the order lines arrived.
    pub combined: String,
    /// Whether the exit status was zero.
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl CommandOutput {
    /// A successful run with the given output.
    pub fn ok(combined: impl Into<String>) -> Self {
        Self {
            combined: combined.into(),
            success: true,
            code: Some(0),
        }
    }

    /// A failed run with the given exit code and output.
    pub fn failed(code: i32, combined: impl Into<String>) -> Self {
        Self {
            combined: combined.into(),
            success: false,
            code: Some(code),
        }
    }

    /// Human-readable exit status, e.g. `exit status: 1` or `signal: killed`.
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status: {code}"),
            None => "signal: killed".to_string(),
        }
    }
}

/// Runs external commands with a hard deadline.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `spec` to completion, killing it if `deadline` elapses first.
    async fn run(&self, spec: &CommandSpec, deadline: Duration)
    -> Result<CommandOutput, CommandError>;
}
