//! CLI-specific error types and mappings.
//!
//! Maps startup failures to exit codes and user-facing messages.

use moorage_core::CoreError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or configuration value that can never work.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Logging or environment setup failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The server failed to start or stopped with an error.
    #[error("Server error: {0}")]
    Server(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 78: Configuration error (`EX_CONFIG`)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Server(_) => 1,
            Self::Arguments(_) => 2,
            Self::Config(_) => 78,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Arguments(msg),
            other => Self::Server(other.to_string()),
        }
    }
}
