//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `bollard` types in any signature
//! - No process spawning details beyond program, arguments and working directory
//! - Every call is bounded by a deadline applied by the calling service

pub mod command;
pub mod registry;

use std::time::Duration;
use thiserror::Error;

pub use command::{CommandOutput, CommandRunner, CommandSpec};
pub use registry::{ContainerRegistry, LogByteStream, LogHandle, LogOptions};

/// Errors reported by a container registry adapter.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The daemon does not know the container.
    #[error("no such container: {0}")]
    NotFound(String),

    /// The daemon could not be reached (socket missing, connection reset).
    #[error("daemon unreachable: {0}")]
    Unavailable(String),

    /// The daemon answered but refused the operation.
    #[error("{0}")]
    Rejected(String),

    /// The call did not finish before its deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors reported by a command runner.
///
/// A command that runs and exits non-zero is NOT an error at this level;
/// it is reported through [`CommandOutput::success`].
#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading output or waiting for exit failed.
    #[error("i/o error while running {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command outlived its deadline and was killed.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Core error type for semantic domain errors.
///
/// This is the canonical error type used across the core domain.
/// Adapters map it to their own error types (HTTP status codes, exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid input (unknown action, hidden or malformed identifier).
    #[error("{0}")]
    Validation(String),

    /// A file or project that should exist does not.
    #[error("{0}")]
    NotFound(String),

    /// A registry call failed. `operation` names the call and its target.
    #[error("{operation}: {source}")]
    Registry {
        operation: String,
        #[source]
        source: RegistryError,
    },

    /// A compose command could not be run at all.
    #[error("{operation}: {source}")]
    Command {
        operation: String,
        #[source]
        source: CommandError,
    },

    /// A compose command ran and failed; `message` carries its output verbatim.
    #[error("{message}")]
    ActionFailed { message: String },

    /// Filesystem access failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// Wrap a registry error with the operation that produced it.
    pub fn registry(operation: impl Into<String>, source: RegistryError) -> Self {
        Self::Registry {
            operation: operation.into(),
            source,
        }
    }

    /// Wrap an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// True when the error means "the thing asked for does not exist".
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Registry {
                    source: RegistryError::NotFound(_),
                    ..
                }
        )
    }
}
