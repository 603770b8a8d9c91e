//! Core domain types, port definitions and services for moorage.
//!
//! This crate holds everything that does not depend on a concrete transport
//! or container runtime: the log demultiplexer and SSE framer, the action
//! dispatcher, project discovery and the error taxonomy that adapters map
//! onto their own error types.
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod logs;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{
    AppConfig, COMPOSE_FILE_NAME, COMPOSE_PROJECT_LABEL, DEFAULT_COMPOSE_PROGRAM, DEFAULT_LISTEN_ADDR,
    DEFAULT_PROJECT_ROOT, DEFAULT_TAIL, ENV_FILE_NAME, Timeouts,
};
pub use domain::{
    ActionReport, Container, ContainerAction, ContainerCounts, ProjectAction, ProjectFile,
    ProjectFileKind, ProjectName, ProjectRecord, sort_containers, tally_by_project,
};
pub use logs::{FrameError, LogFrame, LogLine, MAX_LINE_BYTES, SSE_OPEN_COMMENT};
pub use ports::{
    CommandError, CommandOutput, CommandRunner, CommandSpec, ContainerRegistry, CoreError,
    LogHandle, LogOptions, RegistryError,
};
pub use services::{ContainerService, ProjectService, resolve_tail};

// Silence unused dev-dependency warnings; used by integration-style unit tests
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tempfile as _;
