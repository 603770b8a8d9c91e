//! Runtime adapters for moorage.
//!
//! Concrete implementations of the `moorage-core` ports:
//! - [`DockerRegistry`]: the container registry over the local Docker socket
//! - [`ProcessCommandRunner`]: compose commands as child processes
#![deny(unsafe_code)]

mod command;
mod docker;

pub use command::ProcessCommandRunner;
pub use docker::DockerRegistry;

#[cfg(test)]
use tempfile as _;
