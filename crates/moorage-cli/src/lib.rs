//! Command-line adapter for moorage.
//!
//! Parses flags and environment into an `AppConfig`, installs logging and
//! signal handling, then hands control to the HTTP server.

pub mod error;
pub mod logging;
pub mod parser;
pub mod signal;

pub use error::CliError;
pub use logging::init_tracing;
pub use parser::Cli;
pub use signal::cancel_on_signal;
