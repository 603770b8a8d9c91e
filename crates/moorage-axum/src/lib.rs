//! Axum HTTP adapter for moorage.
//!
//! Exposes container lifecycle, live log streaming (SSE) and compose
//! project management under `/api`. [`bootstrap`] is the composition root
//! that wires the runtime adapters into the core services;
//! [`start_server`] binds and serves until the shutdown token fires.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings; used by integration tests
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod session;
pub mod state;

// Re-export primary types
pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, bootstrap_with, start_server};
pub use error::HttpError;
pub use routes::create_router;
pub use session::StreamSession;
pub use state::AppState;
