//! HTTP request handlers for the Axum web server.
//!
//! Each submodule contains handlers for a specific API area.
//! Handlers are thin wrappers that parse path parameters at the edge and
//! delegate to the core services.

pub mod containers;
pub mod health;
pub mod logs;
pub mod projects;
