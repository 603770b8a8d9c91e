//! Shared application state type.

use crate::bootstrap::AxumContext;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// An Arc-wrapped `AxumContext` holding the container and project services
/// plus the server shutdown token.
pub type AppState = Arc<AxumContext>;
