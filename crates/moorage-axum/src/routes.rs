//! Route definitions and router construction.
//!
//! Axum 0.8 uses brace syntax for path parameters: `{id}`, `{name}`.
//! Action segments are matched as a parameter and parsed by the handler,
//! so unknown actions get a 400 instead of a 404.

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::error::HttpError;
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods(AnyOrigin)
            .allow_headers(AnyOrigin),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin)
        }
    }
}

/// All API routes without the `/api` prefix.
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        // Docker API
        .route("/docker/containers", get(handlers::containers::list))
        .route(
            "/docker/containers/{id}/logs/stream",
            get(handlers::logs::stream),
        )
        .route(
            "/docker/containers/{id}/{action}",
            post(handlers::containers::action),
        )
        // Compose projects API
        .route("/production/projects", get(handlers::projects::list))
        .route(
            "/production/projects/{name}/compose",
            get(handlers::projects::compose_file),
        )
        .route(
            "/production/projects/{name}/env",
            get(handlers::projects::env_file),
        )
        .route(
            "/production/projects/{name}/{action}",
            post(handlers::projects::action),
        )
}

/// Create the main Axum router with all API routes under `/api`.
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);

    Router::new()
        .nest("/api", api_routes())
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors_config))
}

/// Convert a handler panic into the standard JSON error body.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = %detail, "handler panicked");
    HttpError::Internal("internal server error".to_string()).into_response()
}
