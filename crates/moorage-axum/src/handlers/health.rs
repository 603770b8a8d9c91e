//! Health handler.

use axum::Json;

use crate::dto::HealthResponse;

/// Liveness check with version and server time.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::now())
}
