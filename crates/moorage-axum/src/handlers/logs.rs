//! Live container log streaming over SSE.

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use moorage_core::resolve_tail;

use crate::error::HttpError;
use crate::session::StreamSession;
use crate::state::AppState;

/// Query parameters for the log stream.
#[derive(Debug, Default, Deserialize)]
pub struct LogStreamQuery {
    /// Number of historical lines to replay; `"all"` or a number.
    pub tail: Option<String>,
}

/// Stream a container's logs as Server-Sent Events.
///
/// Failures while opening the upstream stream are returned as a JSON error
/// before any SSE header is written.
pub async fn stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LogStreamQuery>,
) -> Result<StreamSession, HttpError> {
    let tail = resolve_tail(query.tail.as_deref());
    StreamSession::open(&state.containers, &state.shutdown, &id, &tail).await
}
