//! Log streaming sessions.
//!
//! A [`StreamSession`] owns everything one live log response holds: the
//! framed upstream stream, a cancellation token derived from the server
//! shutdown token, and a reference to the registry connection. The session
//! is moved into the response body stream, so it is dropped when the stream
//! ends on its own or when hyper drops the body after a client disconnect.
//! Teardown happens in [`Drop`], in a fixed order, on every path.
//!
//! The registry reference is a clone of the shared client; the underlying
//! HTTP connections are pooled by the Docker client, so releasing it only
//! drops this session's share rather than closing a socket.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures_util::stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use moorage_core::logs::frame_lines;
use moorage_core::{
    ContainerRegistry, ContainerService, FrameError, LogHandle, LogLine, SSE_OPEN_COMMENT,
};

use crate::error::HttpError;

type LineStream = Pin<Box<dyn Stream<Item = Result<LogLine, FrameError>> + Send>>;

/// One client connection to a container's live log stream.
pub struct StreamSession {
    container_id: String,
    lines: Option<LineStream>,
    cancel: CancellationToken,
    connection: Option<Arc<dyn ContainerRegistry>>,
}

impl StreamSession {
    /// Acquire the upstream log handle and build a session around it.
    ///
    /// Acquisition is bounded by the registry deadline and abandoned if the
    /// server starts shutting down. Errors here are reported as JSON; no
    /// SSE output has been committed yet.
    pub async fn open(
        containers: &ContainerService,
        shutdown: &CancellationToken,
        container_id: &str,
        tail: &str,
    ) -> Result<Self, HttpError> {
        let cancel = shutdown.child_token();

        let handle = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(HttpError::ServiceUnavailable("server is shutting down".to_string()));
            }
            opened = containers.open_logs(container_id, tail) => opened?,
        };

        debug!(container = %container_id, tail = %tail, "log stream session opened");
        Ok(Self::new(container_id, handle, cancel, containers.registry()))
    }

    /// Build a session from an already-open handle.
    pub fn new(
        container_id: impl Into<String>,
        handle: LogHandle,
        cancel: CancellationToken,
        connection: Arc<dyn ContainerRegistry>,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            lines: Some(Box::pin(frame_lines(handle))),
            cancel,
            connection: Some(connection),
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Token that ends this session when cancelled.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// SSE body: the open comment, then one `data:` record per line.
    ///
    /// Each record is a separate item, so each line is flushed as its own
    /// body frame. The stream owns the session and ends without a terminal
    /// event on upstream EOF, framing error or cancellation.
    pub fn into_body_stream(mut self) -> impl Stream<Item = Result<Bytes, Infallible>> + Send {
        async_stream::stream! {
            yield Ok(Bytes::from_static(SSE_OPEN_COMMENT.as_bytes()));

            while let Some(lines) = self.lines.as_mut() {
                let next = tokio::select! {
                    biased;
                    () = self.cancel.cancelled() => {
                        debug!(container = %self.container_id, "log stream cancelled");
                        break;
                    }
                    next = lines.next() => next,
                };

                match next {
                    Some(Ok(line)) => yield Ok(line.to_sse_record()),
                    Some(Err(e @ FrameError::LineTooLong { .. })) => {
                        warn!(container = %self.container_id, error = %e, "closing log stream");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(container = %self.container_id, error = %e, "upstream log stream failed");
                        break;
                    }
                    None => {
                        debug!(container = %self.container_id, "upstream log stream ended");
                        break;
                    }
                }
            }
        }
    }
}

impl IntoResponse for StreamSession {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/event-stream"),
                (header::CACHE_CONTROL, "no-cache"),
                (header::CONNECTION, "keep-alive"),
            ],
            Body::from_stream(self.into_body_stream()),
        )
            .into_response()
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        // Upstream handle first, then the token, then the connection.
        drop(self.lines.take());
        self.cancel.cancel();
        drop(self.connection.take());
        debug!(container = %self.container_id, "log stream session closed");
    }
}
