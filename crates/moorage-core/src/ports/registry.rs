//! Container registry port.
//!
//! Wraps the container-runtime daemon: listing, lifecycle actions and
//! live log handles. Implementations live in `moorage-runtime`.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};

use super::RegistryError;
use crate::domain::Container;

/// Raw log bytes as delivered by the daemon, in arrival order.
pub type LogByteStream = BoxStream<'static, Result<Bytes, RegistryError>>;

/// Options for opening a log stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub stdout: bool,
    pub stderr: bool,
    /// Keep the stream open and deliver new output as it is written.
    pub follow: bool,
    pub timestamps: bool,
    /// Passed through to the daemon verbatim ("200", "all", ...).
    pub tail: String,
}

impl LogOptions {
    /// Live-tail options: both streams, follow, no timestamps.
    pub fn follow_tail(tail: impl Into<String>) -> Self {
        Self {
            stdout: true,
            stderr: true,
            follow: true,
            timestamps: false,
            tail: tail.into(),
        }
    }
}

/// An open upstream log stream for one container.
///
/// Dropping the handle releases the upstream connection.
pub struct LogHandle {
    container_id: String,
    stream: LogByteStream,
    /// First chunk read by [`LogHandle::settle`], replayed before the stream.
    pending: Option<Bytes>,
}

impl LogHandle {
    /// Wrap an already-open byte stream.
    pub fn new(container_id: impl Into<String>, stream: LogByteStream) -> Self {
        Self {
            container_id: container_id.into(),
            stream,
            pending: None,
        }
    }

    /// Build a handle from any sendable byte stream.
    pub fn from_stream<S>(container_id: impl Into<String>, stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, RegistryError>> + Send + 'static,
    {
        Self::new(container_id, stream.boxed())
    }

    /// Container this handle reads from.
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Wait up to `window` for the first upstream item.
    ///
    /// The daemon only receives the log request once the stream is polled,
    /// so a refused request shows up as the first item. That error is
    /// returned here. A first chunk is kept and yielded before the rest of
    /// the stream; a quiet stream past `window` is not an error.
    pub async fn settle(mut self, window: Duration) -> Result<Self, RegistryError> {
        match tokio::time::timeout(window, self.stream.next()).await {
            Ok(Some(Ok(chunk))) => self.pending = Some(chunk),
            Ok(Some(Err(e))) => return Err(e),
            Ok(None) => self.stream = stream::empty().boxed(),
            Err(_) => {}
        }
        Ok(self)
    }
}

impl fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogHandle")
            .field("container_id", &self.container_id)
            .finish_non_exhaustive()
    }
}

impl Stream for LogHandle {
    type Item = Result<Bytes, RegistryError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(chunk) = self.pending.take() {
            return Poll::Ready(Some(Ok(chunk)));
        }
        self.stream.poll_next_unpin(cx)
    }
}

/// Container runtime operations.
///
/// Deadlines are applied by the calling service; implementations only need
/// to be cancel-safe (dropping the future abandons the call).
#[async_trait]
pub trait ContainerRegistry: Send + Sync {
    /// List containers. `all` includes stopped ones.
    async fn list(&self, all: bool) -> Result<Vec<Container>, RegistryError>;

    /// Start a container.
    async fn start(&self, id: &str) -> Result<(), RegistryError>;

    /// Stop a container, killing it after `grace`.
    async fn stop(&self, id: &str, grace: Duration) -> Result<(), RegistryError>;

    /// Restart a container, killing it after `grace` if it does not stop.
    async fn restart(&self, id: &str, grace: Duration) -> Result<(), RegistryError>;

    /// Open a log stream. Fails before returning if the container is unknown.
    async fn logs(&self, id: &str, options: LogOptions) -> Result<LogHandle, RegistryError>;
}
