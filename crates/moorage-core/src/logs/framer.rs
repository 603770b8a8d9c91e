//! Line reassembly over an upstream byte stream.
//!
//! Upstream chunks arrive at arbitrary boundaries. [`LineSplitter`] buffers
//! partial lines until their newline arrives, and [`frame_lines`] turns a
//! byte stream into a stream of sanitised [`LogLine`]s in arrival order.

use bytes::{Bytes, BytesMut};
use futures_util::stream::{Stream, StreamExt};
use thiserror::Error;
use tracing::debug;

use super::demux::LogFrame;
use super::sanitize::LogLine;
use crate::ports::RegistryError;

/// Longest line accepted from upstream. Longer lines end the stream.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Why a framed log stream ended early.
#[derive(Debug, Error)]
pub enum FrameError {
    /// A line grew past the limit without a newline. Fatal for the stream:
    /// resynchronising would risk emitting the tail of a binary frame.
    #[error("log line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    /// The upstream source failed mid-stream.
    #[error("upstream read failed: {0}")]
    Upstream(#[from] RegistryError),
}

/// Incremental newline splitter with a length bound.
#[derive(Debug)]
pub struct LineSplitter {
    pending: BytesMut,
    /// Bytes of `pending` already searched for a newline.
    scanned: usize,
    max_line: usize,
}

impl LineSplitter {
    pub fn new(max_line: usize) -> Self {
        Self {
            pending: BytesMut::new(),
            scanned: 0,
            max_line,
        }
    }

    /// Buffer another upstream chunk.
    pub fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
    }

    /// Next complete line without its `\n`, if one is buffered.
    ///
    /// Returns an error once a line (complete or still pending) is longer
    /// than the limit; the splitter should not be used afterwards.
    pub fn next_line(&mut self) -> Option<Result<Bytes, FrameError>> {
        let newline = self.pending[self.scanned..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|offset| self.scanned + offset);

        match newline {
            Some(pos) if pos > self.max_line => Some(Err(self.too_long())),
            Some(pos) => {
                let mut line = self.pending.split_to(pos + 1);
                line.truncate(pos);
                self.scanned = 0;
                Some(Ok(line.freeze()))
            }
            None if self.pending.len() > self.max_line => Some(Err(self.too_long())),
            None => {
                self.scanned = self.pending.len();
                None
            }
        }
    }

    /// Take the final unterminated line at end of stream.
    pub fn finish(&mut self) -> Option<Bytes> {
        self.scanned = 0;
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.split().freeze())
        }
    }

    fn too_long(&self) -> FrameError {
        FrameError::LineTooLong {
            limit: self.max_line,
        }
    }
}

/// Frame an upstream byte stream into sanitised log lines.
///
/// Lines are yielded in upstream order. The stream ends after upstream EOF
/// (flushing a trailing unterminated line), or after yielding the first
/// error. Dropping the returned stream drops `source`.
pub fn frame_lines<S>(source: S) -> impl Stream<Item = Result<LogLine, FrameError>> + Send
where
    S: Stream<Item = Result<Bytes, RegistryError>> + Send + 'static,
{
    frame_lines_with_limit(source, MAX_LINE_BYTES)
}

/// [`frame_lines`] with an explicit line limit.
pub fn frame_lines_with_limit<S>(
    source: S,
    max_line: usize,
) -> impl Stream<Item = Result<LogLine, FrameError>> + Send
where
    S: Stream<Item = Result<Bytes, RegistryError>> + Send + 'static,
{
    async_stream::stream! {
        let mut source = Box::pin(source);
        let mut splitter = LineSplitter::new(max_line);

        while let Some(chunk) = source.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    debug!(error = %e, "upstream log read failed");
                    yield Err(FrameError::Upstream(e));
                    return;
                }
            };

            splitter.push(&chunk);
            while let Some(line) = splitter.next_line() {
                match line {
                    Ok(raw) => yield Ok(LogLine::from_frame(&LogFrame::from_line(raw))),
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        if let Some(rest) = splitter.finish() {
            yield Ok(LogLine::from_frame(&LogFrame::from_line(rest)));
        }
    }
}
