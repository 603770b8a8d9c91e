//! SSE-safe line text.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use super::demux::LogFrame;

/// A single log line that is safe to place after `data: `.
///
/// Invariant: contains no `\r` and no `\n` byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine(String);

impl LogLine {
    /// Decode (lossily) and sanitise a frame's payload.
    pub fn from_frame(frame: &LogFrame) -> Self {
        Self(sanitize(&String::from_utf8_lossy(&frame.payload)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Encode as one SSE record: `data: <line>\n\n`.
    pub fn to_sse_record(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.0.len() + 8);
        buf.put_slice(b"data: ");
        buf.put_slice(self.0.as_bytes());
        buf.put_slice(b"\n\n");
        buf.freeze()
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Drop every CR and escape every LF as the two characters `\n`.
///
/// Idempotent: the output contains neither byte, so a second pass is a no-op.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\r' => {}
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}
