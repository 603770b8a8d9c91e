//! Multiplex header stripping.
//!
//! The daemon prefixes each chunk of a non-TTY log stream with an 8-byte
//! header: `[stream, 0, 0, 0, len_be32]`. When such a header lands at the
//! start of a scanned line it would otherwise leak binary bytes into the
//! event stream. The check here is a heuristic, not a parser: the length
//! field is never read, and a header in the middle of a line is left alone.

use bytes::Bytes;

/// Size of the multiplex header.
pub const MUX_HEADER_LEN: usize = 8;

const STDOUT_MARKER: u8 = 1;
const STDERR_MARKER: u8 = 2;

/// One raw line after header detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFrame {
    pub payload: Bytes,
    /// Whether a multiplex header was detected and removed.
    pub mux_header_stripped: bool,
}

impl LogFrame {
    /// Apply the header heuristic to one raw line (without its newline).
    pub fn from_line(line: Bytes) -> Self {
        if looks_like_mux_header(&line) {
            Self {
                payload: line.slice(MUX_HEADER_LEN..),
                mux_header_stripped: true,
            }
        } else {
            Self {
                payload: line,
                mux_header_stripped: false,
            }
        }
    }
}

/// At least 8 bytes, stdout/stderr marker first, then three zero bytes.
pub fn looks_like_mux_header(line: &[u8]) -> bool {
    line.len() >= MUX_HEADER_LEN
        && matches!(line[0], STDOUT_MARKER | STDERR_MARKER)
        && line[1..4] == [0, 0, 0]
}
