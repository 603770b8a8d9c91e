//! Log line pipeline: framing, header stripping, sanitisation.
//!
//! Upstream bytes flow through [`frame_lines`] which splits on newlines,
//! strips a leading multiplex header when present ([`LogFrame`]) and
//! sanitises the text ([`LogLine`]) so each line can be written as a single
//! SSE `data:` record.

mod demux;
mod framer;
mod sanitize;

pub use demux::{LogFrame, MUX_HEADER_LEN, looks_like_mux_header};
pub use framer::{
    FrameError, LineSplitter, MAX_LINE_BYTES, frame_lines, frame_lines_with_limit,
};
pub use sanitize::{LogLine, sanitize};

/// SSE comment sent as soon as a stream is established.
pub const SSE_OPEN_COMMENT: &str = ": ok\n\n";
