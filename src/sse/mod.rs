//! SSE (Server-Sent Events) stream decoding and parsing
//!
//! The recommendation service writes one event per line:
//! - `data: <json>` - event payload, `type` field selects the variant
//! - anything else (comments, `retry:` hints, blank lines) is ignored
//!
//! # Module structure
//! - `decoder` - bytes to frame payloads (FrameDecoder, parse_sse_line)
//! - `events` - RecommendationEvent, SseLine, SseParseError
//! - `parser` - frame payload to RecommendationEvent (parse_frame)

mod decoder;
mod events;
mod parser;

pub use decoder::{parse_sse_line, FrameDecoder};
pub use events::{RecommendationEvent, SseLine, SseParseError};
pub use parser::parse_frame;
