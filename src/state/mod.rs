//! Session state and the rules for applying stream events to it.

mod candidates;
mod stats;
mod stream;

pub use candidates::{RankedCandidates, MAX_CANDIDATES};
pub use stats::{
    parse_batch_progress, parse_found_similar, parse_not_found_summary, BatchProgress,
    StreamStats,
};
pub use stream::{reduce, StreamState, COMPLETE_STATUS, CONNECTING_STATUS};
