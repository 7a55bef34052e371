//! Wire types shared by the client, the parser and the stream state.

mod request;
mod track;

pub use request::{Preferences, RecommendationRequest};
pub use track::{Candidate, TrackRecord};
