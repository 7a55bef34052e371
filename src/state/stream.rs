//! Per-session stream state and the reducer that applies events to it.

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ErrorOrigin, StreamError};
use crate::models::TrackRecord;
use crate::sse::RecommendationEvent;

use super::candidates::RankedCandidates;
use super::stats::{
    parse_batch_progress, parse_found_similar, parse_not_found_summary, BatchProgress, StreamStats,
};

pub const CONNECTING_STATUS: &str = "Connecting...";
pub const COMPLETE_STATUS: &str = "Complete!";

/// Everything a caller can observe about one session.
///
/// Owned by the session controller; callers only ever see clones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamState {
    pub session_id: Uuid,
    /// Latest status message
    pub status: String,
    /// Top candidates seen so far, best first
    pub candidates: RankedCandidates,
    /// Final ranking, only set by `Complete`
    pub recommendations: Vec<TrackRecord>,
    /// Terminal error message
    pub error: Option<String>,
    /// True until the session reaches a terminal state
    pub is_streaming: bool,
    /// Debug messages in arrival order
    pub debug_info: Vec<String>,
    pub stats: StreamStats,
    pub progress: Option<BatchProgress>,
    /// Number of events applied so far
    pub events_applied: u64,
    #[serde(skip)]
    terminal: bool,
}

impl Default for StreamState {
    fn default() -> Self {
        Self::idle()
    }
}

impl StreamState {
    /// State before any session has been submitted.
    pub fn idle() -> Self {
        Self {
            session_id: Uuid::nil(),
            status: String::new(),
            candidates: RankedCandidates::new(),
            recommendations: Vec::new(),
            error: None,
            is_streaming: false,
            debug_info: Vec::new(),
            stats: StreamStats::default(),
            progress: None,
            events_applied: 0,
            terminal: false,
        }
    }

    /// Fresh state for a newly started session.
    pub fn connecting(session_id: Uuid) -> Self {
        Self {
            session_id,
            status: CONNECTING_STATUS.to_string(),
            is_streaming: true,
            ..Self::idle()
        }
    }

    /// True once `Complete` or `Error` has been applied, or `fail` was called.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_complete(&self) -> bool {
        self.terminal && self.error.is_none()
    }

    /// Apply one event. Returns false if the state is already terminal and
    /// the event was ignored.
    pub fn apply(&mut self, event: RecommendationEvent) -> bool {
        if self.terminal {
            debug!(
                event_type = event.event_type_name(),
                "Ignoring event after terminal state"
            );
            return false;
        }

        match event {
            RecommendationEvent::Status { message } => {
                if let Some(found) = parse_found_similar(&message) {
                    self.stats.total_candidates_found = found;
                }
                if let Some(progress) = parse_batch_progress(&message) {
                    self.progress = Some(progress);
                }
                self.status = message;
            }
            RecommendationEvent::Candidate { track, score } => {
                self.candidates.insert(track, score);
            }
            RecommendationEvent::Complete { tracks } => {
                self.recommendations = tracks;
                self.status = COMPLETE_STATUS.to_string();
                self.close();
            }
            RecommendationEvent::Error { message } => {
                let err = StreamError::ServerReported { message };
                warn!(
                    origin = %ErrorOrigin::Server,
                    code = err.error_code(),
                    "Recommendation service reported an error: {}",
                    err.user_message()
                );
                self.error = Some(err.user_message());
                self.close();
            }
            RecommendationEvent::Debug { message, .. } => {
                if let Some(not_found) = parse_not_found_summary(&message) {
                    self.stats.not_found_in_musicbrainz = not_found;
                }
                self.debug_info.push(message);
            }
        }

        self.events_applied += 1;
        true
    }

    /// End the session with an error that did not come from an event.
    pub fn fail(&mut self, err: &StreamError) -> bool {
        if self.terminal {
            return false;
        }
        warn!(
            origin = %err.origin(),
            code = err.error_code(),
            "Recommendation session failed: {}",
            err
        );
        self.error = Some(err.user_message());
        self.close();
        true
    }

    fn close(&mut self) {
        self.is_streaming = false;
        self.terminal = true;
    }
}

/// Pure form of [`StreamState::apply`].
pub fn reduce(mut state: StreamState, event: RecommendationEvent) -> StreamState {
    state.apply(event);
    state
}
