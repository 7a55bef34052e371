//! SSE event type definitions
//!
//! Contains the typed events sent by the recommendation service, the
//! line classification used by the decoder, and the frame parse error.

use serde::{Deserialize, Serialize};

use crate::models::TrackRecord;

/// Represents one decoded SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Data payload (e.g., "data: {\"type\":\"Status\",...}")
    Data(String),
    /// Empty line
    Empty,
    /// Comment line (starts with ':')
    Comment(String),
    /// Any other field (`event:`, `id:`, `retry:`, `data:` without a space)
    Other(String),
}

/// Typed events from the recommendation stream, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RecommendationEvent {
    /// Human-readable progress message
    Status { message: String },
    /// Provisional scored track, emitted while the server is still ranking
    Candidate { track: TrackRecord, score: f64 },
    /// Final ranked recommendations
    Complete { tracks: Vec<TrackRecord> },
    /// Failure reported by the service
    Error { message: String },
    /// Diagnostic message
    Debug {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
}

impl RecommendationEvent {
    /// Discriminator values accepted in the `type` field.
    pub const TYPE_NAMES: [&'static str; 5] = ["Status", "Candidate", "Complete", "Error", "Debug"];

    /// Returns the event type name as sent on the wire.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            RecommendationEvent::Status { .. } => "Status",
            RecommendationEvent::Candidate { .. } => "Candidate",
            RecommendationEvent::Complete { .. } => "Complete",
            RecommendationEvent::Error { .. } => "Error",
            RecommendationEvent::Debug { .. } => "Debug",
        }
    }

    /// `Complete` and `Error` end the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RecommendationEvent::Complete { .. } | RecommendationEvent::Error { .. }
        )
    }
}

/// Why a frame payload could not be turned into an event.
#[derive(Debug, Clone, PartialEq)]
pub enum SseParseError {
    /// Payload is not JSON, or its fields don't match the declared type
    InvalidJson {
        event_type: Option<String>,
        source: String,
    },
    /// JSON object without a string `type` field
    MissingType,
    /// `type` names an event this client does not know
    UnknownEventType(String),
}

impl std::fmt::Display for SseParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SseParseError::InvalidJson {
                event_type: Some(t),
                source,
            } => write!(f, "Invalid JSON for event '{}': {}", t, source),
            SseParseError::InvalidJson {
                event_type: None,
                source,
            } => write!(f, "Invalid JSON: {}", source),
            SseParseError::MissingType => write!(f, "Missing 'type' field"),
            SseParseError::UnknownEventType(t) => write!(f, "Unknown SSE event type: {}", t),
        }
    }
}

impl std::error::Error for SseParseError {}
