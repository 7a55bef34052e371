//! Common test utilities for integration tests.
//!
//! Frame and track builders shared by the session and HTTP tests.
//!
//! # Example
//!
//! ```ignore
//! use common::{frame, status_frame};
//!
//! let body = [status_frame("Starting recommendation process..."), frame(r#"{"type":"Complete","tracks":[]}"#)].concat();
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use nexttrack::adapters::mock::{MockHttpClient, MockResponse};
use nexttrack::{Preferences, RecommendationClient, RecommendationRequest, SessionController};

pub const MOCK_URL: &str = "http://mock.local/mb/recommend/stream";

/// One SSE frame carrying `json`.
pub fn frame(json: &str) -> String {
    format!("data: {}\n\n", json)
}

/// Track JSON the way the service sends it.
pub fn track_json(id: &str, name: &str, artist: &str) -> String {
    serde_json::json!({
        "id": id,
        "name": name,
        "artist": artist,
        "features": {"energy": 0.6, "valence": 0.4},
        "popularity": 55,
        "album_art": null,
    })
    .to_string()
}

pub fn status_frame(message: &str) -> String {
    frame(&serde_json::json!({"type": "Status", "message": message}).to_string())
}

pub fn candidate_frame(id: &str, name: &str, score: f64) -> String {
    frame(&format!(
        r#"{{"type":"Candidate","track":{},"score":{}}}"#,
        track_json(id, name, "Test Artist"),
        score
    ))
}

pub fn complete_frame(ids: &[(&str, &str)]) -> String {
    let tracks: Vec<String> = ids
        .iter()
        .map(|(id, name)| track_json(id, name, "Test Artist"))
        .collect();
    frame(&format!(r#"{{"type":"Complete","tracks":[{}]}}"#, tracks.join(",")))
}

pub fn error_frame(message: &str) -> String {
    frame(&serde_json::json!({"type": "Error", "message": message}).to_string())
}

/// The reference session: one Status, two Candidates, one Complete.
pub fn reference_body() -> String {
    [
        status_frame("Found 3 similar tracks to process"),
        candidate_frame("A", "Song A", 0.9),
        candidate_frame("B", "Song B", 0.4),
        complete_frame(&[("A", "Song A")]),
    ]
    .concat()
}

pub fn yesterday_request() -> RecommendationRequest {
    RecommendationRequest::new(["Yesterday - Beatles"], Preferences::default())
        .expect("valid request")
}

/// Controller backed by a mock client answering `MOCK_URL` with `response`.
pub fn mock_controller(response: MockResponse) -> (SessionController, MockHttpClient) {
    let mock = MockHttpClient::new();
    mock.set_response(MOCK_URL, response);
    let client = RecommendationClient::new(Arc::new(mock.clone()), MOCK_URL);
    (SessionController::new(client), mock)
}
