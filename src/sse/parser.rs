//! Frame payload parsing
//!
//! Turns the text after `data: ` into a [`RecommendationEvent`]. The
//! payload is read as a generic JSON value first so that an unknown
//! `type` can be told apart from a known type with bad fields.

use crate::sse::events::{RecommendationEvent, SseParseError};

/// Parse one frame payload into a typed event.
pub fn parse_frame(payload: &str) -> Result<RecommendationEvent, SseParseError> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| SseParseError::InvalidJson {
            event_type: None,
            source: e.to_string(),
        })?;

    let event_type = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or(SseParseError::MissingType)?
        .to_string();

    if !RecommendationEvent::TYPE_NAMES.contains(&event_type.as_str()) {
        return Err(SseParseError::UnknownEventType(event_type));
    }

    serde_json::from_value(value).map_err(|e| SseParseError::InvalidJson {
        event_type: Some(event_type),
        source: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK: &str = r#"{"id":"a1","name":"Here Comes the Sun","artist":"The Beatles","features":{"energy":0.6},"popularity":90,"album_art":"https://img/a1.jpg"}"#;

    #[test]
    fn test_parse_status() {
        let event = parse_frame(r#"{"type":"Status","message":"Finding similar tracks..."}"#).unwrap();
        assert_eq!(
            event,
            RecommendationEvent::Status {
                message: "Finding similar tracks...".to_string()
            }
        );
    }

    #[test]
    fn test_parse_candidate() {
        let payload = format!(r#"{{"type":"Candidate","track":{},"score":0.87}}"#, TRACK);
        match parse_frame(&payload).unwrap() {
            RecommendationEvent::Candidate { track, score } => {
                assert_eq!(track.id, "a1");
                assert_eq!(track.album_art.as_deref(), Some("https://img/a1.jpg"));
                assert_eq!(score, 0.87);
            }
            other => panic!("Expected Candidate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_candidate_integer_score() {
        let payload = format!(r#"{{"type":"Candidate","track":{},"score":1}}"#, TRACK);
        match parse_frame(&payload).unwrap() {
            RecommendationEvent::Candidate { score, .. } => assert_eq!(score, 1.0),
            other => panic!("Expected Candidate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_candidate_fractional_popularity() {
        let track = TRACK.replace(r#""popularity":90"#, r#""popularity":72.5"#);
        let payload = format!(r#"{{"type":"Candidate","track":{},"score":0.8}}"#, track);
        match parse_frame(&payload).unwrap() {
            RecommendationEvent::Candidate { track, .. } => assert_eq!(track.popularity, 72.5),
            other => panic!("Expected Candidate, got {:?}", other),
        }

        let track = TRACK.replace(r#""popularity":90"#, r#""popularity":72.0"#);
        let payload = format!(r#"{{"type":"Complete","tracks":[{}]}}"#, track);
        assert!(matches!(
            parse_frame(&payload),
            Ok(RecommendationEvent::Complete { .. })
        ));
    }

    #[test]
    fn test_parse_complete_keeps_order() {
        let second = TRACK.replace("a1", "b2");
        let payload = format!(r#"{{"type":"Complete","tracks":[{},{}]}}"#, second, TRACK);
        match parse_frame(&payload).unwrap() {
            RecommendationEvent::Complete { tracks } => {
                let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
                assert_eq!(ids, vec!["b2", "a1"]);
            }
            other => panic!("Expected Complete, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_event() {
        let event = parse_frame(r#"{"type":"Error","message":"No valid input tracks found"}"#).unwrap();
        assert_eq!(
            event,
            RecommendationEvent::Error {
                message: "No valid input tracks found".to_string()
            }
        );
    }

    #[test]
    fn test_parse_debug_with_and_without_data() {
        let event = parse_frame(r#"{"type":"Debug","message":"Selected: Yesterday by The Beatles","data":null}"#).unwrap();
        assert_eq!(
            event,
            RecommendationEvent::Debug {
                message: "Selected: Yesterday by The Beatles".to_string(),
                data: None
            }
        );

        let event = parse_frame(r#"{"type":"Debug","message":"m","data":{"k":[1,2]}}"#).unwrap();
        match event {
            RecommendationEvent::Debug { data: Some(data), .. } => {
                assert_eq!(data["k"][1], 2);
            }
            other => panic!("Expected Debug with data, got {:?}", other),
        }

        assert!(parse_frame(r#"{"type":"Debug","message":"m"}"#).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_frame("{not json").unwrap_err();
        assert!(matches!(err, SseParseError::InvalidJson { event_type: None, .. }));
    }

    #[test]
    fn test_missing_type() {
        assert_eq!(
            parse_frame(r#"{"message":"hi"}"#).unwrap_err(),
            SseParseError::MissingType
        );
        assert_eq!(parse_frame("42").unwrap_err(), SseParseError::MissingType);
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(
            parse_frame(r#"{"type":"Progress","pct":10}"#).unwrap_err(),
            SseParseError::UnknownEventType("Progress".to_string())
        );
        // discriminator is case sensitive
        assert_eq!(
            parse_frame(r#"{"type":"status","message":"x"}"#).unwrap_err(),
            SseParseError::UnknownEventType("status".to_string())
        );
    }

    #[test]
    fn test_known_type_with_bad_fields() {
        let err = parse_frame(r#"{"type":"Candidate","score":0.5}"#).unwrap_err();
        assert!(matches!(
            err,
            SseParseError::InvalidJson { event_type: Some(ref t), .. } if t == "Candidate"
        ));
    }
}
