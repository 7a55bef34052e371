//! Errors raised while building a recommendation request.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("at least one track is required")]
    NoTracks,

    #[error("track {index} is blank")]
    BlankTrack { index: usize },

    #[error("preference '{name}' must be between 0 and 1, got {value}")]
    PreferenceOutOfRange { name: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_display() {
        assert_eq!(
            RequestError::NoTracks.to_string(),
            "at least one track is required"
        );
        assert_eq!(
            RequestError::BlankTrack { index: 2 }.to_string(),
            "track 2 is blank"
        );
        assert_eq!(
            RequestError::PreferenceOutOfRange {
                name: "mood",
                value: 1.5
            }
            .to_string(),
            "preference 'mood' must be between 0 and 1, got 1.5"
        );
    }
}
