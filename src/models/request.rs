use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Taste preferences sent alongside the listening history.
///
/// Every field is a weight in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// How energetic the recommendations should be
    pub energy: f64,
    /// 0.0 favours popular tracks, 1.0 favours obscure ones
    pub obscurity: f64,
    /// Valence of the recommendations (sad to happy)
    pub mood: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            energy: 0.5,
            obscurity: 0.5,
            mood: 0.5,
        }
    }
}

impl Preferences {
    /// Create preferences, checking that each weight is finite and in range.
    pub fn new(energy: f64, obscurity: f64, mood: f64) -> Result<Self, RequestError> {
        let prefs = Self {
            energy,
            obscurity,
            mood,
        };
        prefs.validate()?;
        Ok(prefs)
    }

    fn validate(&self) -> Result<(), RequestError> {
        for (name, value) in [
            ("energy", self.energy),
            ("obscurity", self.obscurity),
            ("mood", self.mood),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(RequestError::PreferenceOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

/// Body of the streaming recommendation call.
///
/// Built once per session and never mutated afterwards. Track descriptors
/// are free text ("Yesterday - Beatles") and are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    tracks: Vec<String>,
    preferences: Preferences,
}

impl RecommendationRequest {
    /// Create a request from the user's listening sequence.
    ///
    /// Fails when the sequence is empty, an entry is blank, or a preference
    /// weight falls outside `[0, 1]`.
    pub fn new<I, S>(tracks: I, preferences: Preferences) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tracks: Vec<String> = tracks.into_iter().map(Into::into).collect();
        if tracks.is_empty() {
            return Err(RequestError::NoTracks);
        }
        if let Some(index) = tracks.iter().position(|t| t.trim().is_empty()) {
            return Err(RequestError::BlankTrack { index });
        }
        preferences.validate()?;

        Ok(Self {
            tracks,
            preferences,
        })
    }

    pub fn tracks(&self) -> &[String] {
        &self.tracks
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }
}
