use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A track as described by the recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: String,
    pub name: String,
    pub artist: String,
    /// Named audio attributes (energy, valence, danceability, ...)
    #[serde(default)]
    pub features: HashMap<String, f64>,
    /// 0-100. Sent as a plain JSON number, integral or not.
    #[serde(default)]
    pub popularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_art: Option<String>,
}

impl TrackRecord {
    /// Identity used to merge repeated emissions of the same track.
    pub fn identity(&self) -> (&str, &str) {
        (&self.id, &self.artist)
    }

    pub fn same_track(&self, other: &TrackRecord) -> bool {
        self.identity() == other.identity()
    }
}

/// One scored observation of a track while the server is still ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub track: TrackRecord,
    pub score: f64,
}
