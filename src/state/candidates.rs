//! Bounded, ranked view of provisional candidates.
//!
//! Each insert appends, stable-sorts by descending score and truncates, so
//! the working set never exceeds `capacity + 1` entries no matter how many
//! candidates the server emits. Equal scores keep arrival order because
//! the new entry is always appended last before the stable sort.

use std::cmp::Ordering;

use serde::{Serialize, Serializer};

use crate::models::{Candidate, TrackRecord};

/// Number of candidates kept in the live view.
pub const MAX_CANDIDATES: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidates {
    entries: Vec<Candidate>,
    capacity: usize,
}

impl Default for RankedCandidates {
    fn default() -> Self {
        Self::with_capacity(MAX_CANDIDATES)
    }
}

impl RankedCandidates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record a scoring observation.
    ///
    /// A track already in the view (same id and artist) is replaced by the
    /// newer emission, which ranks as a fresh arrival at its new score.
    pub fn insert(&mut self, track: TrackRecord, score: f64) {
        self.entries.retain(|c| !c.track.same_track(&track));
        self.entries.push(Candidate { track, score });
        // -0.0 and 0.0 compare equal, so they keep arrival order
        self.entries
            .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        self.entries.truncate(self.capacity);
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.entries.iter()
    }
}

impl Serialize for RankedCandidates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}
