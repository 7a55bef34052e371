//! Aggregate counters recovered from the service's progress messages.
//!
//! The service does not send counters as structured data; they only show
//! up inside human-readable `Status` and `Debug` messages, so they are
//! pattern-matched out of the text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static FOUND_SIMILAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Found (\d+) similar tracks to process").expect("Invalid found-similar regex")
});

static BATCH_PROGRESS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Processing batch (\d+)/(\d+)").expect("Invalid batch progress regex")
});

static SUMMARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Summary: (\d+) candidates searched, (\d+) tracks found, (\d+) not found in MusicBrainz")
        .expect("Invalid summary regex")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    pub total_candidates_found: u64,
    /// Not reported by the current service; stays 0.
    pub filtered_by_obscurity: u64,
    pub not_found_in_musicbrainz: u64,
}

/// Position within the server's candidate batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    pub current: u32,
    pub total: u32,
}

/// `Found N similar tracks to process` → N
pub fn parse_found_similar(message: &str) -> Option<u64> {
    let caps = FOUND_SIMILAR_REGEX.captures(message)?;
    caps[1].parse().ok()
}

/// `Processing batch X/Y` → X of Y
pub fn parse_batch_progress(message: &str) -> Option<BatchProgress> {
    let caps = BATCH_PROGRESS_REGEX.captures(message)?;
    Some(BatchProgress {
        current: caps[1].parse().ok()?,
        total: caps[2].parse().ok()?,
    })
}

/// `Summary: A candidates searched, B tracks found, C not found in MusicBrainz` → C
pub fn parse_not_found_summary(message: &str) -> Option<u64> {
    let caps = SUMMARY_REGEX.captures(message)?;
    caps[3].parse().ok()
}
