//! Plain-text rendering of session snapshots.
//!
//! Snapshots arrive through a watch channel and may coalesce, so the
//! printer diffs each one against the last it saw instead of assuming one
//! snapshot per event.

use crate::models::TrackRecord;
use crate::state::StreamState;

/// Turns a sequence of snapshots into printable lines.
#[derive(Debug, Default)]
pub struct SnapshotPrinter {
    last_status: String,
    last_top: Vec<(String, String)>,
    debug_seen: usize,
    verbose: bool,
}

impl SnapshotPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also print debug messages.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Lines describing what changed since the previous snapshot.
    pub fn changes(&mut self, state: &StreamState) -> Vec<String> {
        let mut lines = Vec::new();

        if self.verbose {
            for message in state.debug_info.iter().skip(self.debug_seen) {
                lines.push(format!("  [debug] {}", message));
            }
        }
        self.debug_seen = state.debug_info.len();

        if state.status != self.last_status && !state.status.is_empty() {
            let mut line = format!("> {}", state.status);
            if let Some(progress) = state.progress {
                if state.status.starts_with("Processing batch") {
                    line.push_str(&format!(
                        " ({}%)",
                        percent(progress.current, progress.total)
                    ));
                }
            }
            lines.push(line);
            self.last_status = state.status.clone();
        }

        let top: Vec<(String, String)> = state
            .candidates
            .iter()
            .map(|c| (c.track.id.clone(), format!("{:.3}", c.score)))
            .collect();
        if top != self.last_top && !top.is_empty() {
            if let Some(best) = state.candidates.iter().next() {
                lines.push(format!(
                    "  {} candidates, best: {} ({:.3})",
                    state.candidates.len(),
                    describe(&best.track),
                    best.score
                ));
            }
        }
        self.last_top = top;

        lines
    }
}

/// Summary printed once the session has stopped.
pub fn final_report(state: &StreamState) -> String {
    let mut out = String::new();

    if let Some(error) = &state.error {
        out.push_str(&format!("Error: {}\n", error));
    } else if !state.is_complete() {
        out.push_str("Stopped before the recommendations were complete.\n");
    } else if state.recommendations.is_empty() {
        out.push_str("No recommendations.\n");
    } else {
        out.push_str("Recommendations:\n");
        for (rank, track) in state.recommendations.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {} (popularity {})\n",
                rank + 1,
                describe(track),
                track.popularity
            ));
        }
    }

    let stats = &state.stats;
    if stats.total_candidates_found > 0 || stats.not_found_in_musicbrainz > 0 {
        out.push_str(&format!(
            "Candidates found: {}, not found in MusicBrainz: {}\n",
            stats.total_candidates_found, stats.not_found_in_musicbrainz
        ));
    }

    out
}

/// Process exit code for a final state.
pub fn exit_code(state: &StreamState) -> i32 {
    if state.is_complete() {
        0
    } else {
        1
    }
}

fn describe(track: &TrackRecord) -> String {
    format!("{} - {}", track.name, track.artist)
}

fn percent(current: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((current.min(total) as u64 * 100) / total as u64) as u32
}
