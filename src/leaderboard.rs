//! Leaderboard construction.
//!
//! The externally visible artifact of a judging run: every submission with
//! its final score, sorted lowest-NMSE first.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One ranked entry: contestant, artifact and final score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSubmission {
    pub contestant_address: String,
    pub artifact_id: String,
    pub score: f64,
}

/// Submissions ordered ascending by score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<ScoredSubmission>,
}

impl Leaderboard {
    pub fn entries(&self) -> &[ScoredSubmission] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stable ascending sort by score: equal scores keep their input order, so a
/// run over identical input always produces the identical leaderboard.
pub fn rank(scored: Vec<ScoredSubmission>) -> Leaderboard {
    let mut entries = scored;
    entries.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));
    Leaderboard { entries }
}
