//! Submission extraction.
//!
//! Turns raw transfer events into submission records, restricted to the
//! one-week window ending at the deadline. Strictly extraction: no dedup, no
//! scoring, and the output keeps whatever order the feed produced.

use crate::deadline::Deadline;
use crate::transfers::TransferEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One contest entry: a transfer of `artifact_id` from `contestant_address`
/// to the judge, observed at `submitted_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub contestant_address: String,
    pub artifact_id: String,
    pub submitted_at: DateTime<Utc>,
}

/// Extracts qualifying submissions from a transfer-event feed.
pub struct SubmissionCollector {
    judge_address: String,
}

impl SubmissionCollector {
    pub fn new(judge_address: impl Into<String>) -> Self {
        Self {
            judge_address: judge_address.into(),
        }
    }

    /// Keep events transferred to the judge inside `(deadline - 7d, deadline]`
    /// and map them to submissions. The feed query is already windowed, but
    /// the bounds are re-checked here so a sloppy feed cannot widen the
    /// contest.
    pub fn collect(&self, deadline: &Deadline, events: &[TransferEvent]) -> Vec<Submission> {
        let start = deadline.window_start();
        let end = deadline.instant();

        let submissions: Vec<Submission> = events
            .iter()
            .filter(|e| e.to_address.eq_ignore_ascii_case(&self.judge_address))
            .filter(|e| e.timestamp > start && e.timestamp <= end)
            .map(|e| Submission {
                contestant_address: e.from_address.clone(),
                artifact_id: e.asset_id.clone(),
                submitted_at: e.timestamp,
            })
            .collect();

        debug!(
            "{} of {} transfer events qualify as submissions",
            submissions.len(),
            events.len()
        );
        submissions
    }
}
