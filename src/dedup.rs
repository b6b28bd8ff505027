//! Duplicate-submission policy.
//!
//! A contestant may transfer several assets before the deadline; only the
//! youngest one counts. The rest keep their slot in the leaderboard but are
//! forced to the worst score.

use crate::scoring::WORST_NMSE;
use crate::submissions::Submission;
use std::collections::HashMap;
use tracing::info;

/// Keep-youngest policy for contestants with multiple submissions.
#[derive(Debug, Clone)]
pub struct DeduplicationPolicy {
    worst_score: f64,
}

impl Default for DeduplicationPolicy {
    fn default() -> Self {
        Self {
            worst_score: WORST_NMSE,
        }
    }
}

impl DeduplicationPolicy {
    /// For each contestant with more than one submission, keep the youngest
    /// member's computed score and force every other member to the worst
    /// score. The youngest keeps whatever it scored on its own merits, worst
    /// score included. Idempotent.
    ///
    /// Youngest = maximum `submitted_at`; two submissions sharing an instant
    /// resolve by lexicographically greatest `artifact_id`, so the outcome
    /// does not depend on feed order.
    pub fn apply(&self, submissions: &[Submission], scores: &mut [f64]) {
        debug_assert_eq!(submissions.len(), scores.len());

        let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, sub) in submissions.iter().enumerate() {
            groups
                .entry(sub.contestant_address.as_str())
                .or_default()
                .push(i);
        }

        for (contestant, indices) in groups {
            if indices.len() < 2 {
                continue;
            }
            let youngest = indices
                .iter()
                .copied()
                .max_by_key(|&i| (submissions[i].submitted_at, &submissions[i].artifact_id))
                .expect("group has at least two members");

            info!(
                "{} submitted {} times, keeping {} at {}",
                contestant,
                indices.len(),
                submissions[youngest].artifact_id,
                submissions[youngest].submitted_at
            );
            for i in indices {
                if i != youngest {
                    scores[i] = self.worst_score;
                }
            }
        }
    }
}
