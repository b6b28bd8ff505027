//! Submission scoring.
//!
//! Predictions are scored by Normalized Mean Squared Error against the
//! benchmark series: squared deviation normalized by the benchmark's own
//! energy, so an exact match scores 0 and larger is worse. A series of the
//! wrong length cannot be compared at all and takes the fixed worst score.

use tracing::debug;

/// Worst/disqualifying score: length mismatches, unusable payloads and
/// deduplicated-out entries all land here.
pub const WORST_NMSE: f64 = 1.0;

/// Normalized Mean Squared Error between two equal-length series.
///
/// `nmse = Σ(y - ŷ)² / Σy²`. Zero only when the series match exactly;
/// legitimate scores above [`WORST_NMSE`] are possible for wild predictions
/// and simply rank as "bad", not "disqualified".
pub fn nmse(y: &[f64], yhat: &[f64]) -> f64 {
    debug_assert_eq!(y.len(), yhat.len());
    let deviation: f64 = y.iter().zip(yhat).map(|(a, b)| (a - b) * (a - b)).sum();
    let energy: f64 = y.iter().map(|a| a * a).sum();
    if energy == 0.0 {
        // A zero benchmark cannot normalize anything
        return if deviation == 0.0 { 0.0 } else { f64::INFINITY };
    }
    deviation / energy
}

/// Scores a predicted series against the benchmark.
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    worst_score: f64,
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self {
            worst_score: WORST_NMSE,
        }
    }
}

impl ScoreCalculator {
    /// Score one submission's series against the benchmark values.
    ///
    /// Any length mismatch (empty, partial, over-long) returns the worst
    /// score; equal lengths are scored by [`nmse`].
    pub fn score(&self, benchmark: &[f64], predicted: &[f64]) -> f64 {
        if predicted.len() != benchmark.len() {
            debug!(
                "length mismatch: predicted {} vs benchmark {}, scoring {}",
                predicted.len(),
                benchmark.len(),
                self.worst_score
            );
            return self.worst_score;
        }
        nmse(benchmark, predicted)
    }
}
