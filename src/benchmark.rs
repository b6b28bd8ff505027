//! Ground-truth benchmark series construction.
//!
//! After a round's deadline passes, the judge observes the asset price at 12
//! fixed instants, 5 minutes apart, covering the hour after the cutoff. Every
//! prediction is scored against exactly these 12 samples, so the series must
//! be complete: a missing sample aborts the run rather than silently scoring
//! against a partial series.

use crate::candles::{Candle, CandleFeed};
use crate::config::JudgeConfig;
use crate::deadline::Deadline;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, info};

/// Number of samples in the benchmark series. Every prediction must carry
/// exactly this many values to score validly.
pub const BENCHMARK_POINTS: usize = 12;

/// Minutes between the deadline and the newest benchmark sample
/// (1-minute start marker + 12 samples spaced 5 minutes apart).
pub const OBSERVATION_WINDOW_MINUTES: i64 = 1 + BENCHMARK_POINTS as i64 * 5;

#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("deadline {deadline} is in the future (now {now})")]
    FutureDeadline {
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    },
    #[error("benchmark window ends at {window_end}, which has not elapsed (now {now})")]
    InsufficientHistory {
        window_end: DateTime<Utc>,
        now: DateTime<Utc>,
    },
    #[error("no candle within {tolerance_secs}s of target instant {target}")]
    BenchmarkGap {
        target: DateTime<Utc>,
        tolerance_secs: i64,
    },
}

/// One aligned sample of the benchmark series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkPoint {
    pub target: DateTime<Utc>,
    pub value: f64,
}

/// The complete ground-truth series for one judging run: exactly
/// [`BENCHMARK_POINTS`] samples, ordered by target instant ascending.
#[derive(Debug, Clone)]
pub struct BenchmarkSeries {
    points: Vec<BenchmarkPoint>,
}

impl BenchmarkSeries {
    pub fn points(&self) -> &[BenchmarkPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The 12 instants the contest observes, starting 6 minutes after the
/// deadline and ending 61 minutes after it.
pub fn target_instants(deadline: &Deadline) -> Vec<DateTime<Utc>> {
    let start_marker = deadline.instant() + Duration::minutes(1);
    (1..=BENCHMARK_POINTS as i64)
        .map(|i| start_marker + Duration::minutes(5 * i))
        .collect()
}

/// Aligns exchange candles to the contest's target instants.
pub struct BenchmarkSeriesBuilder {
    interval_secs: u32,
    tolerance_secs: i64,
}

impl BenchmarkSeriesBuilder {
    /// Tolerance defaults to one candle interval: the chosen candle is always
    /// the sample adjacent to the target.
    pub fn new(interval_secs: u32) -> Self {
        Self {
            interval_secs,
            tolerance_secs: interval_secs as i64,
        }
    }

    /// Verify the whole observation window is in the past.
    ///
    /// Judging must never run against an incomplete window, so this is
    /// checked before anything is fetched.
    pub fn check_window(&self, deadline: &Deadline, now: DateTime<Utc>) -> Result<(), BenchmarkError> {
        if deadline.instant() > now {
            return Err(BenchmarkError::FutureDeadline {
                deadline: deadline.instant(),
                now,
            });
        }
        let window_end = deadline.instant() + Duration::minutes(OBSERVATION_WINDOW_MINUTES);
        if window_end > now {
            return Err(BenchmarkError::InsufficientHistory { window_end, now });
        }
        Ok(())
    }

    /// Align candles to the target instants: for each target, the candle with
    /// the nearest open time wins; equidistant neighbors resolve to the
    /// earlier candle. A target with no candle inside the tolerance fails the
    /// whole build.
    pub fn align(
        &self,
        deadline: &Deadline,
        candles: &[Candle],
    ) -> Result<BenchmarkSeries, BenchmarkError> {
        let mut sorted: Vec<Candle> = candles.to_vec();
        sorted.sort_by_key(|c| c.open_time);

        let mut points = Vec::with_capacity(BENCHMARK_POINTS);
        for target in target_instants(deadline) {
            let target_ut = target.timestamp();
            let candle = nearest_candle(&sorted, target_ut).filter(|c| {
                (c.open_time - target_ut).abs() <= self.tolerance_secs
            });
            match candle {
                Some(c) => {
                    debug!(
                        "target {} -> candle at {} (close {})",
                        target, c.open_time, c.close
                    );
                    points.push(BenchmarkPoint {
                        target,
                        value: c.close,
                    });
                }
                None => {
                    return Err(BenchmarkError::BenchmarkGap {
                        target,
                        tolerance_secs: self.tolerance_secs,
                    })
                }
            }
        }
        Ok(BenchmarkSeries { points })
    }

    /// Fetch candles covering the observation window and align them.
    pub async fn fetch_series<F>(
        &self,
        feed: &F,
        config: &JudgeConfig,
        deadline: &Deadline,
        now: DateTime<Utc>,
    ) -> anyhow::Result<BenchmarkSeries>
    where
        F: CandleFeed + Sync + ?Sized,
    {
        self.check_window(deadline, now)?;

        // Fetch from the deadline minute onward
        let deadline_ut = deadline.instant().timestamp();
        let since = deadline_ut - deadline_ut.rem_euclid(60);

        let candles = feed
            .fetch(&config.pair, self.interval_secs, since, config.candle_limit)
            .await?;
        info!(
            "benchmark: {} candles fetched for {} since {}",
            candles.len(),
            config.pair,
            since
        );

        let series = self.align(deadline, &candles)?;
        info!("benchmark: {} samples aligned", series.len());
        Ok(series)
    }
}

/// Closest candle by open time over a sorted slice; ties go to the earlier
/// candle so repeated runs stay byte-identical.
fn nearest_candle(sorted: &[Candle], target_ut: i64) -> Option<Candle> {
    if sorted.is_empty() {
        return None;
    }
    let idx = sorted.partition_point(|c| c.open_time < target_ut);
    let after = sorted.get(idx);
    let before = idx.checked_sub(1).and_then(|i| sorted.get(i));
    match (before, after) {
        (Some(b), Some(a)) => {
            if (target_ut - b.open_time) <= (a.open_time - target_ut) {
                Some(*b)
            } else {
                Some(*a)
            }
        }
        (Some(b), None) => Some(*b),
        (None, Some(a)) => Some(*a),
        (None, None) => None,
    }
}
