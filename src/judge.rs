//! One judging run, end to end.
//!
//! Wires the pipeline together: benchmark construction and submission
//! collection (independent, fetched concurrently), per-submission decoding
//! and scoring, duplicate resolution, ranking. A run owns exactly one
//! deadline and one benchmark series; nothing is shared across runs.

use crate::benchmark::BenchmarkSeriesBuilder;
use crate::candles::CandleFeed;
use crate::config::JudgeConfig;
use crate::deadline::Deadline;
use crate::decoder::{PayloadStore, PredictionDecoder};
use crate::dedup::DeduplicationPolicy;
use crate::leaderboard::{rank, Leaderboard, ScoredSubmission};
use crate::scoring::ScoreCalculator;
use crate::submissions::SubmissionCollector;
use crate::transfers::TransferFeed;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;
use x25519_dalek::StaticSecret;

/// The challenge judging engine.
pub struct JudgeEngine<C, T, P> {
    config: JudgeConfig,
    candles: C,
    transfers: T,
    payloads: P,
}

impl<C, T, P> JudgeEngine<C, T, P>
where
    C: CandleFeed + Sync,
    T: TransferFeed + Sync,
    P: PayloadStore + Sync,
{
    pub fn new(config: JudgeConfig, candles: C, transfers: T, payloads: P) -> Self {
        Self {
            config,
            candles,
            transfers,
            payloads,
        }
    }

    /// Judge one round against the current clock.
    pub async fn run(&self, deadline: Deadline, private_key: &StaticSecret) -> Result<Leaderboard> {
        self.run_at(deadline, private_key, Utc::now()).await
    }

    /// Judge one round as of `now` (split out so tests can pin the clock).
    pub async fn run_at(
        &self,
        deadline: Deadline,
        private_key: &StaticSecret,
        now: DateTime<Utc>,
    ) -> Result<Leaderboard> {
        info!("judging run: deadline {}", deadline);

        let builder = BenchmarkSeriesBuilder::new(self.config.candle_interval_secs);
        // Fail on an incomplete observation window before anything is fetched
        builder.check_window(&deadline, now)?;

        let window = (deadline.window_start(), deadline.instant());
        let (benchmark, events) = tokio::join!(
            builder.fetch_series(&self.candles, &self.config, &deadline, now),
            self.transfers
                .transfers_to(&self.config.judge_address, window),
        );
        let benchmark = benchmark.context("building benchmark series")?;
        let events = events.context("fetching transfer events")?;

        let submissions =
            SubmissionCollector::new(self.config.judge_address.clone()).collect(&deadline, &events);
        info!("{} submissions in window", submissions.len());

        let benchmark_values = benchmark.values();
        let decoder = PredictionDecoder::new(private_key.clone());
        let calculator = ScoreCalculator::default();

        let mut scores = Vec::with_capacity(submissions.len());
        for (i, submission) in submissions.iter().enumerate() {
            let predicted = decoder.decode(submission, &self.payloads).await;
            let score = calculator.score(&benchmark_values, &predicted);
            info!(
                "submission {}/{}: {} from {} -> nmse {:.3e}",
                i + 1,
                submissions.len(),
                submission.artifact_id,
                submission.contestant_address,
                score
            );
            scores.push(score);
        }

        DeduplicationPolicy::default().apply(&submissions, &mut scores);

        let scored = submissions
            .into_iter()
            .zip(scores)
            .map(|(s, score)| ScoredSubmission {
                contestant_address: s.contestant_address,
                artifact_id: s.artifact_id,
                score,
            })
            .collect();

        let board = rank(scored);
        info!("judging run done: {} entries", board.len());
        Ok(board)
    }
}
