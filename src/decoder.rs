//! Prediction payload decoding.
//!
//! A submission's asset carries one encrypted field holding the predicted
//! series as a bracketed comma-separated list, e.g. `[1605.7, 1610.2, ...]`.
//! Decoding can fail for reasons entirely under the contestant's control
//! (wrong recipient key, mangled encoding, junk tokens), so every failure is
//! recovered to an empty series: the length-mismatch rule then disqualifies
//! the entry without aborting the run.

use crate::crypto;
use crate::submissions::Submission;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tracing::warn;
use x25519_dalek::StaticSecret;

/// Asset-field lookup: resolves an asset id to its stored payload.
#[async_trait]
pub trait PayloadStore {
    async fn payload(&self, asset_id: &str) -> Result<String>;
}

/// Decodes submissions into numeric prediction series.
pub struct PredictionDecoder {
    private_key: StaticSecret,
}

impl PredictionDecoder {
    pub fn new(private_key: StaticSecret) -> Self {
        Self { private_key }
    }

    /// Decode one submission, recovering any failure to an empty series.
    pub async fn decode<P>(&self, submission: &Submission, store: &P) -> Vec<f64>
    where
        P: PayloadStore + Sync + ?Sized,
    {
        match self.try_decode(submission, store).await {
            Ok(series) => series,
            Err(e) => {
                warn!(
                    "submission {} from {}: payload unusable ({e:#}), scoring as empty",
                    submission.artifact_id, submission.contestant_address
                );
                Vec::new()
            }
        }
    }

    async fn try_decode<P>(&self, submission: &Submission, store: &P) -> Result<Vec<f64>>
    where
        P: PayloadStore + Sync + ?Sized,
    {
        let envelope = store
            .payload(&submission.artifact_id)
            .await
            .context("payload lookup")?;
        let plaintext = crypto::decrypt_payload(&envelope, &self.private_key)?;
        parse_series(&plaintext)
    }
}

/// Parse a `[f, f, ...]` literal into floats.
fn parse_series(s: &str) -> Result<Vec<f64>> {
    let trimmed = s.trim();
    // Delimiters are one character on each side
    let mut chars = trimmed.chars();
    if chars.next().is_none() || chars.next_back().is_none() {
        return Err(anyhow!("series literal too short: {trimmed:?}"));
    }
    let inner = chars.as_str();
    inner
        .split(',')
        .map(|tok| {
            tok.trim()
                .parse::<f64>()
                .with_context(|| format!("bad series token {:?}", tok.trim()))
        })
        .collect()
}
