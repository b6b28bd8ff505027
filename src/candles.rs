//! Exchange candle feed.
//!
//! The benchmark series is built from 5-minute OHLC candles; only the open
//! time and close value of each candle matter to the judge. [`CandleFeed`] is
//! the seam the engine consumes, [`KrakenClient`] is the production
//! implementation against Kraken's public OHLC endpoint.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One price sample: candle open time (epoch seconds) and close value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub close: f64,
}

/// Read-only source of historical candles.
#[async_trait]
pub trait CandleFeed {
    /// Fetch up to `limit` candles of `interval_secs` granularity for `pair`,
    /// starting at or after `since` (epoch seconds).
    async fn fetch(
        &self,
        pair: &str,
        interval_secs: u32,
        since: i64,
        limit: usize,
    ) -> Result<Vec<Candle>>;
}

/// Kraken public market-data client.
pub struct KrakenClient {
    base_url: String,
    client: reqwest::Client,
}

impl KrakenClient {
    pub fn new() -> Self {
        Self::with_base_url("https://api.kraken.com")
    }

    /// Point the client at a different host (used by tests).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for KrakenClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CandleFeed for KrakenClient {
    async fn fetch(
        &self,
        pair: &str,
        interval_secs: u32,
        since: i64,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        // Kraken spells pairs without the separator and intervals in minutes
        let pair_param = pair.replace('/', "");
        let interval_min = interval_secs / 60;
        let url = format!(
            "{}/0/public/OHLC?pair={}&interval={}&since={}",
            self.base_url, pair_param, interval_min, since
        );

        debug!("fetching candles: {}", url);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!("candle feed returned {}", resp.status()));
        }

        let body: serde_json::Value = resp.json().await?;
        if let Some(errors) = body.get("error").and_then(|e| e.as_array()) {
            if !errors.is_empty() {
                return Err(anyhow!("candle feed error: {:?}", errors));
            }
        }

        let result = body
            .get("result")
            .and_then(|r| r.as_object())
            .context("candle response missing result object")?;

        // The result object holds one key per pair plus a "last" cursor
        let rows = result
            .iter()
            .find(|(k, _)| *k != "last")
            .and_then(|(_, v)| v.as_array())
            .context("candle response missing pair data")?;

        let mut candles = Vec::with_capacity(rows.len().min(limit));
        for row in rows.iter().take(limit) {
            let fields = row.as_array().context("candle row is not an array")?;
            if fields.len() < 5 {
                return Err(anyhow!("candle row has {} fields, need 5", fields.len()));
            }
            let open_time = fields[0]
                .as_i64()
                .or_else(|| fields[0].as_f64().map(|f| f as i64))
                .context("candle open time is not a number")?;
            let close = number_field(&fields[4]).context("candle close is not a number")?;
            candles.push(Candle { open_time, close });
        }

        debug!("fetched {} candles since {}", candles.len(), since);
        Ok(candles)
    }
}

/// Kraken encodes prices as JSON strings; accept both forms.
fn number_field(v: &serde_json::Value) -> Option<f64> {
    v.as_f64().or_else(|| v.as_str()?.parse().ok())
}
