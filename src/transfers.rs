//! Ownership-transfer event feed.
//!
//! Submitting to the contest means transferring a data NFT to the judge
//! address, so the submission record is the transfer event itself.
//! [`TransferFeed`] is the seam the engine consumes; [`SubgraphClient`] is
//! the production implementation against the chain's GraphQL indexer, which
//! also serves the asset-field lookup for the encrypted payloads.

use crate::decoder::PayloadStore;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One ownership-transfer event as reported by the indexer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferEvent {
    pub timestamp: DateTime<Utc>,
    pub asset_id: String,
    pub from_address: String,
    pub to_address: String,
}

/// Read-only feed of ownership transfers to a recipient within a window.
///
/// `window` is `(start, end)` with an exclusive start and inclusive end.
/// Implementations do not guarantee any ordering of the returned events.
#[async_trait]
pub trait TransferFeed {
    async fn transfers_to(
        &self,
        recipient: &str,
        window: (DateTime<Utc>, DateTime<Utc>),
    ) -> Result<Vec<TransferEvent>>;
}

/// GraphQL client for the chain's subgraph indexer.
pub struct SubgraphClient {
    url: String,
    client: reqwest::Client,
}

impl SubgraphClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn query(&self, query: String) -> Result<serde_json::Value> {
        let resp = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(anyhow!("subgraph returned {}", resp.status()));
        }
        let body: serde_json::Value = resp.json().await?;
        if let Some(errors) = body.get("errors") {
            return Err(anyhow!("subgraph query failed: {}", errors));
        }
        body.get("data")
            .cloned()
            .context("subgraph response missing data")
    }
}

#[async_trait]
impl TransferFeed for SubgraphClient {
    async fn transfers_to(
        &self,
        recipient: &str,
        window: (DateTime<Utc>, DateTime<Utc>),
    ) -> Result<Vec<TransferEvent>> {
        let (start, end) = window;
        let query = format!(
            r#"{{nftTransferHistories(
    where: {{
             newOwner: "{}",
             timestamp_gt: {},
             timestamp_lte: {}
            }}
)
    {{
        id,
        timestamp,
        nft {{
            id
        }},
        oldOwner {{
            id
        }},
        newOwner {{
            id
        }}
     }}
}}"#,
            recipient.to_lowercase(),
            start.timestamp(),
            end.timestamp()
        );

        let data = self.query(query).await?;
        let rows = data
            .get("nftTransferHistories")
            .and_then(|v| v.as_array())
            .context("subgraph response missing nftTransferHistories")?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let ut = timestamp_field(row.get("timestamp"))
                .context("transfer event missing timestamp")?;
            let timestamp = crate::timestamp::from_epoch_seconds(ut);
            let asset_id = id_field(row.get("nft")).context("transfer event missing nft id")?;
            let from_address =
                id_field(row.get("oldOwner")).context("transfer event missing oldOwner")?;
            let to_address =
                id_field(row.get("newOwner")).context("transfer event missing newOwner")?;
            events.push(TransferEvent {
                timestamp,
                asset_id,
                from_address,
                to_address,
            });
        }

        debug!(
            "subgraph: {} transfers to {} in ({}, {}]",
            events.len(),
            recipient,
            start,
            end
        );
        Ok(events)
    }
}

#[async_trait]
impl PayloadStore for SubgraphClient {
    async fn payload(&self, asset_id: &str) -> Result<String> {
        let query = format!(
            r#"{{nft(id: "{}") {{ nftData(key: "predictions") {{ value }} }}}}"#,
            asset_id.to_lowercase()
        );
        let data = self.query(query).await?;
        data.pointer("/nft/nftData/value")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .with_context(|| format!("asset {} has no predictions field", asset_id))
    }
}

/// Subgraph BigInts arrive as strings; accept plain numbers too.
fn timestamp_field(v: Option<&serde_json::Value>) -> Option<i64> {
    let v = v?;
    v.as_i64()
        .or_else(|| v.as_str()?.parse().ok())
        .or_else(|| v.as_f64().map(|f| f as i64))
}

fn id_field(v: Option<&serde_json::Value>) -> Option<String> {
    Some(v?.get("id")?.as_str()?.to_string())
}
