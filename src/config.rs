//! Judging run configuration.
//!
//! Chain identity and endpoints live in an immutable [`NetworkConfig`] value
//! looked up from a fixed table, and everything a run needs is carried in a
//! [`JudgeConfig`] passed into the engine. No module-level mutable state.

use serde::{Deserialize, Serialize};

/// Supported chains: (chain id, network name). Ids from chainlist.org.
const CHAINS: &[(u64, &str)] = &[
    (1, "mainnet"),
    (5, "goerli"),
    (137, "polygon"),
    (80001, "mumbai"),
];

/// Identity and endpoints of one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    /// GraphQL endpoint of the transfer-event indexer for this chain
    pub subgraph_url: String,
}

impl NetworkConfig {
    /// Look up the configuration for a chain id.
    pub fn for_chain(chain_id: u64) -> Option<NetworkConfig> {
        let (_, name) = CHAINS.iter().find(|(id, _)| *id == chain_id)?;
        Some(NetworkConfig {
            chain_id,
            name: name.to_string(),
            subgraph_url: format!(
                "https://v4.subgraph.{name}.oceanprotocol.com/subgraphs/name/oceanprotocol/ocean-subgraph"
            ),
        })
    }
}

/// Complete configuration for a judging run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Address submissions must be transferred to in order to count
    pub judge_address: String,
    /// Chain the submissions are read from
    pub network: NetworkConfig,
    /// Exchange pair the benchmark series is built from
    pub pair: String,
    /// Candle granularity in seconds
    pub candle_interval_secs: u32,
    /// Maximum candles fetched per run
    pub candle_limit: usize,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            judge_address: crate::JUDGE_ADDRESS.to_string(),
            network: NetworkConfig::for_chain(80001).expect("mumbai is in the chain table"),
            pair: "ETH/USDT".to_string(),
            candle_interval_secs: 300,
            candle_limit: 500,
        }
    }
}
