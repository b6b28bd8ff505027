//! Prediction Challenge Judge
//!
//! Judges a recurring price-prediction contest. Contestants encrypt a
//! forecast series to the judge's public key, store it in a data NFT and
//! transfer the NFT to the judge address before the round's deadline. After
//! the observation window elapses, the judge scores every submission against
//! the realized exchange prices and publishes a ranked leaderboard.
//!
//! ## Module Structure
//!
//! - `config`: network table and run configuration
//! - `timestamp`: UTC instant <-> epoch-second conversions
//! - `deadline`: deadline parsing and the weekly default rule
//! - `candles`: exchange candle feed (Kraken OHLC client)
//! - `benchmark`: ground-truth series construction and alignment
//! - `transfers`: ownership-transfer feed (subgraph client)
//! - `submissions`: transfer events -> submission records
//! - `crypto`: asymmetric payload encryption primitive
//! - `decoder`: payload lookup, decryption and series parsing
//! - `scoring`: NMSE and the worst-score sentinel
//! - `dedup`: keep-youngest duplicate policy
//! - `leaderboard`: stable ranking
//! - `report`: console and CSV output
//! - `judge`: the end-to-end engine

pub mod benchmark;
pub mod candles;
pub mod config;
pub mod crypto;
pub mod deadline;
pub mod decoder;
pub mod dedup;
pub mod judge;
pub mod leaderboard;
pub mod report;
pub mod scoring;
pub mod submissions;
pub mod timestamp;
pub mod transfers;

pub use benchmark::{BenchmarkSeries, BenchmarkSeriesBuilder, BENCHMARK_POINTS};
pub use candles::{Candle, CandleFeed, KrakenClient};
pub use config::{JudgeConfig, NetworkConfig};
pub use deadline::{Deadline, DeadlineError};
pub use decoder::{PayloadStore, PredictionDecoder};
pub use dedup::DeduplicationPolicy;
pub use judge::JudgeEngine;
pub use leaderboard::{rank, Leaderboard, ScoredSubmission};
pub use scoring::{nmse, ScoreCalculator, WORST_NMSE};
pub use submissions::{Submission, SubmissionCollector};
pub use transfers::{SubgraphClient, TransferEvent, TransferFeed};

/// The address contestants encrypt their data to, and transfer their NFT to
pub const JUDGE_ADDRESS: &str = "0xA54ABd42b11B7C97538CAD7C6A2820419ddF703E";
