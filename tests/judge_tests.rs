//! End-to-end judging runs against in-memory feeds.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use predict_challenge::benchmark::target_instants;
use predict_challenge::{
    crypto, Candle, CandleFeed, Deadline, JudgeConfig, JudgeEngine, PayloadStore, TransferEvent,
    TransferFeed, WORST_NMSE,
};
use rand::rngs::OsRng;
use std::collections::HashMap;
use x25519_dalek::{PublicKey, StaticSecret};

struct StaticCandles(Vec<Candle>);

#[async_trait]
impl CandleFeed for StaticCandles {
    async fn fetch(&self, _: &str, _: u32, _: i64, _: usize) -> Result<Vec<Candle>> {
        Ok(self.0.clone())
    }
}

struct StaticTransfers(Vec<TransferEvent>);

#[async_trait]
impl TransferFeed for StaticTransfers {
    async fn transfers_to(
        &self,
        _: &str,
        _: (DateTime<Utc>, DateTime<Utc>),
    ) -> Result<Vec<TransferEvent>> {
        Ok(self.0.clone())
    }
}

struct MemoryPayloads(HashMap<String, String>);

#[async_trait]
impl PayloadStore for MemoryPayloads {
    async fn payload(&self, asset_id: &str) -> Result<String> {
        self.0
            .get(asset_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such asset: {asset_id}"))
    }
}

fn keypair() -> (StaticSecret, PublicKey) {
    let secret = StaticSecret::random_from_rng(OsRng);
    let public = PublicKey::from(&secret);
    (secret, public)
}

fn deadline() -> Deadline {
    Deadline::parse("2023-05-03_23:59").unwrap()
}

/// Candles sitting exactly on the 12 target instants, closes 1900..=1911.
fn benchmark_candles(deadline: &Deadline) -> Vec<Candle> {
    target_instants(deadline)
        .iter()
        .enumerate()
        .map(|(i, t)| Candle {
            open_time: t.timestamp(),
            close: 1900.0 + i as f64,
        })
        .collect()
}

fn benchmark_values() -> Vec<f64> {
    (0..12).map(|i| 1900.0 + i as f64).collect()
}

fn series_literal(values: &[f64]) -> String {
    let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", joined.join(", "))
}

fn transfer(deadline: &Deadline, minutes_before: i64, from: &str, nft: &str) -> TransferEvent {
    TransferEvent {
        timestamp: deadline.instant() - Duration::minutes(minutes_before),
        asset_id: nft.to_string(),
        from_address: from.to_string(),
        to_address: "0xjudge".to_string(),
    }
}

fn config() -> JudgeConfig {
    JudgeConfig {
        judge_address: "0xjudge".to_string(),
        ..JudgeConfig::default()
    }
}

#[tokio::test]
async fn duplicate_contestant_keeps_youngest_exact_match() {
    // Scenario: alice submits twice; her younger entry matches the benchmark
    // exactly, bob's single entry is close but not exact.
    let (secret, public) = keypair();
    let deadline = deadline();

    let exact = crypto::encrypt_payload(&series_literal(&benchmark_values()), &public).unwrap();
    let mut off_values = benchmark_values();
    off_values[0] += 5.0;
    let off = crypto::encrypt_payload(&series_literal(&off_values), &public).unwrap();
    let older = crypto::encrypt_payload(&series_literal(&off_values), &public).unwrap();

    let payloads = MemoryPayloads(HashMap::from([
        ("0xnft_old".to_string(), older),
        ("0xnft_new".to_string(), exact),
        ("0xnft_bob".to_string(), off),
    ]));
    let transfers = StaticTransfers(vec![
        transfer(&deadline, 120, "0xalice", "0xnft_old"),
        transfer(&deadline, 90, "0xbob", "0xnft_bob"),
        transfer(&deadline, 60, "0xalice", "0xnft_new"),
    ]);

    let engine = JudgeEngine::new(
        config(),
        StaticCandles(benchmark_candles(&deadline)),
        transfers,
        payloads,
    );
    let now = deadline.instant() + Duration::minutes(62);
    let board = engine.run_at(deadline, &secret, now).await.unwrap();

    assert_eq!(board.len(), 3);
    let entries = board.entries();

    // Younger alice entry first with a perfect score
    assert_eq!(entries[0].artifact_id, "0xnft_new");
    assert_eq!(entries[0].score, 0.0);

    // Bob in the middle with a genuine nonzero score
    assert_eq!(entries[1].artifact_id, "0xnft_bob");
    assert!(entries[1].score > 0.0 && entries[1].score < WORST_NMSE);

    // Older alice entry forced to the worst score despite a decent series
    assert_eq!(entries[2].artifact_id, "0xnft_old");
    assert_eq!(entries[2].score, WORST_NMSE);
}

#[tokio::test]
async fn undecryptable_payload_ranks_below_genuine_scores() {
    let (secret, public) = keypair();
    let deadline = deadline();

    let genuine = {
        let mut values = benchmark_values();
        values[3] += 2.0;
        crypto::encrypt_payload(&series_literal(&values), &public).unwrap()
    };
    // Encrypted to a different recipient: decryption fails at the judge
    let (_, stranger_public) = keypair();
    let undecryptable =
        crypto::encrypt_payload(&series_literal(&benchmark_values()), &stranger_public).unwrap();

    let payloads = MemoryPayloads(HashMap::from([
        ("0xnft_good".to_string(), genuine),
        ("0xnft_bad".to_string(), undecryptable),
    ]));
    let transfers = StaticTransfers(vec![
        transfer(&deadline, 30, "0xmallory", "0xnft_bad"),
        transfer(&deadline, 40, "0xalice", "0xnft_good"),
    ]);

    let engine = JudgeEngine::new(
        config(),
        StaticCandles(benchmark_candles(&deadline)),
        transfers,
        payloads,
    );
    let now = deadline.instant() + Duration::minutes(62);
    let board = engine.run_at(deadline, &secret, now).await.unwrap();

    let entries = board.entries();
    assert_eq!(entries[0].artifact_id, "0xnft_good");
    assert!(entries[0].score < WORST_NMSE);
    assert_eq!(entries[1].artifact_id, "0xnft_bad");
    assert_eq!(entries[1].score, WORST_NMSE);
}

#[tokio::test]
async fn run_refuses_unfinished_observation_window() {
    let (secret, _) = keypair();
    let deadline = deadline();

    let engine = JudgeEngine::new(
        config(),
        StaticCandles(benchmark_candles(&deadline)),
        StaticTransfers(Vec::new()),
        MemoryPayloads(HashMap::new()),
    );
    // Only half the observation window has elapsed
    let now = deadline.instant() + Duration::minutes(30);
    assert!(engine.run_at(deadline, &secret, now).await.is_err());
}

#[tokio::test]
async fn benchmark_gap_aborts_the_run() {
    let (secret, _) = keypair();
    let deadline = deadline();

    let mut candles = benchmark_candles(&deadline);
    candles.truncate(5);

    let engine = JudgeEngine::new(
        config(),
        StaticCandles(candles),
        StaticTransfers(vec![transfer(&deadline, 30, "0xalice", "0xnft1")]),
        MemoryPayloads(HashMap::new()),
    );
    let now = deadline.instant() + Duration::minutes(62);
    assert!(engine.run_at(deadline, &secret, now).await.is_err());
}

#[tokio::test]
async fn submissions_outside_window_are_ignored() {
    let (secret, public) = keypair();
    let deadline = deadline();

    let payload =
        crypto::encrypt_payload(&series_literal(&benchmark_values()), &public).unwrap();
    let late = TransferEvent {
        timestamp: deadline.instant() + Duration::minutes(5),
        asset_id: "0xnft_late".to_string(),
        from_address: "0xlate".to_string(),
        to_address: "0xjudge".to_string(),
    };
    let transfers = StaticTransfers(vec![
        late,
        transfer(&deadline, 30, "0xalice", "0xnft1"),
    ]);
    let payloads = MemoryPayloads(HashMap::from([("0xnft1".to_string(), payload)]));

    let engine = JudgeEngine::new(
        config(),
        StaticCandles(benchmark_candles(&deadline)),
        transfers,
        payloads,
    );
    let now = deadline.instant() + Duration::minutes(62);
    let board = engine.run_at(deadline, &secret, now).await.unwrap();

    assert_eq!(board.len(), 1);
    assert_eq!(board.entries()[0].artifact_id, "0xnft1");
}

#[test]
fn explicit_deadline_string_resolves_to_utc() {
    use chrono::Timelike;
    let deadline = Deadline::resolve(Some("2023-05-03_23:59")).unwrap();
    let dt = deadline.instant();
    assert_eq!(dt.hour(), 23);
    assert_eq!(dt.minute(), 59);
    assert_eq!(dt.date_naive().to_string(), "2023-05-03");
}
