//! Prediction Challenge Judge CLI
//!
//! Resolves the round deadline, judges every submission and prints the
//! ranked leaderboard, optionally persisting it as CSV.

use anyhow::{Context, Result};
use clap::Parser;
use predict_challenge::{
    crypto, report, Deadline, JudgeConfig, JudgeEngine, KrakenClient, NetworkConfig, SubgraphClient,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "judge")]
#[command(about = "Prediction Challenge Judge - scores submissions and prints the leaderboard")]
struct Args {
    /// Submission deadline, YYYY-MM-DD_HH:MM in UTC, or "None" for the most
    /// recent Wednesday 23:59 UTC
    #[arg(default_value = "None")]
    deadline: String,

    /// Directory to write challenge_data.csv into
    #[arg(short, long, env = "CSV_DIR")]
    csv_dir: Option<PathBuf>,

    /// Chain to read submissions from
    #[arg(long, default_value = "80001", env = "CHAIN_ID")]
    chain_id: u64,

    /// Judge decryption key, 32-byte hex
    #[arg(long, env = "JUDGE_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("predict_challenge=info".parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let network = NetworkConfig::for_chain(args.chain_id)
        .with_context(|| format!("unsupported chain id {}", args.chain_id))?;
    let config = JudgeConfig {
        network: network.clone(),
        ..JudgeConfig::default()
    };

    let private_key = crypto::parse_private_key(&args.private_key)?;
    let deadline = Deadline::resolve(Some(args.deadline.as_str()))?;

    info!("judging chain {} ({})", network.chain_id, network.name);
    info!("deadline: {}", deadline);

    let candles = KrakenClient::new();
    let transfers = SubgraphClient::new(&config.network.subgraph_url);
    let payloads = SubgraphClient::new(&config.network.subgraph_url);

    let engine = JudgeEngine::new(config, candles, transfers, payloads);
    let board = engine.run(deadline, &private_key).await?;

    println!("{}", report::render_table(&board));
    report::write_summary(&mut std::io::stdout(), &board)?;

    if let Some(dir) = args.csv_dir {
        std::fs::create_dir_all(&dir)?;
        let path = report::write_csv(&board, &dir)?;
        info!("leaderboard written to {}", path.display());
    }

    Ok(())
}
