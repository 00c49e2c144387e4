//! Adinsight CLI
//!
//! Offline tooling for the insight rollup.
//!
//! # Usage
//!
//! ```bash
//! adinsight --help
//! adinsight rollup --records records.json --account-id x1
//! adinsight parse --event event.json
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::models::{
    normalize_all, parse_request, AccountDescriptor, InsightRequest, QueueEvent, RawMetricRecord,
};
use shared::rollup::{InsightReport, RollupEngine, DEFAULT_PLATFORM};
use std::path::{Path, PathBuf};

/// Adinsight CLI - ad insight rollups from the command line
#[derive(Parser)]
#[command(name = "adinsight")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll up a JSON array of raw insight records
    Rollup {
        /// File holding the raw records
        #[arg(short, long)]
        records: PathBuf,

        /// Account to report on
        #[arg(long)]
        account_id: String,

        /// Account name used when no record matches
        #[arg(long, default_value = "")]
        account_name: String,

        /// Platform tag for the account aggregate
        #[arg(long, env = "ADINSIGHT_PLATFORM", default_value = DEFAULT_PLATFORM)]
        platform: String,
    },
    /// Parse and validate a queue delivery file
    Parse {
        /// File holding the queue delivery document
        #[arg(short, long)]
        event: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Rollup {
            records,
            account_id,
            account_name,
            platform,
        }) => {
            let raw: Vec<RawMetricRecord> = read_json(&records)?;
            tracing::debug!(records = raw.len(), account_id = %account_id, "Loaded records");
            let account = AccountDescriptor {
                id: account_id,
                name: account_name,
                ..AccountDescriptor::default()
            };
            let report = rollup(raw, &account, &platform);
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to encode report")?
            );
        }
        Some(Commands::Parse { event }) => {
            let event: QueueEvent = read_json(&event)?;
            let request = parse_request(&event).context("Queue delivery is not a valid request")?;
            println!("{}", summarize(&request));
        }
        None => {
            println!("Adinsight CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn rollup(raw: Vec<RawMetricRecord>, account: &AccountDescriptor, platform: &str) -> InsightReport {
    let engine = RollupEngine::new(platform);
    let accounts = engine.run(normalize_all(raw));
    InsightReport::assemble(account, accounts, engine.platform())
}

fn summarize(request: &InsightRequest) -> String {
    let account = request
        .current_account()
        .map_or("<none>", |account| account.id.as_str());
    format!(
        "shop {} ({}) account {} of {} [{}] at {}{}",
        request.shop_id,
        request.shop_name,
        account,
        request.accounts.len(),
        request.platform,
        request.start_sync_time.to_rfc3339(),
        request
            .request_id
            .as_deref()
            .map(|id| format!(" request {id}"))
            .unwrap_or_default(),
    )
}
