use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ledger_core::{
    constants::DEMO_DIFFICULTY, validate_chain, Block, HashingConfig, Ledger, LedgerConfig,
};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ledger-cli")]
#[command(about = "Build, print and validate a small hash-chained ledger")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append transactions to a fresh ledger, print every block and validate the chain
    Demo {
        /// JSON ledger config; flags below override its fields
        #[arg(long)]
        config: Option<PathBuf>,
        /// Leading zero hex digits required per block (0 disables mining)
        #[arg(long)]
        difficulty: Option<u32>,
        /// How the stored block hash is produced
        #[arg(long, value_enum)]
        hashing: Option<HashingMode>,
        /// Secret key for argon2 finalization
        #[arg(long)]
        key: Option<String>,
        /// Abort an append after this many mining attempts
        #[arg(long)]
        max_attempts: Option<u64>,
        /// Transaction text; repeat for one block per transaction
        #[arg(long = "tx")]
        txs: Vec<String>,
        /// Overwrite this block's transactions in a copy of the chain before validating
        #[arg(long)]
        tamper: Option<usize>,
        /// Print the chain and verdict as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HashingMode {
    Single,
    Argon2,
}

#[derive(Serialize)]
struct BlockView<'a> {
    index: u64,
    timestamp: u64,
    transactions: &'a Value,
    previous_hash: String,
    hash: Option<String>,
    nonce: u64,
}

impl<'a> From<&'a Block> for BlockView<'a> {
    fn from(block: &'a Block) -> Self {
        Self {
            index: block.index,
            timestamp: block.timestamp,
            transactions: &block.transactions,
            previous_hash: hex::encode(block.previous_hash),
            hash: block.hash_hex(),
            nonce: block.nonce,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    blocks: Vec<BlockView<'a>>,
    valid: bool,
    mismatch: Option<String>,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .pretty()
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo {
            config,
            difficulty,
            hashing,
            key,
            max_attempts,
            txs,
            tamper,
            json,
        } => {
            let config = load_config(config, difficulty, hashing, key, max_attempts)?;
            run_demo(config, txs, tamper, json)
        }
    }
}

fn load_config(
    path: Option<PathBuf>,
    difficulty: Option<u32>,
    hashing: Option<HashingMode>,
    key: Option<String>,
    max_attempts: Option<u64>,
) -> Result<LedgerConfig> {
    let mut config = match &path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => LedgerConfig::with_difficulty(DEMO_DIFFICULTY),
    };

    if difficulty.is_some() {
        config.difficulty = difficulty;
    }
    if max_attempts.is_some() {
        config.max_mining_attempts = max_attempts;
    }
    match hashing {
        Some(HashingMode::Single) => config.hashing = HashingConfig::Single,
        Some(HashingMode::Argon2) if !matches!(config.hashing, HashingConfig::Argon2 { .. }) => {
            config.hashing = HashingConfig::argon2(String::new());
        }
        _ => {}
    }
    if let Some(new_key) = key {
        match &mut config.hashing {
            HashingConfig::Argon2 { key, .. } => *key = new_key,
            HashingConfig::Single => bail!("--key only applies to argon2 hashing"),
        }
    }
    Ok(config)
}

fn run_demo(
    config: LedgerConfig,
    txs: Vec<String>,
    tamper: Option<usize>,
    json: bool,
) -> Result<()> {
    let txs = if txs.is_empty() {
        vec![
            "Transaction 1: Arslan pays Sid 10 BTC".to_string(),
            "Transaction 2: Sid pays Quad 5 BTC".to_string(),
        ]
    } else {
        txs
    };

    let mut ledger = Ledger::new(config).context("creating ledger")?;
    info!(
        "ledger created with {} hashing, difficulty {:?}",
        ledger.strategy().name(),
        ledger.difficulty()
    );
    for tx in &txs {
        ledger
            .append_block(&vec![tx])
            .with_context(|| format!("appending {tx:?}"))?;
    }

    let mut blocks = ledger.blocks().to_vec();
    if let Some(index) = tamper {
        if index == 0 || index >= blocks.len() {
            bail!(
                "--tamper must name a block between 1 and {}",
                blocks.len() - 1
            );
        }
        blocks[index].transactions = Value::String("tampered".to_string());
    }
    let verdict = validate_chain(&blocks, ledger.difficulty(), ledger.strategy());

    if json {
        let report = Report {
            blocks: blocks.iter().map(BlockView::from).collect(),
            valid: verdict.is_ok(),
            mismatch: verdict.err().map(|m| m.to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for block in &blocks {
        println!("Block {}:", block.index);
        println!("  Timestamp: {}", block.timestamp);
        println!("  Transactions: {}", block.transactions);
        println!("  Previous Hash: {}", hex::encode(block.previous_hash));
        println!(
            "  Hash: {}",
            block.hash_hex().unwrap_or_else(|| "-".to_string())
        );
        println!("  Nonce: {}\n", block.nonce);
    }
    match verdict {
        Ok(()) => println!("Is blockchain valid? true"),
        Err(mismatch) => {
            println!("Validation failed: {mismatch}");
            println!("Is blockchain valid? false");
        }
    }
    Ok(())
}
