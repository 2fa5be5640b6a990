//! Command-line interface definitions.
//!
//! Defines the CLI structure for the rebalancer using `clap`. Every
//! subcommand runs once and exits; live executions wait for their
//! confirmation monitor before the process ends.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::rebalance::TriggerType;
use crate::domain::sentiment::SentimentLabel;

/// Sentiment-driven portfolio rebalancing CLI
#[derive(Parser, Debug)]
#[command(name = "rebalancer")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show execution mode and configuration summary
    Status,

    /// Preview a rebalance without persisting anything
    Simulate(SimulateArgs),

    /// Evaluate, execute and record a rebalance
    Execute(ExecuteArgs),

    /// List a user's rebalance records, newest first
    History(HistoryArgs),

    /// Link a wallet address to a user
    LinkWallet(LinkWalletArgs),

    /// Resume monitoring of records left pending by a previous run
    Recover,
}

/// A sentiment reading supplied on the command line.
///
/// When `--score` is absent the configured provider is queried instead.
#[derive(Args, Debug, Clone, Default)]
pub struct SentimentArgs {
    /// Sentiment score, 0 (max fear) to 100 (max greed)
    #[arg(long)]
    pub score: Option<u8>,

    /// Sentiment label [bearish, neutral, bullish, euphoric]; derived from the score when omitted
    #[arg(long, requires = "score")]
    pub label: Option<SentimentLabel>,

    /// Provider confidence, 0 to 1
    #[arg(long, requires = "score")]
    pub confidence: Option<f64>,
}

/// Arguments for `rebalancer simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Allocation JSON file
    #[arg(long)]
    pub allocation: PathBuf,

    #[command(flatten)]
    pub sentiment: SentimentArgs,
}

/// Arguments for `rebalancer execute`.
#[derive(Args, Debug)]
pub struct ExecuteArgs {
    /// Allocation JSON file
    #[arg(long)]
    pub allocation: PathBuf,

    #[command(flatten)]
    pub sentiment: SentimentArgs,

    /// What initiated this rebalance [manual, scheduled, sentiment_shift]
    #[arg(long, default_value = "manual")]
    pub trigger: TriggerType,
}

/// Arguments for `rebalancer history`.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// User identifier
    #[arg(long)]
    pub user: String,
}

/// Arguments for `rebalancer link-wallet`.
#[derive(Args, Debug)]
pub struct LinkWalletArgs {
    /// User identifier
    #[arg(long)]
    pub user: String,

    /// Wallet address (0x-prefixed)
    #[arg(long)]
    pub address: String,
}
