pub mod check;
pub mod scan;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use probr_common::config::{DEFAULT_MATCH_CODES, DEFAULT_SHARD_COUNT};

#[derive(Parser)]
#[command(name = "probr")]
#[command(about = "Wordlist-sharded web content scanner.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan every target in a list, sharding the wordlist across engine runs
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Verify the fuzz engine is available
    #[command(alias = "c")]
    Check {
        /// Engine binary name or path
        #[arg(long, default_value = "ffuf")]
        engine_bin: String,
    },
}

#[derive(Args)]
pub struct ScanArgs {
    /// File with one target URL per line
    #[arg(short, long)]
    pub targets: PathBuf,

    /// Wordlist to shard across engine invocations
    #[arg(short, long)]
    pub wordlist: PathBuf,

    /// Label carried into notification captions
    #[arg(short, long, default_value = "probr")]
    pub session: String,

    /// Directory receiving the per-target combined reports
    #[arg(short, long, default_value = "probr-out")]
    pub output: PathBuf,

    /// Number of wordlist shards
    #[arg(long, default_value_t = DEFAULT_SHARD_COUNT)]
    pub shards: usize,

    /// Status codes to keep, comma-separated
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_MATCH_CODES.to_vec())]
    pub match_codes: Vec<u16>,

    /// Engine binary name or path
    #[arg(long, default_value = "ffuf")]
    pub engine_bin: String,

    /// Pass the engine's auto-calibration flag
    #[arg(long)]
    pub auto_calibrate: bool,

    /// Ask the engine to stop a job early on spurious results
    #[arg(long)]
    pub stop_on_errors: bool,

    /// Webhook URL for result/error notifications
    #[arg(long, conflicts_with_all = ["bot_token", "chat_id"])]
    pub webhook_url: Option<String>,

    /// Bot token for the bot-API notification backend
    #[arg(long, requires = "chat_id")]
    pub bot_token: Option<String>,

    /// Chat id for the bot-API notification backend
    #[arg(long, requires = "bot_token")]
    pub chat_id: Option<String>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
