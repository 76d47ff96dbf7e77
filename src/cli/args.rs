use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::core::{EngineConfig, DEFAULT_TOKEN_SECRET};
use crate::strategy::BatchConfig;

/// Process banking commands against the account and ledger core
#[derive(Parser, Debug)]
#[command(name = "banking-core")]
#[command(about = "Process banking commands against the account and ledger core", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing command rows
    #[arg(value_name = "INPUT", help = "Path to the input CSV command file")]
    pub input_file: PathBuf,

    /// Processing strategy to use for executing commands
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for sequential or 'async' for batched parallel"
    )]
    pub strategy: StrategyType,

    /// Number of commands per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of commands per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent partitions (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of partitions processing concurrently (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Secret used to sign session tokens issued on login
    #[arg(
        long = "token-secret",
        value_name = "SECRET",
        help = "Signing secret for session tokens (default: a local development secret)"
    )]
    pub token_secret: Option<String>,
}

/// Available processing strategies
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments, falling back to defaults
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create the engine configuration from CLI arguments
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            token_secret: self
                .token_secret
                .clone()
                .unwrap_or_else(|| DEFAULT_TOKEN_SECRET.to_string()),
            ..EngineConfig::default()
        }
    }
}
