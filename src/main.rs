//! Banking core CLI
//!
//! Processes a CSV file of banking commands (register, login, deposit,
//! withdraw, transfer, history, ...) through the account and ledger core,
//! then writes the final account states to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > accounts.csv
//! cargo run -- --strategy sync commands.csv > accounts.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 commands.csv > accounts.csv
//! RUST_LOG=debug cargo run -- commands.csv
//! ```
//!
//! # Processing Strategies
//!
//! - **sync**: sequential execution in strict file order (default)
//! - **async**: batched execution, partitioned per account, in parallel
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Fatal error (missing arguments, file not found, I/O failure)

use std::process;

use tracing_subscriber::EnvFilter;

use rust_banking_core::cli;
use rust_banking_core::strategy;

fn main() {
    // Log level comes from RUST_LOG; default to warnings only so the
    // account CSV on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let strategy = {
        let batch_config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), args.to_engine_config(), batch_config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
