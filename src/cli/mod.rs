//! CLI argument parsing
//!
//! Wraps the clap-derived [`CliArgs`] parser.

pub mod args;

pub use args::{CliArgs, StrategyType};

use clap::Parser;

/// Parse command-line arguments, exiting with usage help on error
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
