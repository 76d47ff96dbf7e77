//! Processing strategy module for command-file processing
//!
//! This module defines the Strategy pattern for complete command
//! processing pipelines, encompassing CSV parsing, engine execution and
//! final-state output. This allows different processing implementations
//! (synchronous, asynchronous batch) to be selected at runtime.

use std::io::Write;
use std::path::Path;

use crate::cli::StrategyType;
use crate::core::EngineConfig;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete command processing pipelines
///
/// Each strategy reads commands from a CSV file, drives them through a
/// [`BankEngine`](crate::core::BankEngine), and writes the final account
/// states to the provided output writer.
///
/// Individual command failures are recoverable: they are logged to stderr
/// and processing continues with the next row. Only fatal conditions
/// (file not found, I/O failure, runtime construction) abort the run.
pub trait ProcessingStrategy: Send + Sync {
    /// Process commands from the input file and write results to output
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy` - Which pipeline implementation to instantiate
/// * `engine_config` - Throttle and token configuration for the engine
/// * `batch_config` - Async batching knobs; `None` uses the defaults
pub fn create_strategy(
    strategy: StrategyType,
    engine_config: EngineConfig,
    batch_config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(engine_config)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            engine_config,
            batch_config.unwrap_or_default(),
        )),
    }
}
