//! Asynchronous batch processing strategy
//!
//! Multi-threaded pipeline over a shared, thread-safe [`BankEngine`]:
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── Arc<BankEngine> (thread-safe stores + throttle)
//! ```
//!
//! Batches are read and processed sequentially so ordering holds across
//! the whole file; within a batch, commands are partitioned by their
//! primary account key and the partitions execute concurrently on a tokio
//! multi-thread runtime. Commands for one account therefore always apply
//! in file order, while unrelated accounts proceed in parallel. The
//! engine's stores make cross-partition operations (transfers touching a
//! concurrently active destination) atomic regardless of scheduling.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::core::{BankEngine, EngineConfig};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_accounts_csv;
use crate::strategy::ProcessingStrategy;
use crate::types::Command;

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Worker threads processing partitions concurrently
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, falling back to defaults on zero values
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            eprintln!(
                "Warning: Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            eprintln!(
                "Warning: Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches, default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    engine_config: EngineConfig,
    batch_config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(engine_config: EngineConfig, batch_config: BatchConfig) -> Self {
        Self {
            engine_config,
            batch_config,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.batch_config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let engine = Arc::new(BankEngine::new(self.engine_config.clone()));

        runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // Wrap the tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            // Batches are sequential; per-account ordering holds across
            // the entire file
            loop {
                let batch = reader.read_batch(self.batch_config.batch_size).await;
                if batch.is_empty() {
                    break;
                }
                process_batch(Arc::clone(&engine), batch).await;
            }

            Ok::<(), String>(())
        })?;

        write_accounts_csv(&engine.accounts(), output).map_err(|e| e.to_string())
    }
}

/// Execute one batch, partitioned by primary account key
///
/// Each partition keeps its commands in file order and runs them on its
/// own task; the batch completes when every partition has drained.
async fn process_batch(engine: Arc<BankEngine>, batch: Vec<Command>) {
    let mut partitions: HashMap<String, Vec<Command>> = HashMap::new();
    for command in batch {
        partitions
            .entry(command.partition_key().to_string())
            .or_default()
            .push(command);
    }

    let mut handles = Vec::with_capacity(partitions.len());
    for (_key, commands) in partitions {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            for command in commands {
                let op = command.op_name();
                match engine.execute(command) {
                    Ok(outcome) => {
                        debug!(op, outcome = %outcome.summary(), "command applied")
                    }
                    Err(e) => eprintln!("Command processing error: {}", e),
                }
            }
        }));
    }

    for handle in handles {
        if let Err(e) = handle.await {
            eprintln!("Worker task failed: {}", e);
        }
    }
}
