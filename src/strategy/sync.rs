//! Synchronous processing strategy
//!
//! Single-threaded pipeline: stream commands from the file with
//! [`SyncReader`], execute each against one [`BankEngine`], then write the
//! final account states. Commands execute strictly in file order, which
//! makes this the reference strategy for deterministic runs.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::core::{BankEngine, EngineConfig};
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;

/// Synchronous processing strategy
///
/// Memory usage is O(accounts + transactions), independent of file size:
/// rows stream through one at a time.
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    engine_config: EngineConfig,
}

impl SyncProcessingStrategy {
    pub fn new(engine_config: EngineConfig) -> Self {
        SyncProcessingStrategy { engine_config }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let engine = BankEngine::new(self.engine_config.clone());

        let reader = SyncReader::new(input_path).map_err(|e| e.to_string())?;

        for result in reader {
            match result {
                Ok(command) => {
                    let op = command.op_name();
                    match engine.execute(command) {
                        Ok(outcome) => {
                            debug!(op, outcome = %outcome.summary(), "command applied")
                        }
                        Err(e) => eprintln!("Command processing error: {}", e),
                    }
                }
                Err(e) => eprintln!("CSV parsing error: {}", e),
            }
        }

        write_accounts_csv(&engine.accounts(), output).map_err(|e| e.to_string())
    }
}
