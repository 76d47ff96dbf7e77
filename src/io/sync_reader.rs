//! Synchronous CSV reader with iterator interface
//!
//! Streams typed commands from a command file one row at a time,
//! delegating format concerns to the [`csv_format`](super::csv_format)
//! module. Fatal errors (file not found) surface from `new()`; per-row
//! parse and conversion errors are yielded as `Err` items so processing
//! can continue with the next row.

use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

use crate::io::csv_format::{convert_csv_command, CsvCommand};
use crate::types::{BankError, Command};

/// Streaming command-file reader
///
/// Implements `Iterator<Item = Result<Command, BankError>>`; memory usage
/// is one row at a time regardless of file size.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
}

impl SyncReader {
    /// Open a command file for streaming iteration
    ///
    /// The reader trims whitespace and accepts rows with trailing columns
    /// omitted, since most operations leave most columns empty.
    pub fn new(path: &Path) -> Result<Self, BankError> {
        let file = File::open(path).map_err(|e| BankError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(file);

        Ok(SyncReader { reader })
    }
}

impl Iterator for SyncReader {
    type Item = Result<Command, BankError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row: Result<CsvCommand, csv::Error> = self.reader.deserialize().next()?;

        Some(match row {
            Ok(row) => convert_csv_command(row),
            Err(e) => Err(e.into()),
        })
    }
}
