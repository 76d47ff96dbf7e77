//! I/O module
//!
//! Handles command-file parsing and account-state output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, output serialization)
//! - `sync_reader` - Synchronous command reader with iterator interface
//! - `async_reader` - Asynchronous command reader with batch interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_csv_command, write_accounts_csv, CsvCommand, COMMAND_HEADERS};
pub use sync_reader::SyncReader;
