//! Asynchronous CSV reader with batch interface
//!
//! Streams typed commands from a command file in batches for the async
//! processing strategy. Uses csv-async over any `futures::AsyncRead`,
//! delegating row conversion to the [`csv_format`](super::csv_format)
//! module. Invalid rows are logged to stderr and skipped, matching the
//! recoverable-error policy of the sync path.

use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

use crate::io::csv_format::{convert_csv_command, CsvCommand};
use crate::types::Command;

/// Batch-reading command-file reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a reader over an async byte source
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read up to `batch_size` commands
    ///
    /// Rows that fail to parse or convert are logged to stderr and
    /// skipped. An empty vector means end of file.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Command> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut rows = self.csv_reader.deserialize::<CsvCommand>();

        while batch.len() < batch_size {
            match rows.next().await {
                Some(Ok(row)) => match convert_csv_command(row) {
                    Ok(command) => batch.push(command),
                    Err(e) => eprintln!("Command conversion error: {}", e),
                },
                Some(Err(e)) => eprintln!("CSV parse error: {}", e),
                None => break,
            }
        }

        batch
    }
}
