//! The record parser seam.

use std::path::Path;

use fleet_model::ParseOutcome;

use crate::csv::{MAX_CSV_FILE_SIZE, io_error, parse_csv_bytes, read_csv_file};
use crate::error::{IngestError, Result};

/// Converts an uploaded file into records plus per-row parse errors.
///
/// The pipeline only depends on this trait, so spreadsheet formats other than
/// CSV can be plugged in without touching the mapping or submission stages.
pub trait RecordParser {
    /// Parses the raw bytes of an upload.
    fn parse(&self, bytes: &[u8]) -> Result<ParseOutcome>;

    /// Reads and parses a file from disk.
    fn parse_file(&self, path: &Path) -> Result<ParseOutcome> {
        let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
        self.parse(&bytes)
    }
}

/// CSV implementation of [`RecordParser`].
#[derive(Debug, Clone, Copy)]
pub struct CsvParser {
    max_file_size: u64,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            max_file_size: MAX_CSV_FILE_SIZE,
        }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the upload size limit in bytes.
    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }
}

impl RecordParser for CsvParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParseOutcome> {
        let size = bytes.len() as u64;
        if size > self.max_file_size {
            return Err(IngestError::FileTooLarge {
                size,
                max_size: self.max_file_size,
            });
        }
        parse_csv_bytes(bytes)
    }

    fn parse_file(&self, path: &Path) -> Result<ParseOutcome> {
        read_csv_file(path, self.max_file_size)
    }
}
