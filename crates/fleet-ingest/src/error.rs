//! Error types for record parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that make an uploaded file unreadable as a whole.
///
/// Problems confined to individual rows are not errors at this level; they
/// are collected into the [`fleet_model::ParseOutcome`].
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file is too large: {size} bytes (limit {max_size} bytes)")]
    FileTooLarge { size: u64, max_size: u64 },

    // === Content Errors ===
    /// The upload contains no bytes or only whitespace.
    #[error("file is empty")]
    EmptyFile,

    /// The first line does not contain any column names.
    #[error("could not detect a header row")]
    NoHeaderDetected,

    /// Encoding other than UTF-8.
    #[error("unsupported encoding: {encoding} (only UTF-8 is supported)")]
    UnsupportedEncoding { encoding: &'static str },

    /// The CSV reader failed in a way that is not attributable to one row.
    #[error("failed to parse CSV: {message}")]
    CsvParse { message: String },
}

impl IngestError {
    /// Returns a user-friendly message suitable for an upload form.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::FileNotFound { .. } | Self::FileRead { .. } => {
                "The file could not be read. Please select it again."
            }
            Self::FileTooLarge { .. } => {
                "The file is too large. Please split it and upload the parts."
            }
            Self::EmptyFile => "The file is empty.",
            Self::NoHeaderDetected => "The first row must contain column names.",
            Self::UnsupportedEncoding { .. } => {
                "Please save the file as UTF-8 CSV and upload it again."
            }
            Self::CsvParse { .. } => "The file is not a valid CSV file.",
        }
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::CsvParse {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/loads.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /path/to/loads.csv");
    }

    #[test]
    fn test_user_message() {
        let err = IngestError::UnsupportedEncoding {
            encoding: "UTF-16 LE",
        };
        assert!(err.user_message().contains("UTF-8"));
    }
}
