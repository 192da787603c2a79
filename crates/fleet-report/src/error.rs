//! Error types for report export.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to write the CSV stream.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to create or flush the output file.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
