//! Error types for the import pipeline.

use fleet_ingest::IngestError;
use fleet_map::MappingError;
use fleet_report::ReportError;
use fleet_submit::TransportError;
use fleet_validate::ValidateError;
use thiserror::Error;

use crate::pipeline::Stage;

/// Errors raised while driving an import through its stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The action is not allowed in the current stage.
    #[error("cannot {action} in the {from} stage")]
    InvalidTransition { from: Stage, action: &'static str },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// The file parsed, but some rows did not. Files are never partially accepted.
    #[error("file has {} row error(s)", messages.len())]
    ParseFailed { messages: Vec<String> },

    #[error("file contains no data rows")]
    NoRecords,

    #[error("required fields have no column or fixed value: {}", keys.join(", "))]
    MissingRequired { keys: Vec<String> },

    #[error("preview failed: {0}")]
    PreviewFailed(#[source] TransportError),

    #[error("no preview to approve")]
    NoPreview,

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Validate(#[from] ValidateError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Message suitable for showing to the person running the import.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidTransition { from, action } => {
                format!("You cannot {action} while in the {from} step.")
            }
            Self::Ingest(e) => e.user_message().to_string(),
            Self::ParseFailed { messages } => format!(
                "The file has {} problem row(s). Fix them and upload the file again.",
                messages.len()
            ),
            Self::NoRecords => "The file has a header row but no data.".to_string(),
            Self::MissingRequired { keys } => format!(
                "Map a column or set a value for: {}.",
                keys.join(", ")
            ),
            Self::PreviewFailed(e) => format!("Preview failed. {}", e.user_message()),
            Self::NoPreview => "Run a preview before importing.".to_string(),
            Self::Mapping(e) => e.to_string(),
            Self::Validate(e) => e.to_string(),
            Self::Report(e) => format!("The error report could not be written: {e}"),
            Self::Config(msg) => format!("Settings problem: {msg}"),
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
