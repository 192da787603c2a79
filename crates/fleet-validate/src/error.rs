//! Error types for validation helpers.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    /// Target key not present in the field catalog.
    #[error("target field not found: {0}")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, ValidateError>;
