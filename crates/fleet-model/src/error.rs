use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),
    #[error("batch size must be at least 1")]
    ZeroBatchSize,
}

pub type Result<T> = std::result::Result<T, ModelError>;
