//! Error types for mapping operations.

use thiserror::Error;

/// Errors from mapping operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Header not present in the uploaded file.
    #[error("column not found: {0}")]
    UnknownHeader(String),

    /// Target key not present in the field catalog.
    #[error("target field not found: {0}")]
    UnknownTarget(String),

    /// No profile with this id exists for the entity type.
    #[error("mapping profile {id} not found for {entity_type}")]
    ProfileNotFound { id: String, entity_type: String },

    /// Profile names must not be blank.
    #[error("mapping profile name must not be empty")]
    EmptyProfileName,

    /// The profile store could not be reached or rejected the request.
    #[error("mapping profile store failed: {0}")]
    ProfileStore(String),

    /// The field catalog could not be loaded.
    #[error("field catalog unavailable: {0}")]
    Catalog(String),
}

/// Failure of the AI suggestion service.
///
/// Suggestion failures are advisory; the mapper logs them and keeps the
/// local mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestError {
    /// No suggestion service is configured.
    #[error("suggestion service is not available")]
    Unavailable,

    /// The service was reached but failed.
    #[error("suggestion service failed: {0}")]
    Service(String),
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;
