//! Import service client for the fleet import pipeline.
//!
//! # Features
//!
//! - **Preview**: one dry-run request classifying every row
//! - **Submission**: sequential batches folded into an [`ImportRunResult`](fleet_model::ImportRunResult),
//!   with per-row errors re-addressed to file row numbers
//! - **Retry**: bounded, and only for failures the server cannot have committed
//! - **HTTP**: a blocking client that also serves the field catalog, mapping
//!   profiles and AI suggestions

pub mod batch;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod preview;

pub use batch::{BATCH_ERROR_FIELD, SubmitProgress, send_with_retry, submit};
pub use config::{DEFAULT_MAX_BATCH_RETRIES, DEFAULT_REQUEST_TIMEOUT_SECS, SubmitSettings};
pub use endpoint::{
    BatchDetails, BatchEnvelope, BatchReport, ImportEndpoint, ImportRequest, PreviewEnvelope,
};
pub use error::{Result, TransportError};
pub use http::HttpClient;
pub use preview::preview;
