//! Fleet import pipeline orchestration.
//!
//! Ties the stage crates together:
//!
//! - [`pipeline`]: the immutable [`PipelineState`] and its transitions
//! - [`session`]: [`ImportSession`], which performs the I/O around them
//! - [`settings`]: TOML-backed [`ImportSettings`]
//! - [`logging`]: `tracing-subscriber` setup

pub mod error;
pub mod logging;
pub mod pipeline;
pub mod session;
pub mod settings;

pub use error::{PipelineError, Result};
pub use logging::{LogConfig, LogFormat, init_logging, init_logging_with_writer, redact_cell};
pub use pipeline::{PipelineState, Stage};
pub use session::{ImportSession, Services};
pub use settings::{ImportSettings, LogSettings, SuggestSettings};
