//! Results reporting for the fleet import pipeline.
//!
//! Turns a finished [`ImportRunResult`](fleet_model::ImportRunResult) into
//! something a person can act on: counts, one line per error for copy-out,
//! terminal tables, and a CSV of every error.

pub mod error;
pub mod export;
pub mod summary;
pub mod table;

pub use error::{ReportError, Result};
pub use export::{write_errors_csv, write_errors_csv_file};
pub use summary::{ImportSummary, format_error_line, summarize};
pub use table::{render_error_table, render_preview_table, render_run_table};
