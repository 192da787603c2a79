//! Flattening a run into a summary with one line per error.

use fleet_model::{ImportRunResult, RowError};
use serde::Serialize;

/// Counts plus every error as a human-readable line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub created_count: usize,
    pub updated_count: usize,
    pub errors_count: usize,
    /// One `Row {row} [{field}]: {error}` line per error, in run order.
    pub error_lines: Vec<String>,
}

impl ImportSummary {
    /// All error lines joined for copy-out.
    pub fn error_log_text(&self) -> String {
        self.error_lines.join("\n")
    }

    pub fn has_errors(&self) -> bool {
        self.errors_count > 0 || !self.error_lines.is_empty()
    }
}

/// Formats one error as `Row {row} [{field}]: {error}`.
///
/// Errors without a field are shown as `[-]`.
pub fn format_error_line(error: &RowError) -> String {
    let field = if error.field.trim().is_empty() {
        "-"
    } else {
        error.field.as_str()
    };
    format!("Row {} [{field}]: {}", error.row, error.error)
}

/// Pure flattening of a finished run.
pub fn summarize(result: &ImportRunResult) -> ImportSummary {
    ImportSummary {
        created_count: result.created_count,
        updated_count: result.updated_count,
        errors_count: result.errors_count,
        error_lines: result.errors.iter().map(format_error_line).collect(),
    }
}
