//! Outcome of reading an uploaded file into records.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Problems found on one source row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowParseError {
    /// Line number in the source file (the header is line 1).
    pub row: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseSummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub skipped_rows: usize,
}

/// Records read from one file plus every row-level problem encountered.
///
/// A file with any row error is rejected as a whole; `success` is false and
/// the caller must re-upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    pub success: bool,
    /// Column headers in file order.
    #[serde(default)]
    pub headers: Vec<String>,
    pub data: Vec<Record>,
    #[serde(default)]
    pub errors: Vec<RowParseError>,
    #[serde(default)]
    pub summary: ParseSummary,
}

impl ParseOutcome {
    /// Builds an outcome from already-parsed records, deriving headers from
    /// the first record.
    pub fn from_records(records: Vec<Record>) -> Self {
        let headers = records
            .first()
            .map(|r| r.headers().map(str::to_string).collect())
            .unwrap_or_default();
        let count = records.len();
        let data = records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| record.with_row(idx + 1))
            .collect();
        Self {
            success: true,
            headers,
            data,
            errors: Vec::new(),
            summary: ParseSummary {
                total_rows: count,
                valid_rows: count,
                invalid_rows: 0,
                skipped_rows: 0,
            },
        }
    }

    /// True when the file can proceed to mapping.
    pub fn is_usable(&self) -> bool {
        self.success && self.errors.is_empty()
    }

    /// All row problems flattened to `Line N: message` strings.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flat_map(|e| e.errors.iter().map(move |msg| format!("Line {}: {msg}", e.row)))
            .collect()
    }
}
