//! Accumulated outcome of one chunked submission.

use serde::{Deserialize, Serialize};

/// A problem attributable to one row and field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    #[serde(default)]
    pub field: String,
    pub error: String,
}

impl RowError {
    pub fn new(row: usize, field: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            row,
            field: field.into(),
            error: error.into(),
        }
    }

    /// Shifts a batch-local row number into the full record set.
    #[must_use]
    pub fn offset_by(mut self, offset: usize) -> Self {
        self.row += offset;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchStatus {
    Succeeded {
        created: usize,
        updated: usize,
        errors: usize,
    },
    /// Transport or server failure affecting the whole batch.
    Failed { cause: String },
}

/// What happened to one batch of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// Zero-based batch index.
    pub index: usize,
    /// Position of the batch's first record in the full record set.
    pub offset: usize,
    pub rows: usize,
    pub attempts: u32,
    #[serde(flatten)]
    pub status: BatchStatus,
}

impl BatchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, BatchStatus::Failed { .. })
    }
}

/// Totals and per-row detail across every batch of one submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRunResult {
    pub created_count: usize,
    pub updated_count: usize,
    pub errors_count: usize,
    #[serde(default)]
    pub created_items: Vec<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<RowError>,
    #[serde(default)]
    pub batches: Vec<BatchOutcome>,
}

impl ImportRunResult {
    /// Rows accounted for by the counters.
    pub fn processed_count(&self) -> usize {
        self.created_count + self.updated_count + self.errors_count
    }

    pub fn failed_batches(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.batches.iter().filter(|b| b.is_failed())
    }

    /// Every batch went through and no row reported an error.
    pub fn is_complete_success(&self) -> bool {
        self.errors_count == 0 && self.failed_batches().next().is_none()
    }
}
