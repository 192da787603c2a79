//! Dry-run classification returned by the import endpoint in preview mode.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::run::RowError;

/// Reference to a row the server classified as valid.
///
/// Servers send either the bare row number or an object carrying `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowRef {
    Index(usize),
    Entry { row: usize },
}

impl RowRef {
    pub fn row(&self) -> usize {
        match self {
            Self::Index(row) | Self::Entry { row } => *row,
        }
    }
}

/// A row that will import but deserves attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWarning {
    pub row: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewResult {
    pub total_rows: usize,
    pub valid_count: usize,
    pub warning_count: usize,
    pub invalid_count: usize,
    pub valid: Vec<RowRef>,
    pub warnings: Vec<RowWarning>,
    pub invalid: Vec<RowError>,
}

impl PreviewResult {
    /// Counts add up to the total row count.
    pub fn is_consistent(&self) -> bool {
        self.valid_count + self.warning_count + self.invalid_count == self.total_rows
    }

    /// No row was classified invalid.
    pub fn is_clean(&self) -> bool {
        self.invalid_count == 0 && self.invalid.is_empty()
    }

    /// Row numbers with at least one invalid finding.
    pub fn invalid_rows(&self) -> BTreeSet<usize> {
        self.invalid.iter().map(|e| e.row).collect()
    }

    /// Rows that will be committed: everything not classified invalid.
    pub fn importable_count(&self) -> usize {
        self.valid_count + self.warning_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_refs_accept_both_shapes() {
        let refs: Vec<RowRef> = serde_json::from_str(r#"[3, {"row": 4, "id": "x"}]"#).unwrap();
        assert_eq!(refs.iter().map(RowRef::row).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let preview: PreviewResult = serde_json::from_str(
            r#"{"totalRows": 2, "validCount": 1, "warningCount": 0, "invalidCount": 1,
                "invalid": [{"row": 2, "field": "vin", "error": "too short"}]}"#,
        )
        .unwrap();
        assert!(preview.is_consistent());
        assert!(!preview.is_clean());
        assert!(preview.valid.is_empty());
        assert_eq!(preview.invalid_rows().into_iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(preview.importable_count(), 1);
    }
}
