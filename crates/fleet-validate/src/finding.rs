//! Validation finding types.
//!
//! Each variant carries only the data its message needs.

use serde::{Deserialize, Serialize};

/// Whether a finding stops the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Must be resolved before preview
    Blocking,
    /// Shown to the user, never blocks
    Advisory,
}

impl Severity {
    /// Parse severity from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "blocking" | "error" => Some(Self::Blocking),
            "advisory" | "warning" => Some(Self::Advisory),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Blocking => "Blocking",
            Self::Advisory => "Advisory",
        }
    }
}

/// One observation about a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finding {
    /// Required field with neither a column nor a fixed value
    RequiredMissing { key: String, label: String },
    /// Optional field with neither a column nor a fixed value
    OptionalMissing { key: String, label: String },
    /// Several headers feed the same field
    DuplicateTarget { key: String, headers: Vec<String> },
    /// Mapped column is empty in the sample record
    EmptyInSample { key: String, header: String },
    /// Mapping points at a key the catalog does not define
    UnknownTarget { header: String, key: String },
}

impl Finding {
    /// Target key (all findings have one).
    pub fn key(&self) -> &str {
        match self {
            Finding::RequiredMissing { key, .. }
            | Finding::OptionalMissing { key, .. }
            | Finding::DuplicateTarget { key, .. }
            | Finding::EmptyInSample { key, .. }
            | Finding::UnknownTarget { key, .. } => key,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Finding::RequiredMissing { .. } => Severity::Blocking,
            _ => Severity::Advisory,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity() == Severity::Blocking
    }

    /// Format message with finding-specific data.
    pub fn message(&self) -> String {
        match self {
            Finding::RequiredMissing { label, .. } => {
                format!("Required field {label} has no column or fixed value")
            }
            Finding::OptionalMissing { label, .. } => {
                format!("Optional field {label} will be left empty")
            }
            Finding::DuplicateTarget { key, headers } => {
                format!("Columns {} all map to {key}", headers.join(", "))
            }
            Finding::EmptyInSample { key, header } => {
                format!("Column {header} (mapped to {key}) is empty in the first row")
            }
            Finding::UnknownTarget { header, key } => {
                format!("Column {header} maps to unknown field {key}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_required_missing_blocks() {
        let blocking = Finding::RequiredMissing {
            key: "vin".into(),
            label: "VIN".into(),
        };
        let advisory = Finding::DuplicateTarget {
            key: "loadId".into(),
            headers: vec!["Load #".into(), "Ref".into()],
        };
        assert!(blocking.is_blocking());
        assert!(!advisory.is_blocking());
        assert_eq!(advisory.message(), "Columns Load #, Ref all map to loadId");
        assert_eq!(Severity::parse("Warning"), Some(Severity::Advisory));
    }
}
