//! Mapping coverage check.

use std::collections::HashSet;

use fleet_model::{ColumnMapping, FixedValues, Record, TargetField};

use crate::finding::Finding;

/// Outcome of validating a mapping against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingValidation {
    /// Required fields with neither a column nor a fixed value.
    pub missing_required: Vec<TargetField>,
    /// Optional fields with neither a column nor a fixed value.
    pub missing_optional: Vec<TargetField>,
    /// Every finding, blocking ones first.
    pub findings: Vec<Finding>,
}

impl MappingValidation {
    /// True when progression to preview must be refused.
    pub fn is_blocked(&self) -> bool {
        !self.missing_required.is_empty()
    }

    pub fn blocking(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_blocking())
    }

    pub fn advisories(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_blocking())
    }

    /// Keys of the missing required fields.
    pub fn missing_required_keys(&self) -> Vec<&str> {
        self.missing_required.iter().map(|f| f.key.as_str()).collect()
    }
}

/// True when a column or a fixed value supplies `key`.
pub fn is_satisfied(key: &str, mapping: &ColumnMapping, fixed: &FixedValues) -> bool {
    mapping.is_target_mapped(key) || fixed.contains_key(key)
}

/// Checks which target fields a mapping leaves uncovered.
///
/// Pure; meant to be re-run after every mapping or fixed-value change.
/// Repeated catalog keys are checked once. `sample` is usually the first
/// record and only feeds the empty-value advisory.
pub fn validate(
    fields: &[TargetField],
    mapping: &ColumnMapping,
    fixed: &FixedValues,
    sample: Option<&Record>,
) -> MappingValidation {
    let mut result = MappingValidation::default();
    let mut advisories = Vec::new();
    let mut seen = HashSet::new();

    for field in fields {
        if !seen.insert(field.key.as_str()) {
            continue;
        }
        if is_satisfied(&field.key, mapping, fixed) {
            continue;
        }
        let label = field.display_name().to_string();
        if field.required {
            result.findings.push(Finding::RequiredMissing {
                key: field.key.clone(),
                label,
            });
            result.missing_required.push(field.clone());
        } else {
            advisories.push(Finding::OptionalMissing {
                key: field.key.clone(),
                label,
            });
            result.missing_optional.push(field.clone());
        }
    }

    for (key, headers) in mapping.duplicate_targets() {
        advisories.push(Finding::DuplicateTarget {
            key: key.to_string(),
            headers: headers.into_iter().map(str::to_string).collect(),
        });
    }

    for (header, key) in mapping.iter() {
        if !seen.contains(key) {
            advisories.push(Finding::UnknownTarget {
                header: header.to_string(),
                key: key.to_string(),
            });
        } else if let Some(record) = sample
            && record.value(header).trim().is_empty()
            && !fixed.contains_key(key)
        {
            advisories.push(Finding::EmptyInSample {
                key: key.to_string(),
                header: header.to_string(),
            });
        }
    }

    result.findings.extend(advisories);
    tracing::debug!(
        missing_required = result.missing_required.len(),
        missing_optional = result.missing_optional.len(),
        findings = result.findings.len(),
        "validated mapping"
    );
    result
}
