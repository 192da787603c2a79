//! Mapping progress summary.

use std::collections::BTreeMap;

use fleet_model::{ColumnMapping, FixedValues, TargetField};

/// How far a mapping is from covering the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingSummary {
    pub total_headers: usize,
    pub mapped_headers: usize,
    /// Headers without a target, in file order.
    pub unmapped_headers: Vec<String>,
    pub required_total: usize,
    /// Required fields covered by a column or a fixed value.
    pub required_satisfied: usize,
    pub optional_total: usize,
    pub optional_satisfied: usize,
    /// Targets claimed by more than one header.
    pub duplicate_targets: BTreeMap<String, Vec<String>>,
}

impl MappingSummary {
    pub fn compute<S: AsRef<str>>(
        headers: &[S],
        fields: &[TargetField],
        mapping: &ColumnMapping,
        fixed: &FixedValues,
    ) -> Self {
        let unmapped_headers: Vec<String> = headers
            .iter()
            .map(AsRef::as_ref)
            .filter(|h| !mapping.contains_header(h))
            .map(str::to_string)
            .collect();

        let mut summary = Self {
            total_headers: headers.len(),
            mapped_headers: headers.len() - unmapped_headers.len(),
            unmapped_headers,
            duplicate_targets: mapping
                .duplicate_targets()
                .into_iter()
                .map(|(key, hs)| (key.to_string(), hs.into_iter().map(str::to_string).collect()))
                .collect(),
            ..Self::default()
        };

        for field in fields {
            let satisfied =
                mapping.is_target_mapped(&field.key) || fixed.contains_key(&field.key);
            if field.required {
                summary.required_total += 1;
                summary.required_satisfied += usize::from(satisfied);
            } else {
                summary.optional_total += 1;
                summary.optional_satisfied += usize::from(satisfied);
            }
        }
        summary
    }

    /// True when every required field is covered.
    pub fn is_complete(&self) -> bool {
        self.required_satisfied == self.required_total
    }

    /// Percentage of headers with a target, for progress display.
    pub fn mapped_percent(&self) -> f32 {
        if self.total_headers == 0 {
            return 100.0;
        }
        self.mapped_headers as f32 / self.total_headers as f32 * 100.0
    }
}
