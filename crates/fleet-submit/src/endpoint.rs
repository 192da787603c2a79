//! The import endpoint seam and its wire types.

use fleet_model::{ColumnMapping, FixedValues, ImportParams, PreviewResult, Record, RowError};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Body of a preview or batch request.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest<'a> {
    /// Entity type; part of the URL, not the body.
    #[serde(skip)]
    pub entity_type: &'a str,
    pub records: &'a [Record],
    pub column_mapping: &'a ColumnMapping,
    pub fixed_values: &'a FixedValues,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<&'a str>,
    pub update_existing: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub preview_only: bool,
}

impl<'a> ImportRequest<'a> {
    /// Submission request for `records`.
    pub fn new(
        params: &'a ImportParams,
        records: &'a [Record],
        column_mapping: &'a ColumnMapping,
        fixed_values: &'a FixedValues,
    ) -> Self {
        Self {
            entity_type: &params.entity_type,
            records,
            column_mapping,
            fixed_values,
            scope_id: params.scope_id.as_deref(),
            update_existing: params.update_existing,
            preview_only: false,
        }
    }

    /// The same request in dry-run mode.
    #[must_use]
    pub fn preview(mut self) -> Self {
        self.preview_only = true;
        self
    }

    /// The same request carrying a different slice of records.
    #[must_use]
    pub fn with_records(mut self, records: &'a [Record]) -> Self {
        self.records = records;
        self
    }
}

/// Per-row detail of one batch response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchDetails {
    pub created: Vec<serde_json::Value>,
    /// Row numbers are local to the batch.
    pub errors: Vec<RowError>,
}

/// Outcome of one successful batch request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchReport {
    pub created: usize,
    pub updated: usize,
    pub errors: usize,
    pub details: BatchDetails,
}

/// `{ preview: true, data: PreviewResult }`
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewEnvelope {
    #[serde(default)]
    pub preview: bool,
    pub data: PreviewResult,
}

/// `{ data: BatchReport }`
#[derive(Debug, Clone, Deserialize)]
pub struct BatchEnvelope {
    pub data: BatchReport,
}

/// Server-side import/validate endpoint.
///
/// One call is one round trip. Implementations must not retry on their
/// own; retry policy belongs to the submission engine.
pub trait ImportEndpoint {
    /// Dry run: classify every record without persisting anything.
    fn preview(&self, request: &ImportRequest<'_>) -> Result<PreviewResult>;

    /// Persist one batch of records.
    fn submit_batch(&self, request: &ImportRequest<'_>) -> Result<BatchReport>;
}

impl<T: ImportEndpoint + ?Sized> ImportEndpoint for &T {
    fn preview(&self, request: &ImportRequest<'_>) -> Result<PreviewResult> {
        (**self).preview(request)
    }

    fn submit_batch(&self, request: &ImportRequest<'_>) -> Result<BatchReport> {
        (**self).submit_batch(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let params = ImportParams::new("trucks").with_scope("terminal-7");
        let records = vec![Record::from_pairs(1, [("VIN", "1FT")])];
        let mapping: ColumnMapping = [("VIN", "vin")].into_iter().collect();
        let fixed: FixedValues = [("status", "active")].into_iter().collect();

        let request = ImportRequest::new(&params, &records, &mapping, &fixed);
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(body["records"][0]["VIN"], "1FT");
        assert_eq!(body["columnMapping"]["VIN"], "vin");
        assert_eq!(body["fixedValues"]["status"], "active");
        assert_eq!(body["scopeId"], "terminal-7");
        assert_eq!(body["updateExisting"], false);
        assert!(body.get("previewOnly").is_none());
        assert!(body.get("entityType").is_none());

        let body = serde_json::to_value(request.preview()).unwrap();
        assert_eq!(body["previewOnly"], true);
    }

    #[test]
    fn batch_envelope_tolerates_missing_details() {
        let envelope: BatchEnvelope =
            serde_json::from_str(r#"{"data": {"created": 2, "updated": 0, "errors": 0}}"#).unwrap();
        assert_eq!(envelope.data.created, 2);
        assert!(envelope.data.details.errors.is_empty());
    }
}
