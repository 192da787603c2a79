//! Dry-run preview.

use fleet_model::{ColumnMapping, FixedValues, ImportParams, PreviewResult, Record};

use crate::endpoint::{ImportEndpoint, ImportRequest};
use crate::error::Result;

/// Sends every record in one preview-only request.
///
/// One round trip, never retried: any transport, status or decoding error
/// is returned as is and there is no partial preview.
pub fn preview<E: ImportEndpoint + ?Sized>(
    endpoint: &E,
    records: &[Record],
    mapping: &ColumnMapping,
    fixed: &FixedValues,
    params: &ImportParams,
) -> Result<PreviewResult> {
    let request = ImportRequest::new(params, records, mapping, fixed).preview();
    tracing::info!(
        entity_type = %params.entity_type,
        rows = records.len(),
        "requesting import preview"
    );

    let result = endpoint.preview(&request)?;
    if !result.is_consistent() {
        tracing::warn!(
            total = result.total_rows,
            valid = result.valid_count,
            warnings = result.warning_count,
            invalid = result.invalid_count,
            "preview counts do not add up to the total"
        );
    }
    tracing::info!(
        valid = result.valid_count,
        warnings = result.warning_count,
        invalid = result.invalid_count,
        "preview complete"
    );
    Ok(result)
}
