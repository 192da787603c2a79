//! Fixed-value defaults offered to the user.
//!
//! Defaults are only ever applied through an explicit action; validation
//! never fills them in on its own.

use chrono::{DateTime, SecondsFormat, Utc};
use fleet_model::{ColumnMapping, FieldType, FixedValues, TargetField};

use crate::error::{Result, ValidateError};
use crate::validate::is_satisfied;

/// Placeholder for text fields.
pub const TEXT_DEFAULT: &str = "N/A";

/// Default literal for a field type.
///
/// Date-time fields get `now` as an RFC 3339 timestamp, so the caller
/// decides which clock is used.
pub fn default_value(field_type: FieldType, now: DateTime<Utc>) -> String {
    match field_type {
        FieldType::String => TEXT_DEFAULT.to_string(),
        FieldType::Int | FieldType::Float => "0".to_string(),
        FieldType::Boolean => "false".to_string(),
        FieldType::DateTime => now.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

/// Sets the default for one field and returns the value used.
pub fn use_default(
    fixed: &mut FixedValues,
    fields: &[TargetField],
    key: &str,
    now: DateTime<Utc>,
) -> Result<String> {
    let field = fields
        .iter()
        .find(|f| f.key == key)
        .ok_or_else(|| ValidateError::UnknownField(key.to_string()))?;
    let value = default_value(field.field_type, now);
    fixed.set(key, value.clone());
    tracing::info!(key, value = %value, "applied default value");
    Ok(value)
}

/// Applies defaults to every required field that is still uncovered.
///
/// Returns the keys that were filled, in catalog order.
pub fn fill_required_defaults(
    fixed: &mut FixedValues,
    fields: &[TargetField],
    mapping: &ColumnMapping,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut filled = Vec::new();
    for field in fields.iter().filter(|f| f.required) {
        if is_satisfied(&field.key, mapping, fixed) {
            continue;
        }
        fixed.set(field.key.clone(), default_value(field.field_type, now));
        filled.push(field.key.clone());
    }
    if !filled.is_empty() {
        tracing::info!(count = filled.len(), "applied defaults to required fields");
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn defaults_per_type() {
        assert_eq!(default_value(FieldType::String, now()), "N/A");
        assert_eq!(default_value(FieldType::Int, now()), "0");
        assert_eq!(default_value(FieldType::Float, now()), "0");
        assert_eq!(default_value(FieldType::Boolean, now()), "false");
        assert_eq!(default_value(FieldType::DateTime, now()), "2024-03-01T12:30:00Z");
    }

    #[test]
    fn use_default_rejects_unknown_key() {
        let mut fixed = FixedValues::new();
        let err = use_default(&mut fixed, &[], "vin", now()).unwrap_err();
        assert_eq!(err, ValidateError::UnknownField("vin".into()));
        assert!(fixed.is_empty());
    }

    #[test]
    fn fill_skips_covered_and_optional_fields() {
        let fields = vec![
            TargetField::new("vin", "VIN", FieldType::String).with_required(true),
            TargetField::new("inService", "In service", FieldType::DateTime).with_required(true),
            TargetField::new("odometer", "Odometer", FieldType::Int),
        ];
        let mapping: ColumnMapping = [("VIN", "vin")].into_iter().collect();
        let mut fixed = FixedValues::new();

        let filled = fill_required_defaults(&mut fixed, &fields, &mapping, now());
        assert_eq!(filled, vec!["inService"]);
        assert_eq!(fixed.get("inService"), Some("2024-03-01T12:30:00Z"));
        assert!(!fixed.contains_key("odometer"));
    }
}
