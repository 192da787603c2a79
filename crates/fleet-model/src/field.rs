//! Target field definitions supplied by the field catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Declared type of a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    #[serde(alias = "String", alias = "text", alias = "str")]
    String,
    #[serde(alias = "Int", alias = "integer", alias = "Integer")]
    Int,
    #[serde(
        alias = "Float",
        alias = "number",
        alias = "double",
        alias = "decimal"
    )]
    Float,
    #[serde(alias = "Boolean", alias = "bool", alias = "Bool")]
    Boolean,
    #[serde(
        rename = "datetime",
        alias = "DateTime",
        alias = "date",
        alias = "timestamp"
    )]
    DateTime,
}

impl FieldType {
    /// Parse a field type from a catalog string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "text" | "str" => Some(Self::String),
            "int" | "integer" => Some(Self::Int),
            "float" | "number" | "double" | "decimal" => Some(Self::Float),
            "boolean" | "bool" => Some(Self::Boolean),
            "datetime" | "date" | "timestamp" => Some(Self::DateTime),
            _ => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::DateTime => "DateTime",
        }
    }

    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ModelError::UnknownFieldType(s.to_string()))
    }
}

/// One destination schema attribute an import can populate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetField {
    /// Stable field key sent to the import endpoint.
    pub key: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Whether an import cannot proceed without a value for this field.
    #[serde(default)]
    pub required: bool,
    /// Declared value type.
    #[serde(default, rename = "type")]
    pub field_type: FieldType,
    /// Header names commonly used for this field in customer spreadsheets.
    #[serde(default)]
    pub suggested_headers: Vec<String>,
}

impl TargetField {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            required: false,
            field_type,
            suggested_headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_suggested_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggested_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Label for display, falling back to the key.
    pub fn display_name(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!(FieldType::parse("Integer"), Some(FieldType::Int));
        assert_eq!(FieldType::parse("number"), Some(FieldType::Float));
        assert_eq!(FieldType::parse(" BOOL "), Some(FieldType::Boolean));
        assert_eq!(FieldType::parse("date"), Some(FieldType::DateTime));
        assert_eq!(FieldType::parse("blob"), None);
        assert!("blob".parse::<FieldType>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&FieldType::DateTime).unwrap();
        assert_eq!(json, "\"datetime\"");
        let parsed: FieldType = serde_json::from_str("\"Boolean\"").unwrap();
        assert_eq!(parsed, FieldType::Boolean);
    }

    #[test]
    fn display_name_falls_back_to_key() {
        let field = TargetField::new("vin", "", FieldType::String);
        assert_eq!(field.display_name(), "vin");
        let field = TargetField::new("vin", "VIN", FieldType::String);
        assert_eq!(field.display_name(), "VIN");
    }
}
