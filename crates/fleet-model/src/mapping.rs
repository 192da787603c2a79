//! Column mappings, fixed-value overrides, and saved mapping profiles.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

/// Source header → target field key.
///
/// Each header maps to at most one target. Several headers may point at the
/// same target; callers decide whether that matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: BTreeMap<String, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target key for a header, if mapped.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.entries.get(header).map(String::as_str)
    }

    /// Maps `header` to `key`, returning the previous target.
    pub fn set(&mut self, header: impl Into<String>, key: impl Into<String>) -> Option<String> {
        self.entries.insert(header.into(), key.into())
    }

    /// Unmaps `header`, returning the previous target.
    pub fn clear(&mut self, header: &str) -> Option<String> {
        self.entries.remove(header)
    }

    pub fn contains_header(&self, header: &str) -> bool {
        self.entries.contains_key(header)
    }

    /// True when at least one header maps to `key`.
    pub fn is_target_mapped(&self, key: &str) -> bool {
        self.entries.values().any(|v| v == key)
    }

    /// Headers mapped to `key`, in header order.
    pub fn headers_for(&self, key: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, v)| v.as_str() == key)
            .map(|(h, _)| h.as_str())
            .collect()
    }

    /// Distinct target keys.
    pub fn targets(&self) -> BTreeSet<&str> {
        self.entries.values().map(String::as_str).collect()
    }

    /// Targets claimed by more than one header, with those headers.
    pub fn duplicate_targets(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut by_target: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (header, key) in &self.entries {
            by_target.entry(key.as_str()).or_default().push(header.as_str());
        }
        by_target.retain(|_, headers| headers.len() > 1);
        by_target
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(h, k)| (h.as_str(), k.as_str()))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.entries.retain(|h, k| keep(h, k));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: Into<String>, K: Into<String>> FromIterator<(H, K)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (H, K)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(h, k)| (h.into(), k.into()))
                .collect(),
        }
    }
}

/// Target field key → literal default used when no column supplies the field.
///
/// Blank values are never stored: setting one clears the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedValues {
    values: BTreeMap<String, String>,
}

impl FixedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a literal for `key`; a blank value removes the entry instead.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if value.trim().is_empty() {
            self.values.remove(&key)
        } else {
            self.values.insert(key, value)
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FixedValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (k, v) in iter {
            values.set(k, v);
        }
        values
    }
}

/// A named, reusable column mapping for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingProfile {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub mapping: ColumnMapping,
}

/// Profile ids arrive as strings from some backends and integers from others.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(i64),
}

/// Deserializes an id that may be encoded as a JSON string or integer.
pub fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(s) => s,
        IdRepr::Number(n) => n.to_string(),
    })
}
