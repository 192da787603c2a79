//! Deterministic local mapping pass.

use fleet_model::{ColumnMapping, TargetField};

use crate::catalog::dedupe_fields;
use crate::error::{MappingError, Result};
use crate::normalize::{normalize_identifier, normalize_simple};

/// Minimum normalized length for substring containment to count.
const SUBSTRING_MIN_LEN: usize = 4;

/// Rule that matched a header to a target field, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchRule {
    /// Header and key are equal after simple normalization.
    Exact,
    /// Header and key are equal after identifier normalization.
    Identifier,
    /// One normalized form contains the other.
    Substring,
    /// Header appears in the field's suggested headers.
    SuggestedHeader,
}

impl MatchRule {
    pub const ALL: [Self; 4] = [
        Self::Exact,
        Self::Identifier,
        Self::Substring,
        Self::SuggestedHeader,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Exact => "exact match",
            Self::Identifier => "identifier match",
            Self::Substring => "partial match",
            Self::SuggestedHeader => "known header",
        }
    }
}

/// Normalized forms of one target field, computed once per engine.
#[derive(Debug, Clone)]
struct FieldPattern {
    simple: String,
    identifier: String,
    suggested_simple: Vec<String>,
    suggested_identifier: Vec<String>,
}

impl FieldPattern {
    fn new(field: &TargetField) -> Self {
        Self {
            simple: normalize_simple(&field.key),
            identifier: normalize_identifier(&field.key),
            suggested_simple: field
                .suggested_headers
                .iter()
                .map(|h| normalize_simple(h))
                .collect(),
            suggested_identifier: field
                .suggested_headers
                .iter()
                .map(|h| normalize_identifier(h))
                .collect(),
        }
    }

    fn matches(&self, rule: MatchRule, simple: &str, identifier: &str) -> bool {
        match rule {
            MatchRule::Exact => !simple.is_empty() && simple == self.simple,
            MatchRule::Identifier => !identifier.is_empty() && identifier == self.identifier,
            MatchRule::Substring => {
                simple.chars().count() >= SUBSTRING_MIN_LEN
                    && self.simple.chars().count() >= SUBSTRING_MIN_LEN
                    && (simple.contains(self.simple.as_str()) || self.simple.contains(simple))
            }
            MatchRule::SuggestedHeader => {
                (!simple.is_empty() && self.suggested_simple.iter().any(|s| s == simple))
                    || (!identifier.is_empty()
                        && self.suggested_identifier.iter().any(|s| s == identifier))
            }
        }
    }
}

/// Matches source headers against a deduplicated field catalog.
#[derive(Debug, Clone)]
pub struct MappingEngine {
    fields: Vec<TargetField>,
    patterns: Vec<FieldPattern>,
}

impl MappingEngine {
    /// Builds an engine over `fields`, dropping repeated keys.
    pub fn new(fields: &[TargetField]) -> Self {
        let fields = dedupe_fields(fields);
        let patterns = fields.iter().map(FieldPattern::new).collect();
        Self { fields, patterns }
    }

    /// The deduplicated catalog in catalog order.
    pub fn fields(&self) -> &[TargetField] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&TargetField> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Best target for one header.
    ///
    /// Rules are tried in priority order over the whole catalog; within a
    /// rule the first field in catalog order wins.
    pub fn match_header(&self, header: &str) -> Option<(&TargetField, MatchRule)> {
        let simple = normalize_simple(header);
        let identifier = normalize_identifier(header);
        MatchRule::ALL.into_iter().find_map(|rule| {
            self.patterns
                .iter()
                .position(|p| p.matches(rule, &simple, &identifier))
                .map(|idx| (&self.fields[idx], rule))
        })
    }

    /// Rule by which `header` matches the field `key`, if any.
    pub fn rule_for(&self, header: &str, key: &str) -> Option<MatchRule> {
        let idx = self.fields.iter().position(|f| f.key == key)?;
        let simple = normalize_simple(header);
        let identifier = normalize_identifier(header);
        MatchRule::ALL
            .into_iter()
            .find(|&rule| self.patterns[idx].matches(rule, &simple, &identifier))
    }

    /// Runs the local pass over every header.
    ///
    /// Headers without a match are left out of the mapping. Several headers
    /// may land on the same target.
    pub fn compute<S: AsRef<str>>(&self, headers: &[S]) -> ColumnMapping {
        let mut mapping = ColumnMapping::new();
        for header in headers {
            let header = header.as_ref();
            if let Some((field, rule)) = self.match_header(header) {
                tracing::trace!(header, target = %field.key, rule = rule.label(), "matched column");
                mapping.set(header, field.key.clone());
            }
        }
        tracing::debug!(
            headers = headers.len(),
            mapped = mapping.len(),
            "computed local mapping"
        );
        mapping
    }

    /// Sets or clears the mapping of one header.
    ///
    /// Other headers are never touched, even when they already point at the
    /// same target. Returns the previous target of `header`.
    pub fn assign<S: AsRef<str>>(
        &self,
        mapping: &mut ColumnMapping,
        headers: &[S],
        header: &str,
        key: Option<&str>,
    ) -> Result<Option<String>> {
        if !headers.iter().any(|h| h.as_ref() == header) {
            return Err(MappingError::UnknownHeader(header.to_string()));
        }
        match key {
            Some(key) => {
                if !self.contains_key(key) {
                    return Err(MappingError::UnknownTarget(key.to_string()));
                }
                Ok(mapping.set(header, key))
            }
            None => Ok(mapping.clear(header)),
        }
    }
}

/// Local pass over `headers` against `fields`.
///
/// Pure and deterministic; the catalog is deduplicated first.
pub fn compute_mapping<S: AsRef<str>>(headers: &[S], fields: &[TargetField]) -> ColumnMapping {
    MappingEngine::new(fields).compute(headers)
}
