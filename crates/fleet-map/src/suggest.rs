//! AI-assisted mapping suggestions.
//!
//! The suggestion service is a soft dependency. Whatever it returns is
//! filtered against the catalog and merged on top of the local mapping;
//! when it fails the local mapping is used unchanged.

use fleet_model::{ColumnMapping, Record};
use serde::{Deserialize, Serialize};

use crate::engine::MappingEngine;
use crate::error::SuggestError;

/// Which headers are sent to the suggestion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestScope {
    /// Only headers the local pass left unmapped (runs after every upload).
    #[default]
    UnmappedOnly,
    /// Every header is sent for context, but suggestions only fill headers
    /// the local pass left unmapped (explicit auto-map).
    AllHeaders,
}

/// What the suggestion service gets to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestMode {
    /// Header names only.
    #[default]
    HeadersOnly,
    /// Header names plus the first few rows of values.
    WithSample,
}

/// Options for one suggestion round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestOptions {
    pub scope: SuggestScope,
    pub mode: SuggestMode,
    /// Rows included when `mode` is [`SuggestMode::WithSample`].
    pub sample_rows: usize,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            scope: SuggestScope::UnmappedOnly,
            mode: SuggestMode::HeadersOnly,
            sample_rows: 3,
        }
    }
}

impl SuggestOptions {
    #[must_use]
    pub fn with_scope(mut self, scope: SuggestScope) -> Self {
        self.scope = scope;
        self
    }
}

/// Payload sent to the suggestion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub headers: Vec<String>,
    pub entity_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Vec<Record>>,
}

/// Suggests a target key for source headers.
pub trait SuggestionService {
    fn suggest(&self, request: &SuggestRequest) -> Result<ColumnMapping, SuggestError>;
}

impl<T: SuggestionService + ?Sized> SuggestionService for &T {
    fn suggest(&self, request: &SuggestRequest) -> Result<ColumnMapping, SuggestError> {
        (**self).suggest(request)
    }
}

/// A suggestion service that is never available.
///
/// Mapping with this service yields exactly the local mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuggestions;

impl SuggestionService for NoSuggestions {
    fn suggest(&self, _request: &SuggestRequest) -> Result<ColumnMapping, SuggestError> {
        Err(SuggestError::Unavailable)
    }
}

/// Builds the request for one suggestion round, or `None` when there is
/// nothing to ask about.
pub fn build_request<S: AsRef<str>>(
    local: &ColumnMapping,
    headers: &[S],
    entity_type: &str,
    sample: &[Record],
    options: SuggestOptions,
) -> Option<SuggestRequest> {
    let requested: Vec<String> = headers
        .iter()
        .map(AsRef::as_ref)
        .filter(|h| options.scope == SuggestScope::AllHeaders || !local.contains_header(h))
        .map(str::to_string)
        .collect();
    if requested.is_empty() {
        return None;
    }

    let sample = match options.mode {
        SuggestMode::HeadersOnly => None,
        SuggestMode::WithSample => Some(
            sample
                .iter()
                .take(options.sample_rows)
                .map(|record| {
                    Record::from_pairs(
                        record.row(),
                        requested
                            .iter()
                            .map(|h| (h.clone(), record.value(h).to_string())),
                    )
                })
                .collect(),
        ),
    };

    Some(SuggestRequest {
        headers: requested,
        entity_type: entity_type.to_string(),
        sample,
    })
}

/// Merges suggestion results into the local mapping.
///
/// Only pairs whose header was requested, is not already mapped locally
/// and whose key exists in the catalog are kept.
pub fn merge_suggestions(
    local: &ColumnMapping,
    request: &SuggestRequest,
    suggested: &ColumnMapping,
    engine: &MappingEngine,
) -> ColumnMapping {
    let mut merged = local.clone();
    for (header, key) in suggested.iter() {
        if !request.headers.iter().any(|h| h == header) {
            tracing::debug!(header, "ignoring suggestion for a header that was not requested");
            continue;
        }
        if local.contains_header(header) {
            tracing::debug!(header, key, "keeping local match over suggestion");
            continue;
        }
        if !engine.contains_key(key) {
            tracing::debug!(header, key, "ignoring suggestion for an unknown target field");
            continue;
        }
        merged.set(header, key);
    }
    merged
}

/// Runs one suggestion round on top of `local`.
///
/// Never fails: a service error is logged and `local` is returned as is.
pub fn apply_suggestions<S: AsRef<str>>(
    service: &dyn SuggestionService,
    local: &ColumnMapping,
    headers: &[S],
    engine: &MappingEngine,
    entity_type: &str,
    sample: &[Record],
    options: SuggestOptions,
) -> ColumnMapping {
    let Some(request) = build_request(local, headers, entity_type, sample, options) else {
        return local.clone();
    };

    match service.suggest(&request) {
        Ok(suggested) => {
            let merged = merge_suggestions(local, &request, &suggested, engine);
            tracing::info!(
                requested = request.headers.len(),
                returned = suggested.len(),
                mapped = merged.len(),
                "applied mapping suggestions"
            );
            merged
        }
        Err(SuggestError::Unavailable) => {
            tracing::debug!("no suggestion service; keeping local mapping");
            local.clone()
        }
        Err(error) => {
            tracing::warn!(%error, "mapping suggestions failed; keeping local mapping");
            local.clone()
        }
    }
}

/// Local pass followed by one suggestion round over the unmapped headers.
pub fn auto_map<S: AsRef<str>>(
    service: &dyn SuggestionService,
    headers: &[S],
    engine: &MappingEngine,
    entity_type: &str,
    sample: &[Record],
    options: SuggestOptions,
) -> ColumnMapping {
    let local = engine.compute(headers);
    apply_suggestions(service, &local, headers, engine, entity_type, sample, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_model::{FieldType, TargetField};

    struct Fixed(ColumnMapping);

    impl SuggestionService for Fixed {
        fn suggest(&self, _request: &SuggestRequest) -> Result<ColumnMapping, SuggestError> {
            Ok(self.0.clone())
        }
    }

    fn engine() -> MappingEngine {
        MappingEngine::new(&[
            TargetField::new("loadId", "Load ID", FieldType::String),
            TargetField::new("rate", "Rate", FieldType::Float),
        ])
    }

    #[test]
    fn request_skips_mapped_headers() {
        let local: ColumnMapping = [("Load ID", "loadId")].into_iter().collect();
        let request = build_request(
            &local,
            &["Load ID", "Linehaul $"],
            "loads",
            &[],
            SuggestOptions::default(),
        )
        .unwrap();
        assert_eq!(request.headers, vec!["Linehaul $"]);
        assert!(request.sample.is_none());
    }

    #[test]
    fn sample_is_limited_to_requested_headers() {
        let records = vec![
            Record::from_pairs(1, [("Load ID", "L-1"), ("Linehaul $", "900")]),
            Record::from_pairs(2, [("Load ID", "L-2"), ("Linehaul $", "950")]),
        ];
        let local: ColumnMapping = [("Load ID", "loadId")].into_iter().collect();
        let options = SuggestOptions {
            mode: SuggestMode::WithSample,
            sample_rows: 1,
            ..SuggestOptions::default()
        };
        let request =
            build_request(&local, &["Load ID", "Linehaul $"], "loads", &records, options).unwrap();
        let sample = request.sample.unwrap();
        assert_eq!(sample.len(), 1);
        assert_eq!(sample[0].headers().collect::<Vec<_>>(), vec!["Linehaul $"]);
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let service = Fixed(
            [("Linehaul $", "rate"), ("Miles", "distance")]
                .into_iter()
                .collect(),
        );
        let headers = ["Load ID", "Linehaul $", "Miles"];
        let mapping = auto_map(
            &service,
            &headers,
            &engine(),
            "loads",
            &[],
            SuggestOptions::default(),
        );
        assert_eq!(mapping.get("Load ID"), Some("loadId"));
        assert_eq!(mapping.get("Linehaul $"), Some("rate"));
        assert!(!mapping.contains_header("Miles"));
    }

    #[test]
    fn failing_service_keeps_local_mapping() {
        let headers = ["Load ID", "Linehaul $"];
        let engine = engine();
        let local = engine.compute(&headers);
        let mapped = auto_map(
            &NoSuggestions,
            &headers,
            &engine,
            "loads",
            &[],
            SuggestOptions::default(),
        );
        assert_eq!(mapped, local);
    }

    #[test]
    fn all_headers_scope_keeps_local_matches() {
        let service = Fixed(
            [("Load ID", "rate"), ("Linehaul $", "rate")]
                .into_iter()
                .collect(),
        );
        let engine = engine();
        let headers = ["Load ID", "Linehaul $"];
        let options = SuggestOptions::default().with_scope(SuggestScope::AllHeaders);

        let request = build_request(&engine.compute(&headers), &headers, "loads", &[], options)
            .unwrap();
        assert_eq!(request.headers, vec!["Load ID", "Linehaul $"]);

        let local_only = auto_map(&NoSuggestions, &headers, &engine, "loads", &[], options);
        let mapped = auto_map(&service, &headers, &engine, "loads", &[], options);
        assert_eq!(local_only.get("Load ID"), Some("loadId"));
        assert_eq!(mapped.get("Load ID"), Some("loadId"));
        assert_eq!(mapped.get("Linehaul $"), Some("rate"));
    }

    #[test]
    fn request_serializes_camel_case() {
        let request = SuggestRequest {
            headers: vec!["Miles".into()],
            entity_type: "loads".into(),
            sample: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["entityType"], "loads");
        assert!(json.get("sample").is_none());
    }
}
