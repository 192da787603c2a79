//! HTTP client for the import service.
//!
//! One blocking `reqwest` client serves every external endpoint: field
//! catalog, import (preview and batches), mapping profiles and AI
//! suggestions.

use std::time::Duration;

use fleet_map::{
    FieldCatalog, MappingError, ProfileStore, SuggestError, SuggestRequest, SuggestionService,
    validate_profile_name,
};
use fleet_model::{ColumnMapping, MappingProfile, PreviewResult, TargetField, deserialize_id};
use reqwest::Url;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::endpoint::{
    BatchEnvelope, BatchReport, ImportEndpoint, ImportRequest, PreviewEnvelope,
};
use crate::error::{Result, TransportError};

/// Longest server error body kept in a [`TransportError::Status`].
const MAX_ERROR_BODY: usize = 300;

/// Lists arrive either bare or wrapped in `{ data: [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListPayload<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListPayload<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { data: items } => items,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveProfileBody<'a> {
    name: &'a str,
    entity_type: &'a str,
    mapping: &'a ColumnMapping,
}

#[derive(Deserialize)]
struct SavedProfile {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
}

#[derive(Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    mapping: ColumnMapping,
}

/// Blocking client for the import service.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TransportError::Config(format!("invalid base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::Config(format!(
                "base URL cannot carry paths: {base_url}"
            )));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL extended by path segments and query pairs.
    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| TransportError::Config("base URL cannot carry paths".into()))?;
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Download link for the CSV template of an entity type.
    pub fn template_url(&self, entity_type: &str) -> Result<Url> {
        self.url(&["template"], &[("entityType", entity_type)])
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent())
            .header(ACCEPT, "application/json")
            .send()?;
        read_json(response)
    }

    fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T> {
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .header(USER_AGENT, user_agent())
            .header(ACCEPT, "application/json")
            .json(body)
            .send()?;
        read_json(response)
    }
}

fn user_agent() -> String {
    format!("fleet-import/{}", env!("CARGO_PKG_VERSION"))
}

/// Checks the status and decodes the body, keeping decoding errors apart
/// from transport errors.
fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        let mut message: String = body.chars().take(MAX_ERROR_BODY).collect();
        if message.trim().is_empty() {
            message = status.canonical_reason().unwrap_or("no response body").to_string();
        }
        return Err(TransportError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(serde_json::from_str(&body)?)
}

impl ImportEndpoint for HttpClient {
    fn preview(&self, request: &ImportRequest<'_>) -> Result<PreviewResult> {
        let url = self.url(&["import", request.entity_type], &[])?;
        let envelope: PreviewEnvelope = self.post_json(url, request)?;
        if !envelope.preview {
            tracing::warn!("preview response is missing the preview flag");
        }
        Ok(envelope.data)
    }

    fn submit_batch(&self, request: &ImportRequest<'_>) -> Result<BatchReport> {
        let url = self.url(&["import", request.entity_type], &[])?;
        let envelope: BatchEnvelope = self.post_json(url, request)?;
        Ok(envelope.data)
    }
}

impl FieldCatalog for HttpClient {
    fn fields(&self, entity_type: &str) -> fleet_map::Result<Vec<TargetField>> {
        let load = || -> Result<Vec<TargetField>> {
            let url = self.url(&["fields"], &[("entityType", entity_type)])?;
            let payload: ListPayload<TargetField> = self.get_json(url)?;
            Ok(payload.into_vec())
        };
        load().map_err(|e| MappingError::Catalog(e.to_string()))
    }
}

impl ProfileStore for HttpClient {
    fn list(&self, entity_type: &str) -> fleet_map::Result<Vec<MappingProfile>> {
        let load = || -> Result<Vec<MappingProfile>> {
            let url = self.url(&["mappings"], &[("entityType", entity_type)])?;
            let payload: ListPayload<MappingProfile> = self.get_json(url)?;
            Ok(payload.into_vec())
        };
        let mut profiles = load().map_err(|e| MappingError::ProfileStore(e.to_string()))?;
        for profile in &mut profiles {
            if profile.entity_type.is_empty() {
                profile.entity_type = entity_type.to_string();
            }
        }
        Ok(profiles)
    }

    fn save(
        &self,
        name: &str,
        entity_type: &str,
        mapping: &ColumnMapping,
    ) -> fleet_map::Result<String> {
        let name = validate_profile_name(name)?;
        let store = || -> Result<String> {
            let url = self.url(&["mappings"], &[])?;
            let body = SaveProfileBody {
                name,
                entity_type,
                mapping,
            };
            let saved: SavedProfile = self.post_json(url, &body)?;
            Ok(saved.id)
        };
        store().map_err(|e| MappingError::ProfileStore(e.to_string()))
    }
}

impl SuggestionService for HttpClient {
    fn suggest(
        &self,
        request: &SuggestRequest,
    ) -> std::result::Result<ColumnMapping, SuggestError> {
        let ask = || -> Result<ColumnMapping> {
            let url = self.url(&["suggest-mapping"], &[])?;
            let response: SuggestResponse = self.post_json(url, request)?;
            Ok(response.mapping)
        };
        ask().map_err(|e| SuggestError::Service(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn builds_endpoint_urls() {
        let client = client("https://fleet.example.com/api/");
        assert_eq!(
            client.url(&["import", "trucks"], &[]).unwrap().as_str(),
            "https://fleet.example.com/api/import/trucks"
        );
        assert_eq!(
            client.template_url("driver pay").unwrap().as_str(),
            "https://fleet.example.com/api/template?entityType=driver+pay"
        );
    }

    #[test]
    fn base_url_without_trailing_slash() {
        let client = client("https://fleet.example.com/api");
        assert_eq!(
            client.url(&["mappings"], &[("entityType", "loads")]).unwrap().as_str(),
            "https://fleet.example.com/api/mappings?entityType=loads"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            HttpClient::new("not a url", Duration::from_secs(1)),
            Err(TransportError::Config(_))
        ));
        assert!(matches!(
            HttpClient::new("mailto:ops@example.com", Duration::from_secs(1)),
            Err(TransportError::Config(_))
        ));
    }

    #[test]
    fn list_payload_accepts_both_shapes() {
        let bare: ListPayload<MappingProfile> =
            serde_json::from_str(r#"[{"id": 1, "name": "A", "mapping": {}}]"#).unwrap();
        let wrapped: ListPayload<MappingProfile> =
            serde_json::from_str(r#"{"data": [{"id": "x", "name": "B", "mapping": {}}]}"#).unwrap();
        assert_eq!(bare.into_vec()[0].id, "1");
        assert_eq!(wrapped.into_vec()[0].id, "x");
    }
}
