use serde::{Deserialize, Serialize};

/// Entity-specific parameters sent with every preview and batch request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportParams {
    /// Entity type being imported (driver, load, invoice, ...).
    pub entity_type: String,
    /// Organizational scope the imported rows belong to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
    /// Update rows that already exist instead of skipping them.
    #[serde(default)]
    pub update_existing: bool,
}

impl ImportParams {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope_id: impl Into<String>) -> Self {
        self.scope_id = Some(scope_id.into());
        self
    }

    #[must_use]
    pub fn with_update_existing(mut self, update_existing: bool) -> Self {
        self.update_existing = update_existing;
        self
    }
}
