//! Field catalog: the target schema of each entity type.

use std::collections::{BTreeMap, HashSet};

use fleet_model::TargetField;

use crate::error::{MappingError, Result};

/// Source of target field definitions per entity type.
pub trait FieldCatalog {
    /// Target fields for `entity_type`, in catalog order.
    ///
    /// Implementations may return duplicate keys; callers run the result
    /// through [`dedupe_fields`].
    fn fields(&self, entity_type: &str) -> Result<Vec<TargetField>>;
}

impl<T: FieldCatalog + ?Sized> FieldCatalog for &T {
    fn fields(&self, entity_type: &str) -> Result<Vec<TargetField>> {
        (**self).fields(entity_type)
    }
}

/// Removes repeated keys, keeping the first definition of each.
///
/// Order of the surviving fields is preserved, so applying this twice
/// yields the same list as applying it once.
pub fn dedupe_fields(fields: &[TargetField]) -> Vec<TargetField> {
    let mut seen = HashSet::new();
    fields
        .iter()
        .filter(|field| seen.insert(field.key.as_str()))
        .cloned()
        .collect()
}

/// In-memory catalog keyed by entity type.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entities: BTreeMap<String, Vec<TargetField>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the fields of one entity type, replacing any previous list.
    #[must_use]
    pub fn with_entity(mut self, entity_type: impl Into<String>, fields: Vec<TargetField>) -> Self {
        self.entities.insert(entity_type.into(), fields);
        self
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }
}

impl FieldCatalog for StaticCatalog {
    fn fields(&self, entity_type: &str) -> Result<Vec<TargetField>> {
        self.entities
            .get(entity_type)
            .cloned()
            .ok_or_else(|| MappingError::Catalog(format!("unknown entity type: {entity_type}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_model::FieldType;

    #[test]
    fn dedupe_keeps_first_definition() {
        let fields = vec![
            TargetField::new("driverNumber", "Driver Number", FieldType::String)
                .with_required(true),
            TargetField::new("name", "Name", FieldType::String),
            TargetField::new("driverNumber", "Driver number", FieldType::Int),
        ];
        let deduped = dedupe_fields(&fields);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].label, "Driver Number");
        assert!(deduped[0].required);
        assert_eq!(deduped[1].key, "name");
    }

    #[test]
    fn static_catalog_rejects_unknown_entity() {
        let catalog = StaticCatalog::new().with_entity("drivers", vec![]);
        assert!(catalog.fields("drivers").unwrap().is_empty());
        assert!(matches!(catalog.fields("loads"), Err(MappingError::Catalog(_))));
    }
}
