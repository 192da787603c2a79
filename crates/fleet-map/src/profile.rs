//! Saved mapping profiles.

use std::sync::Mutex;

use fleet_model::{ColumnMapping, MappingProfile};

use crate::error::{MappingError, Result};

/// Persistence for named column mappings.
///
/// Profiles are append-only: there is no update or delete. Loading returns
/// the exact mapping that was saved.
pub trait ProfileStore {
    /// Profiles saved for an entity type.
    fn list(&self, entity_type: &str) -> Result<Vec<MappingProfile>>;

    /// Saves a new profile and returns its id.
    fn save(&self, name: &str, entity_type: &str, mapping: &ColumnMapping) -> Result<String>;

    /// Loads one profile by id.
    fn load(&self, entity_type: &str, id: &str) -> Result<MappingProfile> {
        self.list(entity_type)?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| MappingError::ProfileNotFound {
                id: id.to_string(),
                entity_type: entity_type.to_string(),
            })
    }
}

impl<T: ProfileStore + ?Sized> ProfileStore for &T {
    fn list(&self, entity_type: &str) -> Result<Vec<MappingProfile>> {
        (**self).list(entity_type)
    }

    fn save(&self, name: &str, entity_type: &str, mapping: &ColumnMapping) -> Result<String> {
        (**self).save(name, entity_type, mapping)
    }

    fn load(&self, entity_type: &str, id: &str) -> Result<MappingProfile> {
        (**self).load(entity_type, id)
    }
}

/// Rejects blank profile names, returning the trimmed name.
pub fn validate_profile_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MappingError::EmptyProfileName);
    }
    Ok(name)
}

/// In-process profile store.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<Vec<MappingProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<MappingProfile>>> {
        self.profiles
            .lock()
            .map_err(|_| MappingError::ProfileStore("profile store lock poisoned".to_string()))
    }
}

impl ProfileStore for MemoryProfileStore {
    fn list(&self, entity_type: &str) -> Result<Vec<MappingProfile>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|p| p.entity_type == entity_type)
            .cloned()
            .collect())
    }

    fn save(&self, name: &str, entity_type: &str, mapping: &ColumnMapping) -> Result<String> {
        let name = validate_profile_name(name)?;
        let mut profiles = self.lock()?;
        let id = (profiles.len() + 1).to_string();
        profiles.push(MappingProfile {
            id: id.clone(),
            name: name.to_string(),
            entity_type: entity_type.to_string(),
            mapping: mapping.clone(),
        });
        tracing::info!(%id, name, entity_type, columns = mapping.len(), "saved mapping profile");
        Ok(id)
    }
}
