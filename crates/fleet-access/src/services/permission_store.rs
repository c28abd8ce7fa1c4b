// ============================================================================
// Fleet Access - Permission Store
// File: crates/fleet-access/src/services/permission_store.rs
// Description: Cached access to the persisted permission override map
// ============================================================================
//! Loads the override map once, serves it from memory, and refreshes the
//! cache whenever it is saved or cleared through this store.

use std::sync::Arc;

use fleet_shared::constants::PERMISSIONS_STORAGE_KEY;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::domain::PermissionOverrides;
use crate::error::AccessError;
use crate::storage::LocalStorage;

pub struct PermissionStore {
    storage: Arc<dyn LocalStorage>,
    /// Outer `None`: not loaded yet. Inner `None`: loaded, no usable data.
    cache: RwLock<Option<Option<Arc<PermissionOverrides>>>>,
}

impl PermissionStore {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            storage,
            cache: RwLock::new(None),
        }
    }

    /// Current override map, or `None` when nothing usable is stored.
    ///
    /// Read and parse failures are logged and reported as `None`; they never
    /// reach the caller.
    pub fn load(&self) -> Option<Arc<PermissionOverrides>> {
        if let Some(cached) = self.cache.read().as_ref() {
            return cached.clone();
        }

        let loaded = self.read_from_storage();
        *self.cache.write() = Some(loaded.clone());
        loaded
    }

    pub fn save(&self, overrides: PermissionOverrides) -> Result<(), AccessError> {
        let raw = serde_json::to_string(&overrides)?;
        self.storage.set_item(PERMISSIONS_STORAGE_KEY, &raw)?;

        info!("Saved permission overrides for {} roles", overrides.roles().count());
        *self.cache.write() = Some(Some(Arc::new(overrides)));
        Ok(())
    }

    /// Applies `edit` to the current map (or an empty one) and saves the result.
    pub fn update<F>(&self, edit: F) -> Result<PermissionOverrides, AccessError>
    where
        F: FnOnce(&mut PermissionOverrides),
    {
        let mut overrides = self
            .load()
            .map(|current| current.as_ref().clone())
            .unwrap_or_default();
        edit(&mut overrides);
        self.save(overrides.clone())?;
        Ok(overrides)
    }

    pub fn clear(&self) -> Result<(), AccessError> {
        self.storage.remove_item(PERMISSIONS_STORAGE_KEY)?;
        info!("Cleared permission overrides");
        *self.cache.write() = Some(None);
        Ok(())
    }

    /// Forces the next `load` to go back to storage.
    pub fn invalidate(&self) {
        *self.cache.write() = None;
    }

    fn read_from_storage(&self) -> Option<Arc<PermissionOverrides>> {
        let raw = match self.storage.get_item(PERMISSIONS_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No permission overrides stored");
                return None;
            }
            Err(e) => {
                warn!("Failed to read permission overrides, using static roles: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<PermissionOverrides>(&raw) {
            Ok(overrides) => {
                debug!("Loaded permission overrides for {} roles", overrides.roles().count());
                Some(Arc::new(overrides))
            }
            Err(e) => {
                warn!("Malformed permission overrides, using static roles: {}", e);
                None
            }
        }
    }
}
