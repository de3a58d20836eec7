//! Saving and loading the item collection under a single storage key.

use super::{Storage, StorageError, StorageResult};
use crate::config::STORAGE_KEY;
use crate::item::Item;

/// Serializes the board's items to one key of a [`Storage`] backend.
#[derive(Debug)]
pub struct BoardPersistence<S> {
    storage: S,
    key: String,
}

impl<S: Storage> BoardPersistence<S> {
    /// Persistence under the default `moodboard-items` key.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Serialize `items` and overwrite the stored value.
    pub fn save(&self, items: &[Item]) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(items)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(&self.key, &json)?;
        log::info!("Saved {} item(s) to '{}'", items.len(), self.key);
        Ok(())
    }

    /// Read the stored items.
    ///
    /// An absent key is an empty board. A value that does not parse as an
    /// item list is [`StorageError::Malformed`].
    pub fn load(&self) -> StorageResult<Vec<Item>> {
        let Some(json) = self.storage.get(&self.key)? else {
            log::debug!("No saved board under '{}'", self.key);
            return Ok(Vec::new());
        };
        let items: Vec<Item> =
            serde_json::from_str(&json).map_err(|e| StorageError::Malformed(e.to_string()))?;
        log::info!("Loaded {} item(s) from '{}'", items.len(), self.key);
        Ok(items)
    }

    /// Like [`load`](Self::load), but any failure yields an empty board.
    pub fn load_or_empty(&self) -> Vec<Item> {
        self.load().unwrap_or_else(|e| {
            log::warn!("Discarding saved board under '{}': {}", self.key, e);
            Vec::new()
        })
    }
}
