//! Whole-store persistence in a single key of a string key-value store.
//!
//! Every save replaces the previous snapshot. There is no versioning or
//! migration: a slot that is missing or cannot be parsed reads as "no data".
//! Inside a readable slot, records that do not decode are skipped one by one.

use crate::config::STORAGE_KEY;
use crate::store::WorkoutStore;
use crate::workout::WorkoutSnapshot;
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;

/// Failure reported by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageError(String);

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Storage error: {}", self.0)
    }
}

impl std::error::Error for StorageError {}

/// String key-value storage, e.g. the browser's `localStorage`.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Volatile [`KeyValueStore`] backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

#[derive(Debug)]
pub enum PersistenceError {
    Serialize(serde_json::Error),
    Storage(StorageError),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialize(e) => write!(f, "Failed to serialize workouts: {}", e),
            PersistenceError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Serialize(e) => Some(e),
            PersistenceError::Storage(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialize(err)
    }
}

impl From<StorageError> for PersistenceError {
    fn from(err: StorageError) -> Self {
        PersistenceError::Storage(err)
    }
}

/// Maps a [`WorkoutStore`] to one snapshot slot.
#[derive(Debug)]
pub struct PersistenceGateway<S: KeyValueStore> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    /// Gateway using the default `"workouts"` key.
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Overwrite the slot with the full store.
    pub fn save(&mut self, store: &WorkoutStore) -> Result<(), PersistenceError> {
        let text = serde_json::to_string(&store.to_snapshot())?;
        self.backend.set_item(&self.key, &text)?;
        debug!("Saved {} workouts under '{}'", store.len(), self.key);
        Ok(())
    }

    /// Read the slot. `None` when it is absent or unreadable; records that
    /// fail to decode are dropped with a warning and the rest are returned.
    pub fn load(&self) -> Option<Vec<WorkoutSnapshot>> {
        let text = match self.backend.get_item(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read '{}': {}", self.key, e);
                return None;
            }
        };

        let records = match serde_json::from_str::<Option<Vec<serde_json::Value>>>(&text) {
            Ok(records) => records?,
            Err(e) => {
                debug!("Ignoring unreadable snapshot under '{}': {}", self.key, e);
                return None;
            }
        };

        let snapshots = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| {
                match serde_json::from_value::<WorkoutSnapshot>(record) {
                    Ok(snapshot) => Some(snapshot),
                    Err(e) => {
                        warn!("Skipping stored record {} under '{}': {}", index, self.key, e);
                        None
                    }
                }
            })
            .collect();
        Some(snapshots)
    }

    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.backend.remove_item(&self.key)?;
        Ok(())
    }
}
