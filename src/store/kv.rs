//! # Key-Value Store
//!
//! `KeyValueStore` is the seam between the `/memory` handler and the backing
//! key-value service. Values never expire; a `set` overwrites silently and a
//! `get` that follows it observes the new value.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::error::{StoreError, StoreResult};
use super::model::MemoryEntry;

/// String key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key` with no expiration
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Fetch the entry for `key`, or `StoreError::NotFound`
    async fn get(&self, key: &str) -> StoreResult<MemoryEntry>;
}

/// Process-local key-value store
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys, read through a poisoned lock if needed
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<MemoryEntry> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        entries
            .get(key)
            .map(|value| MemoryEntry::new(key, value.clone()))
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}
