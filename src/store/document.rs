//! # Document Store
//!
//! `DocumentStore` runs the compound range query behind `/db`. Results come
//! back in the store's natural iteration order; an empty result is a
//! success.

use std::sync::RwLock;

use async_trait::async_trait;

use super::error::{StoreError, StoreResult};
use super::filter::RecordFilter;
use super::model::Record;

/// Read-only record source
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return every record matching `filter`
    async fn query(&self, filter: &RecordFilter) -> StoreResult<Vec<Record>>;

    /// Release any resources held by the store
    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Process-local document store, seeded up front
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    records: RwLock<Vec<Record>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Append a record; insertion order is the iteration order
    pub fn insert(&self, record: Record) -> StoreResult<()> {
        self.records
            .write()
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .push(record);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn query(&self, filter: &RecordFilter) -> StoreResult<Vec<Record>> {
        let records = self
            .records
            .read()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}
