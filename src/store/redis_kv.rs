//! Redis-backed [`KeyValueStore`].
//!
//! A multiplexed connection is opened per call and dropped when the call
//! returns. Every call runs under the configured deadline.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use super::error::{StoreError, StoreResult};
use super::kv::KeyValueStore;
use super::model::MemoryEntry;

const STORE_NAME: &str = "key-value store";

pub struct RedisKeyValueStore {
    client: redis::Client,
    timeout: Duration,
}

impl RedisKeyValueStore {
    /// Create a store for the given `redis://` URL
    ///
    /// Only the URL is validated here; no connection is made until the
    /// first call.
    pub fn open(url: &str, timeout: Duration) -> StoreResult<Self> {
        let client =
            redis::Client::open(url).map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    async fn bounded<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        tokio::time::timeout(self.timeout, op)
            .await
            .map_err(|_| StoreError::Timeout {
                store: STORE_NAME,
                after: self.timeout,
            })?
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.bounded(async {
            let mut conn = self.client.get_multiplexed_async_connection().await?;
            conn.set::<_, _, ()>(key, value).await?;
            Ok(())
        })
        .await
    }

    async fn get(&self, key: &str) -> StoreResult<MemoryEntry> {
        self.bounded(async {
            let mut conn = self.client.get_multiplexed_async_connection().await?;
            let value: Option<String> = conn.get(key).await?;
            value
                .map(|value| MemoryEntry::new(key, value))
                .ok_or_else(|| StoreError::NotFound(key.to_string()))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_bad_url() {
        let result = RedisKeyValueStore::open("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }

    #[tokio::test]
    async fn test_refused_connection_maps_to_connection_error() {
        let store =
            RedisKeyValueStore::open("redis://127.0.0.1:1/0", Duration::from_secs(5)).unwrap();

        assert!(matches!(
            store.get("key").await,
            Err(StoreError::Connection(_))
        ));
        assert!(matches!(
            store.set("key", "value").await,
            Err(StoreError::Connection(_))
        ));
    }

    #[test]
    fn test_open_is_lazy() {
        // Nothing listens on port 1; opening must still succeed.
        let result = RedisKeyValueStore::open("redis://127.0.0.1:1/0", Duration::from_secs(1));
        assert!(result.is_ok());
    }
}
