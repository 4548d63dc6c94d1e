//! # Store Errors
//!
//! Error taxonomy shared by the key-value and document store adapters.

use std::time::Duration;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the store adapters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The requested key does not exist
    #[error("key not found: {0}")]
    NotFound(String),

    /// The store could not be reached
    #[error("connection error: {0}")]
    Connection(String),

    /// The operation did not finish within its deadline
    #[error("{store} timed out after {}ms", .after.as_millis())]
    Timeout {
        store: &'static str,
        after: Duration,
    },

    /// The store rejected or failed the query
    #[error("query error: {0}")]
    Query(String),

    /// A returned document could not be decoded into a record
    #[error("decode error: {0}")]
    Decode(String),

    /// Releasing the store's resources failed
    #[error("shutdown error: {0}")]
    Shutdown(String),
}

impl StoreError {
    /// Whether this is the distinguished not-found case
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
            StoreError::Connection(err.to_string())
        } else {
            StoreError::Query(err.to_string())
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match *err.kind {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. } => StoreError::Connection(err.to_string()),
            ErrorKind::BsonDeserialization(_) => StoreError::Decode(err.to_string()),
            _ => StoreError::Query(err.to_string()),
        }
    }
}
