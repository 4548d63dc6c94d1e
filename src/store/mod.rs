//! # Store Adapters
//!
//! The two external collaborators behind the gateway:
//!
//! - **Key-value store** (`KeyValueStore`): string get/set with no expiry,
//!   backed by Redis or by an in-process map.
//! - **Document store** (`DocumentStore`): inclusive range queries over
//!   `createdAt` / `totalCount`, backed by MongoDB or an in-process list.
//!
//! Handlers receive the stores as `Arc<dyn ...>` handles, so pooling and
//! per-call connection strategies are interchangeable.

pub mod document;
pub mod error;
pub mod filter;
pub mod kv;
pub mod model;
pub mod mongo;
pub mod redis_kv;

pub use document::{DocumentStore, InMemoryDocumentStore};
pub use error::{StoreError, StoreResult};
pub use filter::{parse_date, CreatedAtEncoding, RecordFilter, DATE_FORMAT};
pub use kv::{InMemoryKeyValueStore, KeyValueStore};
pub use model::{MemoryEntry, Record};
pub use mongo::{MongoDocumentStore, MongoSettings};
pub use redis_kv::RedisKeyValueStore;
