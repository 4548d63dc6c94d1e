//! # HTTP Server Module
//!
//! JSON gateway over the key-value and document stores.
//!
//! # Endpoints
//!
//! - `/memory` - `GET ?key=` / `POST {key, value}` against the key-value store
//! - `/db` - `GET` with a `{startDate, endDate, minCount, maxCount}` body
//! - `/health` - Health check

pub mod db_routes;
pub mod health_routes;
pub mod memory_routes;
pub mod response;
pub mod server;

pub use db_routes::{DbError, DbQueryRequest};
pub use memory_routes::MemoryError;
pub use response::{DbQueryResult, MessageResponse};
pub use server::{HttpServer, Stores};
