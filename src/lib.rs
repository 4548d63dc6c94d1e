//! recordgate - a JSON gateway over a document store and a key-value store
//!
//! - `http_server`: `/memory` and `/db` handlers, response envelopes, server
//! - `store`: key-value and document store adapters (Redis, MongoDB, in-memory)
//! - `config`: JSON configuration file
//! - `observability`: tracing subscriber setup
//! - `cli`: `serve` and `check-config` commands

pub mod cli;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod store;
