//! Shared helpers for the HTTP contract tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use recordgate::config::ServerConfig;
use recordgate::http_server::{HttpServer, Stores};
use recordgate::store::{
    DocumentStore, KeyValueStore, MemoryEntry, Record, RecordFilter, StoreError, StoreResult,
};
use serde_json::Value;
use tower::ServiceExt;

/// Store that fails every call with the given error
pub struct FailingStore(pub StoreError);

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(self.0.clone())
    }

    async fn get(&self, _key: &str) -> StoreResult<MemoryEntry> {
        Err(self.0.clone())
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn query(&self, _filter: &RecordFilter) -> StoreResult<Vec<Record>> {
        Err(self.0.clone())
    }
}

pub fn router(stores: Stores) -> Router {
    HttpServer::with_config(ServerConfig::default(), stores).router()
}

pub fn router_with(
    kv: Arc<dyn KeyValueStore>,
    documents: Arc<dyn DocumentStore>,
) -> Router {
    router(Stores::new(kv, documents))
}

/// Send one request and return status plus decoded JSON body
pub async fn send(router: Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|err| panic!("failed to build request: {err}"));

    let response = match router.oneshot(request).await {
        Ok(response) => response,
        Err(err) => panic!("router request failed: {err}"),
    };

    let status = response.status();
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
        Some(&b"application/json"[..]),
        "every response must be JSON"
    );

    let bytes = match to_bytes(response.into_body(), 1024 * 1024).await {
        Ok(bytes) => bytes,
        Err(err) => panic!("failed to read response body: {err}"),
    };
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|err| panic!("response body is not JSON: {err}"));

    (status, value)
}
