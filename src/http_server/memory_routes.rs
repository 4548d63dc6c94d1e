//! Key-Value HTTP Routes
//!
//! `/memory`: `GET ?key=<k>` reads a value, `POST {key, value}` writes one.
//! When `key` is repeated the last occurrence wins.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};

use crate::store::{KeyValueStore, MemoryEntry};

use super::response::{decode_json_body, json_response, MessageResponse};

// ==================
// Shared State
// ==================

/// Key-value state shared across handlers
pub struct MemoryState {
    pub store: Arc<dyn KeyValueStore>,
}

impl MemoryState {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

// ==================
// Errors
// ==================

/// Failures on `/memory`, each with a fixed client-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    InvalidQueryVariable,
    KeyNotPresent,
    InvalidRequest,
    WriteFailed,
    MethodNotAllowed,
}

impl MemoryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MemoryError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            MemoryError::InvalidQueryVariable => "Invalid Query Variable",
            MemoryError::KeyNotPresent => "Key is not Present",
            MemoryError::InvalidRequest => "Invalid Request",
            MemoryError::WriteFailed => "Error During Write",
            MemoryError::MethodNotAllowed => "Request Method not Allowed",
        }
    }
}

impl IntoResponse for MemoryError {
    fn into_response(self) -> Response {
        json_response(self.status_code(), &MessageResponse::new(self.message()))
    }
}

// ==================
// Memory Routes
// ==================

/// Create key-value routes
pub fn memory_routes(state: Arc<MemoryState>) -> Router {
    Router::new()
        .route("/memory", any(memory_handler))
        .with_state(state)
}

async fn memory_handler(
    State(state): State<Arc<MemoryState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let result = match method {
        Method::GET => get_entry(&state, &uri).await,
        Method::POST => put_entry(&state, &body).await,
        _ => Err(MemoryError::MethodNotAllowed),
    };

    match result {
        Ok(entry) => json_response(StatusCode::OK, &entry),
        Err(err) => err.into_response(),
    }
}

/// Last value supplied for `key` in the query string, if any
pub fn last_key_param(uri: &Uri) -> Option<String> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri).ok()?;
    pairs
        .into_iter()
        .filter(|(name, _)| name == "key")
        .map(|(_, value)| value)
        .last()
}

async fn get_entry(state: &MemoryState, uri: &Uri) -> Result<MemoryEntry, MemoryError> {
    let key = last_key_param(uri).ok_or(MemoryError::InvalidQueryVariable)?;

    state.store.get(&key).await.map_err(|e| {
        if e.is_not_found() {
            tracing::debug!(key = %key, "key not present");
        } else {
            tracing::warn!(key = %key, error = %e, "key-value read failed");
        }
        MemoryError::KeyNotPresent
    })
}

async fn put_entry(state: &MemoryState, body: &[u8]) -> Result<MemoryEntry, MemoryError> {
    let entry: MemoryEntry = decode_json_body(body).map_err(|e| {
        tracing::debug!(error = %e, "undecodable memory request body");
        MemoryError::InvalidRequest
    })?;

    if entry.key.is_empty() {
        return Err(MemoryError::InvalidRequest);
    }

    state
        .store
        .set(&entry.key, &entry.value)
        .await
        .map_err(|e| {
            tracing::warn!(key = %entry.key, error = %e, "key-value write failed");
            MemoryError::WriteFailed
        })?;

    Ok(entry)
}
