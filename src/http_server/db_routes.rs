//! Record Query HTTP Routes
//!
//! `/db` accepts only `GET`, with the filter carried in a JSON body:
//!
//! ```json
//! {"startDate": "2016-01-26", "endDate": "2018-02-02", "minCount": 2700, "maxCount": 3000}
//! ```

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use serde::Deserialize;

use crate::store::model::null_as_default;
use crate::store::{parse_date, DocumentStore, Record, RecordFilter, StoreError};

use super::response::{
    decode_json_body, json_response, DbQueryResult, CODE_INVALID, CODE_NOT_ALLOWED,
};

// ==================
// Shared State
// ==================

/// Document store state shared across handlers
pub struct DbState {
    pub store: Arc<dyn DocumentStore>,
}

impl DbState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

// ==================
// Request Types
// ==================

/// `/db` request body; absent or `null` fields take their defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DbQueryRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub min_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub max_count: i64,
}

impl DbQueryRequest {
    /// Validate the dates and build the store filter
    pub fn to_filter(&self) -> Result<RecordFilter, DbError> {
        match (parse_date(&self.start_date), parse_date(&self.end_date)) {
            (Some(start), Some(end)) => Ok(RecordFilter::new(
                start,
                end,
                self.min_count,
                self.max_count,
            )),
            _ => Err(DbError::InvalidTimeFormat),
        }
    }
}

// ==================
// Errors
// ==================

/// Failures on `/db`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    MethodNotAllowed,
    InvalidRequestFormat,
    InvalidTimeFormat,
    /// The store failed; its error text is returned to the client
    Store(StoreError),
}

impl DbError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DbError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            DbError::MethodNotAllowed => CODE_NOT_ALLOWED,
            _ => CODE_INVALID,
        }
    }

    pub fn message(&self) -> String {
        match self {
            DbError::MethodNotAllowed => "Request not Allowed".to_string(),
            DbError::InvalidRequestFormat => "Invalid Request Format".to_string(),
            DbError::InvalidTimeFormat => "Invalid Time Format".to_string(),
            DbError::Store(e) => e.to_string(),
        }
    }
}

impl IntoResponse for DbError {
    fn into_response(self) -> Response {
        json_response(
            self.status_code(),
            &DbQueryResult::error(self.code(), self.message()),
        )
    }
}

// ==================
// Db Routes
// ==================

/// Create record query routes
pub fn db_routes(state: Arc<DbState>) -> Router {
    Router::new()
        .route("/db", any(db_handler))
        .with_state(state)
}

async fn db_handler(State(state): State<Arc<DbState>>, method: Method, body: Bytes) -> Response {
    if method != Method::GET {
        return DbError::MethodNotAllowed.into_response();
    }

    match query_records(&state, &body).await {
        Ok(records) => json_response(StatusCode::OK, &DbQueryResult::success(records)),
        Err(err) => err.into_response(),
    }
}

async fn query_records(state: &DbState, body: &[u8]) -> Result<Vec<Record>, DbError> {
    // A `null` body leaves every field at its default
    let request: DbQueryRequest = decode_json_body::<Option<DbQueryRequest>>(body)
        .map_err(|e| {
            tracing::debug!(error = %e, "undecodable db request body");
            DbError::InvalidRequestFormat
        })?
        .unwrap_or_default();

    let filter = request.to_filter()?;

    let records = state.store.query(&filter).await.map_err(|e| {
        tracing::warn!(error = %e, "document query failed");
        DbError::Store(e)
    })?;

    tracing::debug!(
        start = %filter.start,
        end = %filter.end,
        min_count = filter.min_count,
        max_count = filter.max_count,
        matched = records.len(),
        "document query complete"
    );
    Ok(records)
}
