//! # Response Formatting
//!
//! Envelopes returned by the gateway and the helper that writes them.
//!
//! Every response carries `Content-Type: application/json`. If serializing
//! the body fails, the status code still stands, the body is left empty and
//! the failure is logged.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::de::{DeserializeOwned, Error as _};
use serde::Serialize;

use crate::store::Record;

/// `code` of a successful `/db` envelope
pub const CODE_SUCCESS: i32 = 0;
/// `code` for a rejected or failed `/db` request
pub const CODE_INVALID: i32 = -1;
/// `code` for a disallowed method on `/db`
pub const CODE_NOT_ALLOWED: i32 = -2;

/// `{message}` error envelope used by `/memory`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `/db` envelope
///
/// `records` is present on success (possibly empty) and omitted on error.
#[derive(Debug, Clone, Serialize)]
pub struct DbQueryResult {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<Record>>,
}

impl DbQueryResult {
    pub fn success(records: Vec<Record>) -> Self {
        Self {
            code: CODE_SUCCESS,
            message: "Success".to_string(),
            records: Some(records),
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            records: None,
        }
    }
}

/// Write `body` as JSON with the given status
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let bytes = match serde_json::to_vec(body) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(
                status = status.as_u16(),
                error = %e,
                "failed to serialize response body"
            );
            Vec::new()
        }
    };

    let mut response = (status, bytes).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// Decode the first JSON value in `body`
///
/// Bytes after the first complete value are ignored. An empty body is an
/// error.
pub fn decode_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::Deserializer::from_slice(body)
        .into_iter::<T>()
        .next()
        .unwrap_or_else(|| Err(serde_json::Error::custom("empty request body")))
}
