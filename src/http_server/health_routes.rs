//! Health HTTP Route
//!
//! Liveness only; the stores are not contacted.

use axum::{
    http::{Method, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use serde::Serialize;

use super::response::{json_response, MessageResponse};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Create the `/health` route
pub fn health_routes() -> Router {
    Router::new().route("/health", any(health_handler))
}

async fn health_handler(method: Method) -> Response {
    if method != Method::GET {
        return json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &MessageResponse::new("Request Method not Allowed"),
        );
    }

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    json_response(StatusCode::OK, &response)
}
