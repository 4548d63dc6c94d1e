//! `/health` contract tests

mod common;

use axum::http::StatusCode;
use recordgate::http_server::Stores;
use serde_json::json;

use common::{router, send};

#[tokio::test]
async fn test_health() {
    let app = router(Stores::in_memory());

    let (status, body) = send(app, "GET", "/health", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_other_methods_answer_json() {
    for method in ["POST", "DELETE"] {
        let app = router(Stores::in_memory());
        let (status, body) = send(app, method, "/health", "").await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "method: {method}");
        assert_eq!(body, json!({"message": "Request Method not Allowed"}));
    }
}
