//! Health endpoint tests.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn health_is_unauthenticated() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert!(response.body["timestamp"].is_string());
}
