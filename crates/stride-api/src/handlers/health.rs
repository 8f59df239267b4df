//! Health check handler.

use axum::Json;
use chrono::Utc;

/// GET /health — unauthenticated liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now(),
    }))
}
