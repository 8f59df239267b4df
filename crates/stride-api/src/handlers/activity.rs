//! Activity ingest handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::request::RecordActivityDto;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /activities
pub async fn record_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RecordActivityDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let activity = state
        .activity_service
        .record(&auth, req.into_request())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "activity": activity,
        })),
    ))
}
