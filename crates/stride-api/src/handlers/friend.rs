//! Friendship handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::dto::request::{FriendRequestAction, SendFriendRequest};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /friends
pub async fn list_friends(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .friendship_service
        .list_friends(&auth, params.into_page_request())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "friends": result.items,
        "total": result.total_items,
        "page": result.page,
        "limit": result.page_size,
        "totalPages": result.total_pages,
    })))
}

/// GET /friends/requests
pub async fn list_requests(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .friendship_service
        .list_requests(&auth, params.into_page_request())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "requests": result.items,
        "total": result.total_items,
        "page": result.page,
        "limit": result.page_size,
        "totalPages": result.total_pages,
    })))
}

/// POST /friends/request
pub async fn send_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SendFriendRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let friendship = state
        .friendship_service
        .send_request(&auth, req.target_user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "friendshipId": friendship.id,
        })),
    ))
}

/// POST /friends/accept
pub async fn accept_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<FriendRequestAction>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let accepted = state
        .friendship_service
        .accept_request(&auth, req.request_id)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "friendship": accepted.friendship,
        "friend": accepted.friend,
    })))
}

/// POST /friends/reject
pub async fn reject_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<FriendRequestAction>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .friendship_service
        .reject_request(&auth, req.request_id)
        .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /friends/:friendId
pub async fn remove_friend(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(friend_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .friendship_service
        .remove_friend(&auth, friend_id)
        .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Free-text filter for friend suggestions.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SuggestionQuery {
    /// Matched against username, display name, and email.
    pub query: Option<String>,
}

/// GET /friends/suggestions
pub async fn suggestions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(search): Query<SuggestionQuery>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .friendship_service
        .suggestions(&auth, search.query.as_deref(), params.into_page_request())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "users": result.items,
        "total": result.total_items,
        "page": result.page,
        "limit": result.page_size,
        "totalPages": result.total_pages,
    })))
}

/// GET /friends/common/:userId
pub async fn common_friends(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .friendship_service
        .common_friends(&auth, user_id, params.into_page_request())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "friends": result.items,
        "total": result.total_items,
        "page": result.page,
        "limit": result.page_size,
        "totalPages": result.total_pages,
    })))
}

/// GET /friends/status/:userId
pub async fn relationship_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = state.friendship_service.status(&auth, user_id).await?;

    let mut body = serde_json::to_value(&status)
        .map_err(|e| stride_core::error::AppError::internal(e.to_string()))?;
    if let serde_json::Value::Object(map) = &mut body {
        map.insert("success".to_string(), serde_json::Value::Bool(true));
    }
    Ok(Json(body))
}
