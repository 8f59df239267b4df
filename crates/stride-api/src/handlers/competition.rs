//! Competition handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use stride_core::error::AppError;
use stride_entity::competition::CompetitionStatusFilter;

use crate::dto::request::{CreateCompetitionDto, InviteDto, UpdateCompetitionDto};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// Optional derived-status filter for competition listing.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct StatusQuery {
    /// One of "upcoming", "active", "ended".
    pub status: Option<String>,
}

/// GET /competitions
pub async fn list_competitions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<StatusQuery>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = filter
        .status
        .as_deref()
        .map(CompetitionStatusFilter::from_str)
        .transpose()?;

    let result = state
        .competition_service
        .list(&auth, status, params.into_page_request())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "competitions": result.items,
        "total": result.total_items,
        "page": result.page,
        "limit": result.page_size,
        "totalPages": result.total_pages,
    })))
}

/// POST /competitions
pub async fn create_competition(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateCompetitionDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let competition = state
        .competition_service
        .create(&auth, req.into_request())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "competition": competition,
        })),
    ))
}

/// GET /competitions/:id
pub async fn get_competition(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let competition = state.competition_service.get(&auth, id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "competition": competition,
    })))
}

/// PUT /competitions/:id
pub async fn update_competition(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCompetitionDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let competition = state
        .competition_service
        .update(&auth, id, req.into_patch())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "competition": competition,
    })))
}

/// POST /competitions/:id/invite
pub async fn invite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<InviteDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let invited = state
        .competition_service
        .invite(&auth, id, &req.user_ids)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "invited": invited,
    })))
}

/// POST /competitions/:id/accept
pub async fn accept_invite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.competition_service.accept_invite(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /competitions/:id/reject
pub async fn reject_invite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.competition_service.reject_invite(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /competitions/:id/leave
pub async fn leave(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.competition_service.leave(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /competitions/:id/leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let entries = state.competition_service.leaderboard(&auth, id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "leaderboard": entries,
    })))
}

/// GET /competitions/:id/participants
pub async fn participants(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .competition_service
        .participants(&auth, id, params.into_page_request())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "participants": result.items,
        "total": result.total_items,
        "page": result.page,
        "limit": result.page_size,
        "totalPages": result.total_pages,
    })))
}
