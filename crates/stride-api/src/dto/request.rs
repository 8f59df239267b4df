//! Request DTOs with validation.
//!
//! Field names follow the wire contract (camelCase). Validation that
//! depends on more than one field (date windows, cross-record state)
//! lives in the service layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use stride_entity::activity::ActivityKind;
use stride_entity::competition::{CompetitionKind, CompetitionPatch};
use stride_service::activity::RecordActivityRequest;
use stride_service::competition::CreateCompetitionRequest;

/// Body of `POST /friends/request`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFriendRequest {
    /// The user to befriend.
    pub target_user_id: Uuid,
}

/// Body of `POST /friends/accept` and `POST /friends/reject`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestAction {
    /// The pending friendship record to act on.
    pub request_id: Uuid,
}

/// Body of `POST /competitions`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompetitionDto {
    /// Display name.
    #[validate(length(min = 3, max = 100, message = "Name must be 3-100 characters"))]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Scored metric.
    pub kind: CompetitionKind,
    /// Numeric target.
    #[validate(range(min = 1.0, message = "Goal must be at least 1"))]
    pub goal: f64,
    /// Eligible activity kinds.
    #[validate(length(min = 1, message = "At least one activity kind is required"))]
    pub activity_kinds: Vec<ActivityKind>,
    /// Window start.
    pub starts_at: DateTime<Utc>,
    /// Window end.
    pub ends_at: DateTime<Utc>,
    /// Restrict visibility to creator and participants.
    #[serde(default)]
    pub is_private: bool,
    /// Users to invite at creation time.
    #[serde(default)]
    pub invited_users: Vec<Uuid>,
}

impl CreateCompetitionDto {
    /// Converts to the service-layer request.
    pub fn into_request(self) -> CreateCompetitionRequest {
        CreateCompetitionRequest {
            name: self.name,
            description: self.description,
            kind: self.kind,
            goal: self.goal,
            activity_kinds: self.activity_kinds,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_private: self.is_private,
            invited_users: self.invited_users,
        }
    }
}

/// Body of `PUT /competitions/:id`. All fields optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompetitionDto {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New goal.
    pub goal: Option<f64>,
    /// New eligible activity kinds.
    pub activity_kinds: Option<Vec<ActivityKind>>,
    /// New window start.
    pub starts_at: Option<DateTime<Utc>>,
    /// New window end.
    pub ends_at: Option<DateTime<Utc>>,
    /// New visibility.
    pub is_private: Option<bool>,
}

impl UpdateCompetitionDto {
    /// Converts to the entity-layer patch.
    pub fn into_patch(self) -> CompetitionPatch {
        CompetitionPatch {
            name: self.name,
            description: self.description,
            goal: self.goal,
            activity_kinds: self.activity_kinds,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_private: self.is_private,
        }
    }
}

/// Body of `POST /competitions/:id/invite`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InviteDto {
    /// Users to invite.
    #[validate(length(min = 1, message = "At least one user is required"))]
    pub user_ids: Vec<Uuid>,
}

/// Body of `POST /activities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordActivityDto {
    /// The kind of activity performed.
    pub kind: ActivityKind,
    /// Distance covered in kilometres.
    #[serde(default)]
    pub distance_km: f64,
    /// Moving time in seconds.
    #[serde(default)]
    pub duration_seconds: f64,
    /// Step count.
    #[serde(default)]
    pub steps: f64,
    /// Calories burned.
    #[serde(default)]
    pub calories: f64,
    /// When the activity took place; defaults to now.
    pub recorded_at: Option<DateTime<Utc>>,
}

impl RecordActivityDto {
    /// Converts to the service-layer request.
    pub fn into_request(self) -> RecordActivityRequest {
        RecordActivityRequest {
            kind: self.kind,
            distance_km: self.distance_km,
            duration_seconds: self.duration_seconds,
            steps: self.steps,
            calories: self.calories,
            recorded_at: self.recorded_at,
        }
    }
}
