//! Competition entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use stride_core::AppError;

use crate::activity::ActivityKind;

/// The metric a competition is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "competition_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CompetitionKind {
    /// Total distance in kilometres.
    Distance,
    /// Total moving time in seconds.
    Duration,
    /// Total step count.
    Steps,
    /// Total calories burned.
    Calories,
}

impl CompetitionKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Duration => "duration",
            Self::Steps => "steps",
            Self::Calories => "calories",
        }
    }
}

impl std::fmt::Display for CompetitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CompetitionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "distance" => Ok(Self::Distance),
            "duration" => Ok(Self::Duration),
            "steps" => Ok(Self::Steps),
            "calories" => Ok(Self::Calories),
            _ => Err(AppError::validation(format!(
                "Invalid competition kind: '{s}'. Expected one of: distance, duration, steps, calories"
            ))),
        }
    }
}

/// Derived lifecycle filter for competition listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatusFilter {
    /// `starts_at` is in the future.
    Upcoming,
    /// The window contains the current time.
    Active,
    /// `ends_at` has passed.
    Ended,
}

impl std::str::FromStr for CompetitionStatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "active" => Ok(Self::Active),
            "ended" => Ok(Self::Ended),
            _ => Err(AppError::validation(format!(
                "Invalid status filter: '{s}'. Expected one of: upcoming, active, ended"
            ))),
        }
    }
}

/// A competition between users over a date window.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name (3–100 chars).
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Scored metric.
    pub kind: CompetitionKind,
    /// Numeric target in the metric's unit.
    pub goal: f64,
    /// Activity kinds that count toward progress.
    pub activity_kinds: Vec<ActivityKind>,
    /// Window start.
    pub starts_at: DateTime<Utc>,
    /// Window end.
    pub ends_at: DateTime<Utc>,
    /// Visible only to creator and participants when set.
    pub is_private: bool,
    /// The creating user; sole owner for mutations.
    pub created_by: Uuid,
    /// When the competition was created.
    pub created_at: DateTime<Utc>,
    /// When the competition was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Competition {
    /// Whether the window contains `at`.
    pub fn window_contains(&self, at: DateTime<Utc>) -> bool {
        self.starts_at <= at && at <= self.ends_at
    }

    /// Derived lifecycle status at time `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> CompetitionStatusFilter {
        if now < self.starts_at {
            CompetitionStatusFilter::Upcoming
        } else if now > self.ends_at {
            CompetitionStatusFilter::Ended
        } else {
            CompetitionStatusFilter::Active
        }
    }
}

/// Data required to create a competition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCompetition {
    /// Display name.
    pub name: String,
    /// Description (may be empty).
    pub description: String,
    /// Scored metric.
    pub kind: CompetitionKind,
    /// Numeric target.
    pub goal: f64,
    /// Eligible activity kinds.
    pub activity_kinds: Vec<ActivityKind>,
    /// Window start.
    pub starts_at: DateTime<Utc>,
    /// Window end.
    pub ends_at: DateTime<Utc>,
    /// Private flag.
    pub is_private: bool,
    /// Creator.
    pub created_by: Uuid,
}

/// Partial patch for the mutable fields of a competition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompetitionPatch {
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

impl CompetitionPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.goal.is_none()
            && self.activity_kinds.is_none()
            && self.starts_at.is_none()
            && self.ends_at.is_none()
            && self.is_private.is_none()
    }
}
