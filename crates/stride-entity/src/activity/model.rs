//! Activity entity model.
//!
//! Activities are the raw material of competition progress: each recorded
//! activity carries every metric a competition might score on, and the
//! competition's kind selects which one counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use stride_core::AppError;

use crate::competition::CompetitionKind;

/// The kind of physical activity performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "activity_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// Running.
    Run,
    /// Cycling.
    Ride,
    /// Walking.
    Walk,
    /// Swimming.
    Swim,
    /// Hiking.
    Hike,
    /// Gym or other indoor workout.
    Workout,
}

impl ActivityKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Ride => "ride",
            Self::Walk => "walk",
            Self::Swim => "swim",
            Self::Hike => "hike",
            Self::Workout => "workout",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "run" => Ok(Self::Run),
            "ride" => Ok(Self::Ride),
            "walk" => Ok(Self::Walk),
            "swim" => Ok(Self::Swim),
            "hike" => Ok(Self::Hike),
            "workout" => Ok(Self::Workout),
            _ => Err(AppError::validation(format!(
                "Invalid activity kind: '{s}'. Expected one of: run, ride, walk, swim, hike, workout"
            ))),
        }
    }
}

/// A recorded activity for one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Unique identifier.
    pub id: Uuid,
    /// The user who performed the activity.
    pub user_id: Uuid,
    /// The kind of activity.
    pub kind: ActivityKind,
    /// Distance covered in kilometres.
    pub distance_km: f64,
    /// Moving time in seconds.
    pub duration_seconds: f64,
    /// Step count.
    pub steps: f64,
    /// Calories burned.
    pub calories: f64,
    /// When the activity took place.
    pub recorded_at: DateTime<Utc>,
}

impl Activity {
    /// The metric value this activity contributes under a competition kind.
    pub fn metric(&self, kind: CompetitionKind) -> f64 {
        match kind {
            CompetitionKind::Distance => self.distance_km,
            CompetitionKind::Duration => self.duration_seconds,
            CompetitionKind::Steps => self.steps,
            CompetitionKind::Calories => self.calories,
        }
    }
}

/// Data required to record an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
    /// The performing user.
    pub user_id: Uuid,
    /// The kind of activity.
    pub kind: ActivityKind,
    /// Distance covered in kilometres.
    pub distance_km: f64,
    /// Moving time in seconds.
    pub duration_seconds: f64,
    /// Step count.
    pub steps: f64,
    /// Calories burned.
    pub calories: f64,
    /// When the activity took place.
    pub recorded_at: DateTime<Utc>,
}
