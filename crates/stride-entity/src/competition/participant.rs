//! Participant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle status of a user's membership in a competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "participant_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    /// Invited, not yet answered.
    Invited,
    /// Accepted and competing.
    Active,
    /// Declined the invite; needs a fresh invite to join.
    Rejected,
    /// Withdrew after joining; needs a fresh invite to rejoin.
    Left,
}

impl ParticipantStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invited => "invited",
            Self::Active => "active",
            Self::Rejected => "rejected",
            Self::Left => "left",
        }
    }

    /// Whether a fresh invite may overwrite this status.
    ///
    /// `rejected` and `left` are terminal states that only an explicit
    /// re-invite can escape.
    pub fn can_reinvite(&self) -> bool {
        matches!(self, Self::Rejected | Self::Left)
    }
}

impl std::fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's membership record in one competition.
///
/// At most one record exists per `(competition_id, user_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// The competition.
    pub competition_id: Uuid,
    /// The member.
    pub user_id: Uuid,
    /// Current membership status.
    pub status: ParticipantStatus,
    /// When the user was (last) invited.
    pub invited_at: DateTime<Utc>,
    /// When the user accepted; unset until then.
    pub joined_at: Option<DateTime<Utc>>,
    /// Denormalized running progress total, in the competition's metric.
    pub progress: f64,
}

impl Participant {
    /// Create a freshly invited participant.
    pub fn invited(competition_id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            competition_id,
            user_id,
            status: ParticipantStatus::Invited,
            invited_at: now,
            joined_at: None,
            progress: 0.0,
        }
    }
}
