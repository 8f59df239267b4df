//! Friendship entity model.
//!
//! A friendship is keyed by the unordered pair of the two users involved:
//! at most one record exists per pair, whichever side initiated it.
//! Rejected or removed relationships are deleted, never soft-marked, so
//! "no record" always means "no relationship".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use stride_core::AppError;

/// Lifecycle status of a friendship record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "friendship_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    /// Request sent, not yet answered.
    Pending,
    /// Both sides are friends.
    Accepted,
}

impl FriendshipStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
        }
    }
}

impl std::fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The normalized unordered pair key of a friendship.
///
/// `PairKey::new(a, b) == PairKey::new(b, a)` for all a, b; the store
/// layer enforces uniqueness on this key so concurrent mutual requests
/// cannot produce two records for the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    /// The smaller of the two user ids.
    pub low: Uuid,
    /// The larger of the two user ids.
    pub high: Uuid,
}

impl PairKey {
    /// Normalize two user ids into a pair key.
    ///
    /// Returns a `Validation` error when both sides are the same user.
    pub fn new(a: Uuid, b: Uuid) -> Result<Self, AppError> {
        if a == b {
            return Err(AppError::validation("Cannot befriend yourself"));
        }
        Ok(if a < b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        })
    }
}

/// A friendship record between two users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    /// Unique record identifier.
    pub id: Uuid,
    /// The user who initiated the request.
    pub sender_id: Uuid,
    /// The user who received the request.
    pub receiver_id: Uuid,
    /// Current lifecycle status.
    pub status: FriendshipStatus,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the record last changed (acceptance time for accepted rows).
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    /// The normalized pair key of this record.
    pub fn pair_key(&self) -> PairKey {
        // sender != receiver is a table invariant
        PairKey::new(self.sender_id, self.receiver_id)
            .unwrap_or(PairKey { low: self.sender_id, high: self.receiver_id })
    }

    /// The other user of this record, from `user_id`'s perspective.
    pub fn counterpart(&self, user_id: Uuid) -> Uuid {
        if self.sender_id == user_id {
            self.receiver_id
        } else {
            self.sender_id
        }
    }

    /// Whether `user_id` is one of the two sides.
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }
}
