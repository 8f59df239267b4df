//! Outbound notification events.
//!
//! Events are handed to the notification dispatcher and never persisted
//! by the core. Delivery is best-effort; the triggering request does not
//! block on or observe the outcome.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The category of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone sent the recipient a friend request.
    FriendRequest,
    /// The recipient's friend request was accepted.
    FriendAccepted,
    /// The recipient was invited to a competition.
    CompetitionInvite,
    /// An invitee accepted the recipient's competition invite.
    CompetitionInviteAccepted,
    /// A competition the recipient participates in was updated.
    CompetitionUpdated,
}

impl NotificationKind {
    /// Return the wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FriendRequest => "friend_request",
            Self::FriendAccepted => "friend_accepted",
            Self::CompetitionInvite => "competition_invite",
            Self::CompetitionInviteAccepted => "competition_invite_accepted",
            Self::CompetitionUpdated => "competition_updated",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single outbound notification addressed to one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// The recipient.
    pub user_id: Uuid,
    /// Event category.
    pub kind: NotificationKind,
    /// Short human-readable title.
    pub title: String,
    /// Human-readable message body.
    pub message: String,
    /// Structured payload echoing the triggering entity identifiers.
    pub data: serde_json::Value,
}

impl NotificationEvent {
    /// Create a new notification event.
    pub fn new(
        user_id: Uuid,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            data,
        }
    }
}
