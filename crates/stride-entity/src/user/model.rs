//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user of the Stride platform.
///
/// Identity and profile management live in a separate service; this crate
/// only carries the fields the social backend reads.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Email address (optional).
    pub email: Option<String>,
    /// Reputation level; orders friend suggestions.
    pub level: i32,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The public projection of this user shown to other users.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            level: self.level,
        }
    }

    /// Case-insensitive match of `query` against username, display name,
    /// or email.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.username.to_lowercase().contains(&q)
            || self
                .display_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&q))
            || self
                .email
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(&q))
    }
}

/// Public profile projection joined into friend/participant listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Reputation level.
    pub level: i32,
}
