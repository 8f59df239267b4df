//! Cache key builders for all Stride cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use uuid::Uuid;

/// Prefix applied to all Stride cache keys.
const PREFIX: &str = "stride";

/// Cache key for a competition's computed leaderboard.
pub fn leaderboard(competition_id: Uuid) -> String {
    format!("{PREFIX}:leaderboard:{competition_id}")
}

/// Pattern matching every leaderboard entry.
pub fn leaderboard_pattern() -> String {
    format!("{PREFIX}:leaderboard:*")
}
