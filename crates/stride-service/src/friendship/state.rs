//! The friendship request transition function.
//!
//! Pulled out of the service so the decision over an existing pair record
//! is a pure function of its inputs and can be tested exhaustively.

use uuid::Uuid;

use stride_entity::friendship::{Friendship, FriendshipStatus};

/// What `send_request` should do, given the current pair record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// No record exists; create a fresh pending request.
    CreatePending,
    /// The pair is already accepted.
    AlreadyFriends,
    /// The caller already has an unanswered request to this user.
    AlreadyRequested,
    /// The other side already sent a pending request; accept that record
    /// instead of creating a mirror one.
    AcceptExisting(Uuid),
}

/// Decide the outcome of a friend request from `sender` given the
/// existing record for the pair, if any.
pub fn apply_request(existing: Option<&Friendship>, sender: Uuid) -> RequestOutcome {
    match existing {
        None => RequestOutcome::CreatePending,
        Some(f) if f.status == FriendshipStatus::Accepted => RequestOutcome::AlreadyFriends,
        Some(f) if f.sender_id == sender => RequestOutcome::AlreadyRequested,
        // Pending and initiated by the other side: mutual requests
        // collapse into an acceptance.
        Some(f) => RequestOutcome::AcceptExisting(f.id),
    }
}
