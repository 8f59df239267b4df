//! Friendship state machine and service.

pub mod service;
pub mod state;

pub use service::{
    AcceptedFriendship, FriendEntry, FriendRequestEntry, FriendshipService, RelationshipStatus,
};
pub use state::{RequestOutcome, apply_request};
