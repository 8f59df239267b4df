//! # stride-entity
//!
//! Domain entity models for the Stride social backend: users, friendships,
//! competitions, participants, and activities.

pub mod activity;
pub mod competition;
pub mod friendship;
pub mod user;

pub use activity::{Activity, ActivityKind, NewActivity};
pub use competition::{
    Competition, CompetitionKind, CompetitionPatch, CompetitionStatusFilter, NewCompetition,
    Participant, ParticipantStatus,
};
pub use friendship::{Friendship, FriendshipStatus, PairKey};
pub use user::{User, UserProfile};
