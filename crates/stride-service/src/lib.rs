//! # stride-service
//!
//! Business logic service layer for Stride. Each service orchestrates
//! stores, cache, and the notifier to implement application-level use
//! cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod activity;
pub mod competition;
pub mod context;
pub mod friendship;

pub use activity::ActivityService;
pub use competition::{CompetitionService, LeaderboardEntry};
pub use context::RequestContext;
pub use friendship::FriendshipService;
