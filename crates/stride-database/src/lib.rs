//! # stride-database
//!
//! Persistence layer for Stride. Defines the store traits that the service
//! layer depends on, a PostgreSQL implementation (sqlx), and an in-memory
//! implementation used by tests and single-node deployments.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod stores;

pub use stores::{ActivityStore, CompetitionStore, FriendshipStore, ParticipantStore, UserStore};
