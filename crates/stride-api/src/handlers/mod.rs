//! Route handlers organized by domain.

pub mod activity;
pub mod competition;
pub mod friend;
pub mod health;
