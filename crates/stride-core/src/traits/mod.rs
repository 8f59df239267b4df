//! Shared traits implemented across crate boundaries.

pub mod cache;
