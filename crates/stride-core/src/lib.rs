//! # stride-core
//!
//! Core crate for the Stride social backend. Contains configuration
//! schemas, pagination types, notification event types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Stride crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
