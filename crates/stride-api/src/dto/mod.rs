//! Request DTOs.
//!
//! Success responses are small enough that handlers build them inline
//! with `serde_json::json!`.

pub mod request;
