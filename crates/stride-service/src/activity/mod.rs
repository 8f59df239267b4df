//! Activity recording.

pub mod service;

pub use service::{ActivityService, RecordActivityRequest};
