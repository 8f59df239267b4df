//! # stride-notify
//!
//! Best-effort notification dispatch. Services hand events to a
//! [`Notifier`], which spawns delivery in the background; a failed or
//! slow delivery never fails or delays the request that triggered it.

pub mod dispatcher;
pub mod log;
pub mod webhook;

pub use dispatcher::{NotificationDispatcher, Notifier};
pub use log::LogDispatcher;
pub use webhook::WebhookDispatcher;
