//! Log-only dispatcher, the default adapter.

use async_trait::async_trait;
use tracing::info;

use stride_core::events::NotificationEvent;
use stride_core::result::AppResult;

use crate::dispatcher::NotificationDispatcher;

/// Writes every event to the structured log instead of delivering it.
#[derive(Debug, Default)]
pub struct LogDispatcher;

impl LogDispatcher {
    /// Create a new log dispatcher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn dispatch(&self, event: &NotificationEvent) -> AppResult<()> {
        info!(
            user_id = %event.user_id,
            kind = %event.kind,
            title = %event.title,
            "Notification dispatched"
        );
        Ok(())
    }
}
