//! Dispatcher trait and the fire-and-forget wrapper around it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use stride_core::config::notify::NotifyConfig;
use stride_core::error::AppError;
use stride_core::events::NotificationEvent;
use stride_core::result::AppResult;

/// Trait for notification delivery backends.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver a single event to its recipient.
    async fn dispatch(&self, event: &NotificationEvent) -> AppResult<()>;
}

/// Hands events to the configured dispatcher without blocking the caller.
///
/// Every `notify` call spawns a detached task; delivery errors are logged
/// and swallowed there.
#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<dyn NotificationDispatcher>,
}

impl Notifier {
    /// Create a notifier from configuration.
    pub fn new(config: &NotifyConfig) -> Result<Self, AppError> {
        let inner: Arc<dyn NotificationDispatcher> = match config.adapter.as_str() {
            "log" => Arc::new(crate::log::LogDispatcher::new()),
            "webhook" => Arc::new(crate::webhook::WebhookDispatcher::new(config)?),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown notification adapter: '{other}'. Supported: log, webhook"
                )));
            }
        };
        Ok(Self { inner })
    }

    /// Create a notifier from an existing dispatcher (for testing).
    pub fn from_dispatcher(dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        Self { inner: dispatcher }
    }

    /// Queue one event for background delivery.
    pub fn notify(&self, event: NotificationEvent) {
        let dispatcher = Arc::clone(&self.inner);
        tokio::spawn(async move {
            if let Err(e) = dispatcher.dispatch(&event).await {
                warn!(
                    user_id = %event.user_id,
                    kind = %event.kind,
                    error = %e,
                    "Notification delivery failed"
                );
            }
        });
    }

    /// Queue a batch of events for background delivery.
    pub fn notify_all(&self, events: Vec<NotificationEvent>) {
        for event in events {
            self.notify(event);
        }
    }
}
