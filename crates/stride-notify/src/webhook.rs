//! Webhook dispatcher that POSTs events to a configured endpoint.

use std::time::Duration;

use async_trait::async_trait;

use stride_core::config::notify::NotifyConfig;
use stride_core::error::AppError;
use stride_core::events::NotificationEvent;
use stride_core::result::AppResult;

use crate::dispatcher::NotificationDispatcher;

/// Delivers events as JSON POSTs to an external notification gateway.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    client: reqwest::Client,
    url: String,
}

impl WebhookDispatcher {
    /// Create a webhook dispatcher from configuration.
    pub fn new(config: &NotifyConfig) -> Result<Self, AppError> {
        if config.webhook_url.is_empty() {
            return Err(AppError::configuration(
                "notify.webhook_url must be set for the webhook adapter",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::configuration(format!("Failed to build webhook client: {e}"))
            })?;

        Ok(Self {
            client,
            url: config.webhook_url.clone(),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookDispatcher {
    async fn dispatch(&self, event: &NotificationEvent) -> AppResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Webhook request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::internal(format!(
                "Webhook endpoint returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
