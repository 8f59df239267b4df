//! Notification dispatch configuration.

use serde::{Deserialize, Serialize};

/// Notification dispatcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Dispatcher adapter: `"log"` or `"webhook"`.
    #[serde(default = "default_adapter")]
    pub adapter: String,
    /// Delivery endpoint for the webhook adapter.
    #[serde(default)]
    pub webhook_url: String,
    /// Per-delivery timeout in seconds (webhook adapter).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            adapter: default_adapter(),
            webhook_url: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_adapter() -> String {
    "log".to_string()
}

fn default_timeout() -> u64 {
    5
}
