//! Per-identity rate limit configuration.

use serde::{Deserialize, Serialize};

/// Token bucket rate limiter configuration.
///
/// One bucket per identity (user id when the bearer token decodes,
/// otherwise the client IP).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enforced.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maximum tokens per bucket (burst size).
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Token refill rate per second.
    #[serde(default = "default_refill_per_second")]
    pub refill_per_second: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_tokens: default_max_tokens(),
            refill_per_second: default_refill_per_second(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_tokens() -> u32 {
    60
}

fn default_refill_per_second() -> f64 {
    1.0
}
