//! Per-identity token bucket rate limiting.

use std::time::Instant;

use dashmap::DashMap;

use stride_core::config::rate_limit::RateLimitConfig;

/// In-process token bucket rate limiter keyed by request identity.
///
/// The identity is the authenticated user id when the bearer token
/// decodes, otherwise the client IP.
#[derive(Debug)]
pub struct RateLimiter {
    /// Identity → bucket state.
    buckets: DashMap<String, TokenBucket>,
    /// Maximum tokens per bucket.
    max_tokens: u32,
    /// Token refill rate per second.
    refill_rate: f64,
    /// Whether the limiter is enforced at all.
    enabled: bool,
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Creates a new rate limiter from configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            max_tokens: config.max_tokens,
            refill_rate: config.refill_per_second,
            enabled: config.enabled,
        }
    }

    /// Attempts to consume a token for the given identity.
    pub fn check(&self, key: &str) -> bool {
        if !self.enabled {
            return true;
        }

        let now = Instant::now();
        let mut bucket = self.buckets.entry(key.to_string()).or_insert(TokenBucket {
            tokens: self.max_tokens as f64,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(self.max_tokens as f64);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_then_empty() {
        let limiter = RateLimiter::new(&RateLimitConfig {
            enabled: true,
            max_tokens: 3,
            refill_per_second: 0.0,
        });

        assert!(limiter.check("u1"));
        assert!(limiter.check("u1"));
        assert!(limiter.check("u1"));
        assert!(!limiter.check("u1"));
        // Other identities have their own bucket.
        assert!(limiter.check("u2"));
    }

    #[test]
    fn test_disabled_always_passes() {
        let limiter = RateLimiter::new(&RateLimitConfig {
            enabled: false,
            max_tokens: 0,
            refill_per_second: 0.0,
        });
        assert!(limiter.check("anyone"));
    }
}
