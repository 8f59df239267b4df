//! # stride-cache
//!
//! Caching and rate limiting for Stride.
//!
//! Two interchangeable cache backends, selected by `cache.provider`:
//! an in-process [moka](https://crates.io/crates/moka) cache, and a
//! [redis](https://crates.io/crates/redis)-backed one for multi-instance
//! deployments. The token-bucket [`RateLimiter`] lives here too since it
//! shares the crate's concern of small, fast, expiring state.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
pub mod rate_limit;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
pub use rate_limit::RateLimiter;
