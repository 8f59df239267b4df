//! Cache backend configuration.

use serde::{Deserialize, Serialize};

/// Cache settings, `[cache]` in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Which backend to use, `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// TTL in seconds applied when a caller does not pass one.
    #[serde(default = "default_ttl")]
    pub default_ttl_seconds: u64,
    /// Settings for the redis backend.
    #[serde(default)]
    pub redis: RedisCacheConfig,
    /// Settings for the in-process backend.
    #[serde(default)]
    pub memory: MemoryCacheConfig,
}

/// Redis backend settings, `[cache.redis]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisCacheConfig {
    /// Connection URL, `redis://[user:pass@]host:port`.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Prefix applied to every key written by this instance.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

/// In-process backend settings, `[cache.memory]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Entry count bound before eviction kicks in.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// Per-entry lifetime in seconds.
    #[serde(default = "default_memory_ttl")]
    pub time_to_live_seconds: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            time_to_live_seconds: default_memory_ttl(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_ttl() -> u64 {
    300
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "stride:".to_string()
}

fn default_max_capacity() -> u64 {
    10000
}

fn default_memory_ttl() -> u64 {
    300
}
