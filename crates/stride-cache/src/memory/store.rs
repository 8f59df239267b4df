//! In-memory cache implementation using the moka crate.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use stride_core::config::cache::MemoryCacheConfig;
use stride_core::result::AppResult;
use stride_core::traits::cache::CacheProvider;

/// In-memory cache provider using moka.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: Cache<String, String>,
    /// Default TTL for entries.
    default_ttl: Duration,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig, default_ttl_seconds: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.time_to_live_seconds))
            .build();

        Self {
            cache,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await)
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> AppResult<()> {
        // Expiry is cache-wide (`time_to_live` at construction); moka's
        // simple API has no per-entry TTL, so the requested one is ignored.
        self.cache.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn set_default(&self, key: &str, value: &str) -> AppResult<()> {
        self.set(key, value, self.default_ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.remove(key).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.contains_key(key))
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        // Moka doesn't support pattern scanning, so treat the pattern as a
        // prefix and iterate.
        let prefix = pattern.trim_end_matches('*');
        let keys_to_remove: Vec<String> = self
            .cache
            .iter()
            .filter(|entry| entry.0.starts_with(prefix))
            .map(|entry| entry.0.to_string())
            .collect();

        let mut count = 0u64;
        for key in keys_to_remove {
            self.cache.remove(&key).await;
            count += 1;
        }

        debug!(pattern, count, "Deleted keys matching pattern");
        Ok(count)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn flush_all(&self) -> AppResult<()> {
        self.cache.invalidate_all();
        Ok(())
    }
}
