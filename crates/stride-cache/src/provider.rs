//! Provider selection and the `CacheManager` facade.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use stride_core::config::cache::CacheConfig;
use stride_core::error::AppError;
use stride_core::result::AppResult;
use stride_core::traits::cache::CacheProvider;

/// Facade over the backend chosen by `cache.provider`.
///
/// Services hold this type rather than a concrete backend; swapping
/// Redis for the in-memory cache is a configuration change only.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Connects the configured backend and wraps it.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn CacheProvider> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                info!("Cache backend: redis");
                Arc::new(crate::redis::RedisCacheProvider::new(
                    client,
                    config.default_ttl_seconds,
                ))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Cache backend: in-memory");
                Arc::new(crate::memory::MemoryCacheProvider::new(
                    &config.memory,
                    config.default_ttl_seconds,
                ))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider '{other}' (expected \"memory\" or \"redis\")"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Wraps an already-constructed provider. Used by tests.
    pub fn from_provider(provider: Arc<dyn CacheProvider>) -> Self {
        Self { inner: provider }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &dyn CacheProvider {
        self.inner.as_ref()
    }
}

// Delegation so callers can treat the manager as a provider, including
// the `get_json`/`set_json` helpers that need a `Sized` receiver.
#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn set_default(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set_default(key, value).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        self.inner.delete_pattern(pattern).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn flush_all(&self) -> AppResult<()> {
        self.inner.flush_all().await
    }
}
