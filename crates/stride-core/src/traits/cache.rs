//! The cache backend abstraction.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// One cache backend, either Redis or the in-process store.
///
/// Values travel as JSON strings; key prefixing and expiry are the
/// backend's responsibility.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Looks up a key. `None` means absent or expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Stores a value with an explicit TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Stores a value under the configured default TTL.
    async fn set_default(&self, key: &str, value: &str) -> AppResult<()>;

    /// Drops a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Whether a live entry exists for the key.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Drops every key matching a glob pattern such as `"leaderboard:*"`.
    /// Returns the number of keys removed.
    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64>;

    /// Typed read; deserializes the stored JSON.
    async fn get_json<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> AppResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key).await? {
            Some(value) => {
                let parsed = serde_json::from_str(&value)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Typed write; serializes to JSON before storing.
    async fn set_json<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.set(key, &json, ttl).await
    }

    /// Whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Clears the whole cache.
    async fn flush_all(&self) -> AppResult<()>;
}
