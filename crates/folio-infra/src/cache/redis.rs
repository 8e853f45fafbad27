//! Redis page cache, shared between host instances.

use std::time::Duration;

use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, Client};
use async_trait::async_trait;

use folio_core::ports::{CacheError, PageCache};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    pub connect_timeout: Duration,
    /// Prefix for every page key.
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            key_prefix: "folio:page:".to_string(),
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    /// Returns `None` when `REDIS_URL` is not set.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("REDIS_URL").ok()?;
        let defaults = Self::default();

        Some(Self {
            url,
            connect_timeout: std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            key_prefix: std::env::var("REDIS_KEY_PREFIX").unwrap_or(defaults.key_prefix),
        })
    }
}

/// Redis-backed page cache. Staleness is delegated to key expiry.
pub struct RedisPageCache {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisPageCache {
    pub async fn new(config: RedisConfig) -> Result<Self, CacheError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| CacheError::Connection(e.to_string()))?;

        // ConnectionManager::new retries forever on an unreachable server
        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Connection("Connection timed out".to_string()))?
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis page cache");

        Ok(Self {
            conn,
            key_prefix: config.key_prefix,
        })
    }

    fn key(&self, id: &str) -> String {
        format!("{}{}", self.key_prefix, id)
    }
}

#[async_trait]
impl PageCache for RedisPageCache {
    async fn get(&self, id: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(self.key(id)).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Redis GET failed");
                None
            }
        }
    }

    async fn put(&self, id: &str, page: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(self.key(id), page, ttl.as_secs().max(1))
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get_test_cache() -> Option<RedisPageCache> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
            key_prefix: "folio:test:".to_string(),
        };

        RedisPageCache::new(config).await.ok()
    }

    #[tokio::test]
    async fn test_redis_page_cache_put_get() {
        let cache = match get_test_cache().await {
            Some(c) => c,
            None => {
                tracing::warn!("Redis not available, skipping test");
                return;
            }
        };

        cache
            .put("hello-world", "page", Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(cache.get("hello-world").await.as_deref(), Some("page"));
    }

    #[tokio::test]
    async fn test_redis_page_cache_expiry() {
        let cache = match get_test_cache().await {
            Some(c) => c,
            None => return,
        };

        cache
            .put("short-lived", "page", Duration::from_secs(1))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(cache.get("short-lived").await, None);
    }
}
