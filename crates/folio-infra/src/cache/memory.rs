//! In-memory page cache - used when Redis is not configured.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use folio_core::ports::{CacheError, PageCache};

struct CachedPage {
    page: String,
    /// `None` when the TTL reaches past what `Instant` can represent.
    stale_at: Option<Instant>,
}

impl CachedPage {
    fn is_stale(&self, now: Instant) -> bool {
        self.stale_at.is_some_and(|stale_at| now >= stale_at)
    }
}

/// Rendered pages keyed by post id, held behind an async RwLock.
///
/// Pages are dropped lazily once stale. Data is lost on process restart.
pub struct InMemoryPageCache {
    pages: RwLock<HashMap<String, CachedPage>>,
}

impl InMemoryPageCache {
    pub fn new() -> Self {
        Self {
            pages: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPageCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageCache for InMemoryPageCache {
    async fn get(&self, id: &str) -> Option<String> {
        {
            let pages = self.pages.read().await;
            let cached = pages.get(id)?;
            if !cached.is_stale(Instant::now()) {
                return Some(cached.page.clone());
            }
        }

        // A put may have refreshed the entry since the read lock was released
        let mut pages = self.pages.write().await;
        let cached = pages.get(id)?;
        if !cached.is_stale(Instant::now()) {
            return Some(cached.page.clone());
        }

        pages.remove(id);
        tracing::debug!(id = %id, "Cached page is stale");
        None
    }

    async fn put(&self, id: &str, page: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut pages = self.pages.write().await;
        pages.insert(
            id.to_string(),
            CachedPage {
                page: page.to_string(),
                stale_at: Instant::now().checked_add(ttl),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = InMemoryPageCache::new();
        cache
            .put("hello-world", "{\"post\":{}}", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            cache.get("hello-world").await.as_deref(),
            Some("{\"post\":{}}")
        );
        assert_eq!(cache.get("other").await, None);
    }

    #[tokio::test]
    async fn test_stale_page_is_evicted() {
        let cache = InMemoryPageCache::new();
        cache
            .put("hello-world", "page", Duration::from_millis(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("hello-world").await, None);
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_never_goes_stale() {
        let cache = InMemoryPageCache::new();
        cache
            .put("p1", "page", Duration::from_secs(u64::MAX))
            .await
            .unwrap();

        assert_eq!(cache.get("p1").await.as_deref(), Some("page"));
    }

    #[tokio::test]
    async fn test_refreshed_page_survives_stale_read() {
        let cache = InMemoryPageCache::new();
        cache
            .put("p1", "old", Duration::from_millis(5))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        cache
            .put("p1", "new", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("p1").await.as_deref(), Some("new"));
    }

    #[test]
    fn test_stale_check_rechecks_current_entry() {
        let now = Instant::now();
        let fresh = CachedPage {
            page: "new".to_string(),
            stale_at: now.checked_add(Duration::from_secs(60)),
        };
        let expired = CachedPage {
            page: "old".to_string(),
            stale_at: Some(now),
        };

        assert!(!fresh.is_stale(now));
        assert!(expired.is_stale(now));
    }
}
