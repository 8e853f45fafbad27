use async_trait::async_trait;
use std::time::Duration;

/// Rendered page cache - abstraction over the host's storage (Redis, in-memory).
///
/// Entries are serialized page responses keyed by post id. The pipeline
/// never reads this; only the rendering host does.
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Cached page for `id`, if present and still fresh.
    async fn get(&self, id: &str) -> Option<String>;

    /// Store a page that goes stale after `ttl`.
    async fn put(&self, id: &str, page: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Cache operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
