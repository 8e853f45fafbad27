//! Content service port.

use async_trait::async_trait;

use crate::domain::AdjacentQuery;
use crate::error::ContentError;

/// A document exactly as the content service returned it.
pub type RawDocument = serde_json::Value;

/// Per-call options for document fetches, resolved once at the call boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Content revision to read instead of the published one.
    pub preview_ref: Option<String>,
}

impl FetchOptions {
    pub fn published() -> Self {
        Self::default()
    }

    pub fn preview(preview_ref: impl Into<String>) -> Self {
        Self {
            preview_ref: Some(preview_ref.into()),
        }
    }

    pub fn is_preview(&self) -> bool {
        self.preview_ref.is_some()
    }
}

/// Content client - abstraction over the headless content API.
///
/// Every call maps to remote requests; retries and timeouts belong to the
/// implementation's transport.
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// Fetch one post document by route id.
    ///
    /// Fails with [`ContentError::NotFound`] when nothing matches `id`.
    async fn fetch_by_id(
        &self,
        id: &str,
        options: &FetchOptions,
    ) -> Result<RawDocument, ContentError>;

    /// List the route ids of every published post.
    async fn query_all_ids(&self) -> Result<Vec<String>, ContentError>;

    /// Run a cursor query relative to an anchor document.
    /// An empty result is a valid answer.
    async fn query_adjacent(&self, query: &AdjacentQuery)
    -> Result<Vec<RawDocument>, ContentError>;

    /// Resolve a preview token to the route id of the previewed post.
    async fn resolve_preview(
        &self,
        token: &str,
        document_id: Option<&str>,
    ) -> Result<String, ContentError>;
}
