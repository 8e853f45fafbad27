//! Page assembly - the orchestration of one page build.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::PagePayload;
use crate::error::ContentError;
use crate::ports::{ContentClient, DateFormatter, FetchOptions};
use crate::services::metadata::{MetadataConfig, derive_metadata};
use crate::services::navigation::resolve_navigation;
use crate::services::normalize::normalize;

/// Interval after which a cached page is considered stale.
pub const DEFAULT_REVALIDATE_AFTER: Duration = Duration::from_secs(30 * 60);

/// A payload together with the revalidation directive for the host.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledPage {
    pub payload: PagePayload,
    pub revalidate_after: Duration,
}

/// Composes fetch, normalization, metadata, and navigation into a payload.
///
/// Holds no per-build state: every call works on its own fetched data, so a
/// single assembler can serve concurrent builds.
#[derive(Clone)]
pub struct PageAssembler {
    client: Arc<dyn ContentClient>,
    formatter: Arc<dyn DateFormatter>,
    metadata: MetadataConfig,
    revalidate_after: Duration,
}

impl PageAssembler {
    pub fn new(client: Arc<dyn ContentClient>, formatter: Arc<dyn DateFormatter>) -> Self {
        Self {
            client,
            formatter,
            metadata: MetadataConfig::default(),
            revalidate_after: DEFAULT_REVALIDATE_AFTER,
        }
    }

    pub fn with_metadata(mut self, metadata: MetadataConfig) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_revalidate_after(mut self, revalidate_after: Duration) -> Self {
        self.revalidate_after = revalidate_after;
        self
    }

    pub fn revalidate_after(&self) -> Duration {
        self.revalidate_after
    }

    /// Build the page for `id`.
    ///
    /// `NotFound`, `MalformedDocument`, and `PreviewResolution` reach the
    /// caller exactly as the lower layers raised them.
    #[tracing::instrument(skip(self, options), fields(preview = options.is_preview()))]
    pub async fn assemble(
        &self,
        id: &str,
        options: &FetchOptions,
    ) -> Result<AssembledPage, ContentError> {
        let raw = self.client.fetch_by_id(id, options).await?;
        let post = normalize(&raw)?;
        let metadata = derive_metadata(&post, &self.metadata, self.formatter.as_ref());
        let navigation = resolve_navigation(self.client.as_ref(), &post).await?;

        tracing::debug!(
            post = %post.id,
            reading_time = metadata.reading_time_minutes,
            edited = metadata.is_edited,
            "Page assembled"
        );

        Ok(AssembledPage {
            payload: PagePayload {
                post,
                reading_time_minutes: metadata.reading_time_minutes,
                is_edited: metadata.is_edited,
                edited_label: metadata.edited_label,
                published_label: metadata.published_label,
                navigation,
                preview_mode: options.is_preview(),
            },
            revalidate_after: self.revalidate_after,
        })
    }
}
