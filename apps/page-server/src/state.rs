//! Application state - shared across all handlers.

use std::collections::HashSet;
use std::sync::Arc;

use folio_core::ContentError;
use folio_core::domain::FallbackPolicy;
use folio_core::ports::{ContentClient, DateFormatter, PageCache, RichTextRenderer};
use folio_core::services::{AssembledPage, PageAssembler, PathEnumerator, build_catalog};
use folio_infra::content::FixtureError;
use folio_infra::format::UnknownLocale;
use folio_infra::{
    ContentFixtures, HtmlRichTextRenderer, InMemoryContentClient, InMemoryPageCache,
    LocalizedDateFormatter,
};
use folio_shared::EmbedDirective;
use folio_shared::dto::{PageResponse, SectionHtml};

use crate::config::AppConfig;

#[cfg(feature = "prismic")]
use folio_infra::PrismicContentClient;
#[cfg(feature = "redis")]
use folio_infra::RedisPageCache;

/// Failures that keep the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Locale(#[from] UnknownLocale),

    #[error(transparent)]
    Fixtures(#[from] FixtureError),

    #[error("Content client setup failed: {0}")]
    Content(#[from] ContentError),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<dyn ContentClient>,
    pub assembler: PageAssembler,
    pub enumerator: PathEnumerator,
    pub renderer: Arc<dyn RichTextRenderer>,
    pub cache: Arc<dyn PageCache>,
    pub embeds: Arc<Vec<EmbedDirective>>,
    /// Ids built at startup. Fixed for the life of the process.
    pub built: Arc<HashSet<String>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        let content = Self::content_client(config)?;

        let formatter: Arc<dyn DateFormatter> = Arc::new(LocalizedDateFormatter::new(
            &config.dates.locale,
            config.dates.date_pattern.clone(),
            config.dates.datetime_pattern.clone(),
        )?);

        let cache = Self::page_cache(config).await;

        let embeds = config
            .comments
            .iter()
            .map(|c| EmbedDirective::utterances(c.repo.clone(), c.theme.clone()))
            .collect();

        let mut state = Self::from_parts(
            content,
            formatter,
            cache,
            config.pipeline.fallback,
            embeds,
        );
        state.assembler = state
            .assembler
            .with_metadata(config.pipeline.metadata.clone())
            .with_revalidate_after(config.pipeline.revalidate_after);

        if config.pipeline.prebuild {
            state.prebuild(config.pipeline.build_concurrency).await?;
        }

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// Wire the state from ready-made adapters.
    pub fn from_parts(
        content: Arc<dyn ContentClient>,
        formatter: Arc<dyn DateFormatter>,
        cache: Arc<dyn PageCache>,
        fallback: FallbackPolicy,
        embeds: Vec<EmbedDirective>,
    ) -> Self {
        Self {
            assembler: PageAssembler::new(content.clone(), formatter),
            enumerator: PathEnumerator::new(content.clone(), fallback),
            content,
            renderer: Arc::new(HtmlRichTextRenderer::new()),
            cache,
            embeds: Arc::new(embeds),
            built: Arc::new(HashSet::new()),
        }
    }

    fn content_client(config: &AppConfig) -> Result<Arc<dyn ContentClient>, StartupError> {
        #[cfg(feature = "prismic")]
        if let Some(prismic) = &config.content.prismic {
            return Ok(Arc::new(PrismicContentClient::new(prismic.clone())?));
        }

        let fixtures = match &config.content.fixtures {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading content fixtures");
                ContentFixtures::from_file(path)?
            }
            None => {
                tracing::warn!(
                    "No content endpoint or fixtures configured. Serving an empty catalog."
                );
                ContentFixtures::default()
            }
        };

        Ok(Arc::new(InMemoryContentClient::new(fixtures)))
    }

    async fn page_cache(config: &AppConfig) -> Arc<dyn PageCache> {
        #[cfg(feature = "redis")]
        if let Some(redis) = &config.redis {
            match RedisPageCache::new(redis.clone()).await {
                Ok(cache) => return Arc::new(cache),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to Redis: {}. Using in-memory page cache.",
                        e
                    );
                }
            }
        }

        #[cfg(not(feature = "redis"))]
        let _ = config;

        Arc::new(InMemoryPageCache::new())
    }

    /// Assemble every enumerated page, cache the results, and remember which
    /// ids were built. Pages that fail are skipped.
    pub async fn prebuild(&mut self, concurrency: usize) -> Result<(), ContentError> {
        let report = build_catalog(&self.enumerator, &self.assembler, concurrency).await?;

        let built: HashSet<String> = report.built_ids().map(str::to_string).collect();
        for page in report.pages {
            let id = page.payload.post.id.clone();
            self.store(&id, &self.render(page)).await;
        }

        self.built = Arc::new(built);
        Ok(())
    }

    /// Whether ids outside the built catalog may be resolved on demand.
    pub fn serves(&self, id: &str) -> bool {
        self.built.contains(id) || self.enumerator.fallback().resolves_unknown()
    }

    /// Attach rendered section markup and embeds to an assembled page.
    pub fn render(&self, assembled: AssembledPage) -> PageResponse {
        let sections_html = assembled
            .payload
            .post
            .sections
            .iter()
            .map(|section| SectionHtml {
                heading: section.heading.clone(),
                html: self.renderer.render(&section.body),
            })
            .collect();

        PageResponse {
            page: assembled.payload,
            sections_html,
            embeds: self.embeds.as_ref().clone(),
            revalidate_after_seconds: assembled.revalidate_after.as_secs(),
        }
    }

    /// Cache a published page. Cache failures only cost a rebuild later.
    pub async fn store(&self, id: &str, response: &PageResponse) {
        let body = match serde_json::to_string(response) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Failed to serialize page for cache");
                return;
            }
        };

        if let Err(e) = self
            .cache
            .put(id, &body, self.assembler.revalidate_after())
            .await
        {
            tracing::warn!(id = %id, error = %e, "Failed to cache page");
        }
    }
}
