//! Application configuration loaded from environment variables.
//!
//! Read once at startup; nothing mutates it afterwards.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use folio_core::domain::FallbackPolicy;
use folio_core::services::MetadataConfig;
use folio_core::services::assembler::DEFAULT_REVALIDATE_AFTER;
use folio_core::services::metadata::DEFAULT_WORDS_PER_MINUTE;

#[cfg(feature = "prismic")]
use folio_infra::PrismicConfig;
#[cfg(feature = "redis")]
use folio_infra::RedisConfig;

/// Longest accepted revalidation window.
pub const MAX_REVALIDATE_AFTER: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub content: ContentConfig,
    pub pipeline: PipelineConfig,
    pub dates: DateConfig,
    pub comments: Option<CommentsConfig>,
    #[cfg(feature = "redis")]
    pub redis: Option<RedisConfig>,
}

/// Where documents come from.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    #[cfg(feature = "prismic")]
    pub prismic: Option<PrismicConfig>,
    /// JSON fixture catalog used when no content endpoint is configured.
    pub fixtures: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub revalidate_after: Duration,
    pub fallback: FallbackPolicy,
    pub metadata: MetadataConfig,
    /// Assemble every enumerated page at startup.
    pub prebuild: bool,
    pub build_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            revalidate_after: DEFAULT_REVALIDATE_AFTER,
            fallback: FallbackPolicy::default(),
            metadata: MetadataConfig::default(),
            prebuild: true,
            build_concurrency: 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DateConfig {
    pub locale: String,
    pub date_pattern: String,
    pub datetime_pattern: String,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            locale: "pt_BR".to_string(),
            date_pattern: "%d %b %Y".to_string(),
            datetime_pattern: "%d %b %Y, %H:%M".to_string(),
        }
    }
}

/// Utterances comment thread settings.
#[derive(Debug, Clone)]
pub struct CommentsConfig {
    pub repo: String,
    pub theme: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            content: ContentConfig {
                #[cfg(feature = "prismic")]
                prismic: PrismicConfig::from_env(),
                fixtures: env::var("CONTENT_FIXTURES").ok().map(PathBuf::from),
            },
            pipeline: Self::pipeline_from_env(),
            dates: Self::dates_from_env(),
            comments: env::var("COMMENTS_REPO").ok().map(|repo| CommentsConfig {
                repo,
                theme: env::var("COMMENTS_THEME").unwrap_or_else(|_| "github-dark".to_string()),
            }),
            #[cfg(feature = "redis")]
            redis: RedisConfig::from_env(),
        }
    }

    fn pipeline_from_env() -> PipelineConfig {
        let defaults = PipelineConfig::default();

        let fallback = match env::var("PAGE_FALLBACK") {
            Ok(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "Invalid PAGE_FALLBACK, using default");
                defaults.fallback
            }),
            Err(_) => defaults.fallback,
        };

        PipelineConfig {
            revalidate_after: parsed("REVALIDATE_SECONDS")
                .map(revalidate_window)
                .unwrap_or(defaults.revalidate_after),
            fallback,
            metadata: MetadataConfig {
                words_per_minute: parsed("WORDS_PER_MINUTE").unwrap_or(DEFAULT_WORDS_PER_MINUTE),
                edited_prefix: env::var("EDITED_PREFIX")
                    .unwrap_or(defaults.metadata.edited_prefix),
            },
            prebuild: env::var("PREBUILD_PAGES")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.prebuild),
            build_concurrency: parsed("BUILD_CONCURRENCY").unwrap_or(defaults.build_concurrency),
        }
    }

    fn dates_from_env() -> DateConfig {
        let defaults = DateConfig::default();

        DateConfig {
            locale: env::var("DATE_LOCALE").unwrap_or(defaults.locale),
            date_pattern: env::var("DATE_FORMAT").unwrap_or(defaults.date_pattern),
            datetime_pattern: env::var("EDITED_DATE_FORMAT").unwrap_or(defaults.datetime_pattern),
        }
    }
}

/// Revalidation window for a configured number of seconds, capped at
/// [`MAX_REVALIDATE_AFTER`].
fn revalidate_window(secs: u64) -> Duration {
    let requested = Duration::from_secs(secs);
    if requested > MAX_REVALIDATE_AFTER {
        tracing::warn!(
            requested = secs,
            max = MAX_REVALIDATE_AFTER.as_secs(),
            "REVALIDATE_SECONDS too large, capping"
        );
        return MAX_REVALIDATE_AFTER;
    }
    requested
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
