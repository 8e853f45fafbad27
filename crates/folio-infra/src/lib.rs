//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`.
//! This crate contains the content service clients, date formatting,
//! rich-text rendering, and page cache backends.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `prismic` - Prismic REST content client via reqwest
//! - `redis` - Redis page cache

pub mod cache;
pub mod content;
pub mod format;
pub mod render;

// Re-exports - In-Memory
pub use cache::InMemoryPageCache;
pub use content::{ContentFixtures, InMemoryContentClient};
pub use format::LocalizedDateFormatter;
pub use render::HtmlRichTextRenderer;

// Re-exports - Prismic
#[cfg(feature = "prismic")]
pub use content::{PrismicConfig, PrismicContentClient};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use cache::{RedisConfig, RedisPageCache};
