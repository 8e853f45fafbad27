//! Ports - trait definitions for external collaborators.
//! These are the "interfaces" that infrastructure must implement.

mod cache;
mod content;
mod format;
mod render;

pub use cache::{CacheError, PageCache};
pub use content::{ContentClient, FetchOptions, RawDocument};
pub use format::DateFormatter;
pub use render::RichTextRenderer;
