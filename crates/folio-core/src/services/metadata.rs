//! Presentation metadata derived from a normalized post.

use crate::domain::Post;
use crate::ports::DateFormatter;

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Knobs for metadata derivation.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    pub words_per_minute: u32,
    /// Text placed before the formatted date in the edit label.
    pub edited_prefix: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            edited_prefix: "edited on".to_string(),
        }
    }
}

/// Derived values that sit next to the post in the page payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub reading_time_minutes: u32,
    pub is_edited: bool,
    pub edited_label: Option<String>,
    pub published_label: Option<String>,
}

/// Count whitespace-separated words in every heading and body block.
/// Blocks without text count as zero.
pub fn count_words(post: &Post) -> usize {
    post.sections
        .iter()
        .map(|section| {
            let body: usize = section
                .body
                .block_texts()
                .map(|text| text.map_or(0, |t| t.split_whitespace().count()))
                .sum();
            section.heading.split_whitespace().count() + body
        })
        .sum()
}

/// Minutes to read the post, rounded up.
pub fn reading_time_minutes(post: &Post, words_per_minute: u32) -> u32 {
    let words = count_words(post) as u64;
    let per_minute = u64::from(words_per_minute.max(1));
    u32::try_from(words.div_ceil(per_minute)).unwrap_or(u32::MAX)
}

/// A post counts as edited once it was republished after its first release.
pub fn is_edited(post: &Post) -> bool {
    match post.last_published_at {
        Some(last) => post.first_published_at != Some(last),
        None => false,
    }
}

pub fn derive_metadata(
    post: &Post,
    config: &MetadataConfig,
    formatter: &dyn DateFormatter,
) -> PageMetadata {
    let is_edited = is_edited(post);
    let edited_label = post
        .last_published_at
        .filter(|_| is_edited)
        .map(|at| format!("{} {}", config.edited_prefix, formatter.format_datetime(at)));

    PageMetadata {
        reading_time_minutes: reading_time_minutes(post, config.words_per_minute),
        is_edited,
        edited_label,
        published_label: post.first_published_at.map(|at| formatter.format_date(at)),
    }
}
