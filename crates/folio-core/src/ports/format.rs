use chrono::{DateTime, Utc};

/// Calendar formatting, locale and pattern included.
pub trait DateFormatter: Send + Sync {
    /// Short form used for the publication date.
    fn format_date(&self, at: DateTime<Utc>) -> String;

    /// Long form used in the "edited on" label.
    fn format_datetime(&self, at: DateTime<Utc>) -> String;
}
