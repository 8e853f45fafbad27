//! Calendar formatting backed by chrono's locale tables.

use chrono::{DateTime, Locale, Utc};

use folio_core::ports::DateFormatter;

#[derive(Debug, thiserror::Error)]
#[error("Unknown locale: {0}")]
pub struct UnknownLocale(pub String);

/// Formats dates with a fixed locale and strftime patterns.
#[derive(Debug, Clone)]
pub struct LocalizedDateFormatter {
    locale: Locale,
    date_pattern: String,
    datetime_pattern: String,
}

impl LocalizedDateFormatter {
    /// `locale` is a POSIX name such as `pt_BR` or `en_US`.
    pub fn new(
        locale: &str,
        date_pattern: impl Into<String>,
        datetime_pattern: impl Into<String>,
    ) -> Result<Self, UnknownLocale> {
        let locale = Locale::try_from(locale).map_err(|_| UnknownLocale(locale.to_string()))?;

        Ok(Self {
            locale,
            date_pattern: date_pattern.into(),
            datetime_pattern: datetime_pattern.into(),
        })
    }
}

impl DateFormatter for LocalizedDateFormatter {
    fn format_date(&self, at: DateTime<Utc>) -> String {
        at.format_localized(&self.date_pattern, self.locale)
            .to_string()
    }

    fn format_datetime(&self, at: DateTime<Utc>) -> String {
        at.format_localized(&self.datetime_pattern, self.locale)
            .to_string()
    }
}
