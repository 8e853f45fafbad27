//! Raw document to [`Post`] projection.
//!
//! Only the known fields are read; anything else on the document is ignored
//! and the input is never modified.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::{CursorEntry, NavigationLink, Post, RichText, Section};
use crate::error::ContentError;
use crate::ports::RawDocument;

/// Project a raw document into a normalized post.
///
/// Fails with [`ContentError::MalformedDocument`] when the document has no
/// id, no content sections, unreadable dates, or a last publication date
/// earlier than the first.
pub fn normalize(raw: &RawDocument) -> Result<Post, ContentError> {
    let document_id = str_field(raw, "id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ContentError::malformed("<unknown>", "document has no id"))?;
    let id = route_id(raw).unwrap_or(document_id).to_string();

    let data = raw.get("data").unwrap_or(&Value::Null);

    let sections: Vec<Section> = data
        .get("content")
        .and_then(Value::as_array)
        .map(|content| content.iter().map(section).collect())
        .unwrap_or_default();
    if sections.is_empty() {
        return Err(ContentError::malformed(id, "document has no content sections"));
    }

    let first_published_at = date_field(raw, "first_publication_date", &id)?;
    let last_published_at = date_field(raw, "last_publication_date", &id)?;
    if let (Some(first), Some(last)) = (first_published_at, last_published_at) {
        if last < first {
            return Err(ContentError::malformed(
                id,
                "last publication date precedes first publication date",
            ));
        }
    }

    Ok(Post {
        document_id: document_id.to_string(),
        title: text(data.get("title")),
        subtitle: data
            .get("subtitle")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string),
        author: text(data.get("author")),
        banner_url: text(data.get("banner").and_then(|banner| banner.get("url"))),
        first_published_at,
        last_published_at,
        sections,
        id,
    })
}

/// Lightweight projection of a neighboring document.
///
/// Neighbors are only linked, never rendered, so this skips full
/// normalization. Returns `None` when the document has no usable id.
pub fn project_link(raw: &RawDocument) -> Option<NavigationLink> {
    let id = route_id(raw)?;

    Some(NavigationLink {
        id: id.to_string(),
        title: text(raw.get("data").and_then(|data| data.get("title"))),
    })
}

/// Parse a content service timestamp (`2021-03-25T19:25:28+0000` or RFC 3339).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|at| at.with_timezone(&Utc))
        .ok()
}

fn section(raw: &Value) -> Section {
    let body = raw
        .get("body")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    Section {
        heading: text(raw.get("heading")),
        body: RichText::new(body),
    }
}

/// The id a post is routed under: its `uid`, or the document id when the
/// post has none.
pub fn route_id(raw: &RawDocument) -> Option<&str> {
    str_field(raw, "uid")
        .filter(|uid| !uid.is_empty())
        .or_else(|| str_field(raw, "id").filter(|id| !id.is_empty()))
}

/// Position of a document in the publication orderings.
pub fn cursor_entry(raw: &RawDocument) -> Option<CursorEntry<'_>> {
    let document_id = str_field(raw, "id").filter(|id| !id.is_empty())?;
    let date = |key: &str| str_field(raw, key).and_then(parse_timestamp);

    Some(CursorEntry {
        document_id,
        first_published_at: date("first_publication_date"),
        last_published_at: date("last_publication_date"),
    })
}

fn str_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}

fn text(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

fn date_field(raw: &Value, key: &str, id: &str) -> Result<Option<DateTime<Utc>>, ContentError> {
    match raw.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| ContentError::malformed(id, format!("unreadable {key}: {s}"))),
        Some(other) => Err(ContentError::malformed(
            id,
            format!("unexpected {key}: {other}"),
        )),
    }
}
