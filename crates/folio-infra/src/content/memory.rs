//! In-memory content catalog.
//!
//! Serves documents in the content service's raw shape from a fixture set.
//! Used offline, in tests, and whenever no content endpoint is configured.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use folio_core::ContentError;
use folio_core::domain::AdjacentQuery;
use folio_core::ports::{ContentClient, FetchOptions, RawDocument};
use folio_core::services::normalize::{cursor_entry, route_id};

/// Published documents plus draft revisions keyed by preview token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentFixtures {
    #[serde(default)]
    pub documents: Vec<Value>,
    #[serde(default)]
    pub previews: HashMap<String, Vec<Value>>,
}

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Failed to read fixtures: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse fixtures: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ContentFixtures {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Content client over an immutable in-memory fixture set.
pub struct InMemoryContentClient {
    fixtures: ContentFixtures,
}

impl InMemoryContentClient {
    pub fn new(fixtures: ContentFixtures) -> Self {
        tracing::info!(
            documents = fixtures.documents.len(),
            previews = fixtures.previews.len(),
            "In-memory content catalog loaded"
        );
        Self { fixtures }
    }

    fn preview_revision(&self, token: &str) -> Result<&[Value], ContentError> {
        self.fixtures
            .previews
            .get(token)
            .map(Vec::as_slice)
            .ok_or_else(|| ContentError::PreviewResolution("unknown preview token".to_string()))
    }

    fn published(&self) -> impl Iterator<Item = &Value> {
        self.fixtures.documents.iter().filter(|doc| is_post(doc))
    }
}

fn is_post(document: &Value) -> bool {
    matches!(document.get("type").and_then(Value::as_str), None | Some("posts"))
}

fn str_field<'a>(document: &'a Value, key: &str) -> Option<&'a str> {
    document.get(key).and_then(Value::as_str)
}


#[async_trait]
impl ContentClient for InMemoryContentClient {
    async fn fetch_by_id(
        &self,
        id: &str,
        options: &FetchOptions,
    ) -> Result<RawDocument, ContentError> {
        let revision: &[Value] = match &options.preview_ref {
            Some(token) => self.preview_revision(token)?,
            None => &[],
        };

        revision
            .iter()
            .filter(|doc| is_post(doc))
            .chain(self.published())
            .find(|doc| route_id(doc) == Some(id))
            .cloned()
            .ok_or_else(|| ContentError::not_found(id))
    }

    async fn query_all_ids(&self) -> Result<Vec<String>, ContentError> {
        Ok(self
            .published()
            .filter_map(route_id)
            .map(str::to_string)
            .collect())
    }

    async fn query_adjacent(
        &self,
        query: &AdjacentQuery,
    ) -> Result<Vec<RawDocument>, ContentError> {
        let entries = self
            .published()
            .filter_map(|doc| Some((cursor_entry(doc)?, doc)));

        Ok(query.select(entries).into_iter().cloned().collect())
    }

    async fn resolve_preview(
        &self,
        token: &str,
        document_id: Option<&str>,
    ) -> Result<String, ContentError> {
        let revision = self.preview_revision(token)?;

        let target = match document_id {
            Some(wanted) => revision
                .iter()
                .find(|doc| str_field(doc, "id") == Some(wanted) || route_id(doc) == Some(wanted)),
            None => revision.first(),
        };

        target
            .and_then(route_id)
            .map(str::to_string)
            .ok_or_else(|| {
                ContentError::PreviewResolution("preview resolves to no document".to_string())
            })
    }
}
