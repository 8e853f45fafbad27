//! Scripted content client for pipeline tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::AdjacentQuery;
use crate::error::ContentError;
use crate::ports::{ContentClient, FetchOptions, RawDocument};
use crate::services::normalize::{cursor_entry, route_id};

pub(crate) fn raw_post(uid: &str, first: &str, last: &str) -> Value {
    json!({
        "id": format!("doc-{uid}"),
        "uid": uid,
        "type": "posts",
        "first_publication_date": first,
        "last_publication_date": last,
        "data": {
            "title": format!("Post {uid}"),
            "author": "Author",
            "banner": { "url": format!("https://images.example/{uid}.png") },
            "content": [
                {
                    "heading": "Intro",
                    "body": [{ "type": "paragraph", "text": "some body text", "spans": [] }]
                }
            ]
        }
    })
}

pub(crate) struct FakeContentClient {
    published: Vec<Value>,
    previews: HashMap<String, Vec<Value>>,
    fail_adjacent: bool,
}

impl FakeContentClient {
    pub(crate) fn new(published: Vec<Value>) -> Self {
        Self {
            published,
            previews: HashMap::new(),
            fail_adjacent: false,
        }
    }

    pub(crate) fn with_preview(mut self, token: &str, documents: Vec<Value>) -> Self {
        self.previews.insert(token.to_string(), documents);
        self
    }

    pub(crate) fn failing_adjacent(mut self) -> Self {
        self.fail_adjacent = true;
        self
    }
}

#[async_trait]
impl ContentClient for FakeContentClient {
    async fn fetch_by_id(
        &self,
        id: &str,
        options: &FetchOptions,
    ) -> Result<RawDocument, ContentError> {
        let revision: &[Value] = match &options.preview_ref {
            Some(token) => self
                .previews
                .get(token)
                .ok_or_else(|| ContentError::PreviewResolution(token.clone()))?,
            None => &[],
        };

        revision
            .iter()
            .chain(self.published.iter())
            .find(|document| route_id(document) == Some(id))
            .cloned()
            .ok_or_else(|| ContentError::not_found(id))
    }

    async fn query_all_ids(&self) -> Result<Vec<String>, ContentError> {
        Ok(self
            .published
            .iter()
            .filter_map(route_id)
            .map(str::to_string)
            .collect())
    }

    async fn query_adjacent(
        &self,
        query: &AdjacentQuery,
    ) -> Result<Vec<RawDocument>, ContentError> {
        if self.fail_adjacent {
            return Err(ContentError::Transport("connection reset".to_string()));
        }

        let entries = self
            .published
            .iter()
            .filter_map(|document| Some((cursor_entry(document)?, document)));

        Ok(query.select(entries).into_iter().cloned().collect())
    }

    async fn resolve_preview(
        &self,
        token: &str,
        document_id: Option<&str>,
    ) -> Result<String, ContentError> {
        let documents = self
            .previews
            .get(token)
            .ok_or_else(|| ContentError::PreviewResolution(token.to_string()))?;

        documents
            .iter()
            .find(|document| {
                document_id.is_none_or(|id| {
                    document.get("id").and_then(|v| v.as_str()) == Some(id)
                        || route_id(document) == Some(id)
                })
            })
            .and_then(route_id)
            .map(str::to_string)
            .ok_or_else(|| ContentError::PreviewResolution(token.to_string()))
    }
}
