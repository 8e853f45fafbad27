//! Data Transfer Objects - request/response types for the page server.

use serde::{Deserialize, Serialize};

use folio_core::domain::{FallbackPolicy, PagePayload, PathCatalog};

use crate::embed::EmbedDirective;

/// One section with its body already converted to markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionHtml {
    pub heading: String,
    pub html: String,
}

/// Render input for one post page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    #[serde(flatten)]
    pub page: PagePayload,
    pub sections_html: Vec<SectionHtml>,
    pub embeds: Vec<EmbedDirective>,
    pub revalidate_after_seconds: u64,
}

/// Ids to pre-build and the policy for the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsResponse {
    pub ids: Vec<String>,
    pub fallback: FallbackPolicy,
}

impl From<PathCatalog> for PathsResponse {
    fn from(catalog: PathCatalog) -> Self {
        Self {
            ids: catalog.ids,
            fallback: catalog.fallback,
        }
    }
}

/// Query string of the preview activation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuery {
    pub token: String,
    pub document_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_query_uses_camel_case() {
        let query: PreviewQuery = serde_json::from_value(serde_json::json!({
            "token": "https://repo.prismic.io/previews/abc",
            "documentId": "YF1x2BAAACMAq9zX"
        }))
        .unwrap();

        assert_eq!(query.document_id.as_deref(), Some("YF1x2BAAACMAq9zX"));
    }

    #[test]
    fn test_paths_response_serializes_policy() {
        let response = PathsResponse::from(PathCatalog {
            ids: vec!["a".to_string()],
            fallback: FallbackPolicy::Blocking,
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["fallback"], "blocking");
        assert_eq!(value["ids"][0], "a");
    }
}
