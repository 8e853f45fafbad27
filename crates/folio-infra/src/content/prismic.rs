//! Prismic REST content client.
//!
//! Talks to the API v2 endpoints: the API root for the current master ref,
//! `documents/search` for every query, and the preview session URL when a
//! preview token is activated.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use folio_core::ContentError;
use folio_core::domain::{AdjacentQuery, DateField};
use folio_core::ports::{ContentClient, FetchOptions, RawDocument};
use folio_core::services::normalize::route_id;

/// Prismic repository configuration.
#[derive(Debug, Clone)]
pub struct PrismicConfig {
    /// API v2 entry point, e.g. `https://my-blog.cdn.prismic.io/api/v2`.
    pub endpoint: String,
    pub access_token: Option<String>,
    /// Custom type holding the posts.
    pub document_type: String,
    /// Page size used when listing every post.
    pub page_size: u32,
    pub timeout: Duration,
    /// Repository whose preview sessions are accepted. Defaults to the first
    /// label of the endpoint host.
    pub repository: Option<String>,
    /// How long a master ref is reused before the API root is asked again.
    pub ref_ttl: Duration,
}

impl PrismicConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let repository = Url::parse(&endpoint)
            .ok()
            .and_then(|url| url.host_str()?.split('.').next().map(str::to_string));

        Self {
            endpoint,
            access_token: None,
            document_type: "posts".to_string(),
            page_size: 100,
            timeout: Duration::from_secs(10),
            repository,
            ref_ttl: Duration::from_secs(5),
        }
    }

    /// Load configuration from environment variables.
    /// Returns `None` when `PRISMIC_API_ENDPOINT` is not set.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("PRISMIC_API_ENDPOINT").ok()?;
        let mut config = Self::new(endpoint);

        config.access_token = std::env::var("PRISMIC_ACCESS_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());
        if let Ok(document_type) = std::env::var("PRISMIC_DOCUMENT_TYPE") {
            config.document_type = document_type;
        }
        if let Some(secs) = std::env::var("PRISMIC_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(repository) = std::env::var("PRISMIC_REPOSITORY") {
            config.repository = Some(repository);
        }
        if let Some(secs) = std::env::var("PRISMIC_REF_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.ref_ttl = Duration::from_secs(secs);
        }

        Some(config)
    }
}

#[derive(Debug, Deserialize)]
struct ApiInfo {
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default = "first_page")]
    total_pages: u32,
    results: Vec<Value>,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct PreviewSession {
    #[serde(rename = "mainDocument")]
    main_document: Option<String>,
}

/// One `documents/search` request.
#[derive(Debug, Default)]
struct SearchQuery {
    predicates: Vec<String>,
    page: u32,
    page_size: u32,
    orderings: Option<String>,
    after: Option<String>,
}

impl SearchQuery {
    fn q(&self) -> String {
        format!("[{}]", self.predicates.concat())
    }
}

/// `[at(path,"value")]`, or `None` when the value cannot be quoted safely.
fn at(path: &str, value: &str) -> Option<String> {
    if value.is_empty() || value.contains(['"', '\\', ']']) {
        return None;
    }
    Some(format!("[at({path},\"{value}\")]"))
}

fn ordering(query: &AdjacentQuery) -> String {
    let field = match query.ordering.field {
        DateField::FirstPublication => "document.first_publication_date",
        DateField::LastPublication => "document.last_publication_date",
    };
    if query.ordering.descending {
        format!("[{field} desc]")
    } else {
        format!("[{field}]")
    }
}

fn transport(e: reqwest::Error) -> ContentError {
    ContentError::Transport(e.to_string())
}

struct MasterRef {
    reference: String,
    fetched_at: Instant,
}

/// HTTP client for one Prismic repository.
pub struct PrismicContentClient {
    http: reqwest::Client,
    config: PrismicConfig,
    master: Mutex<Option<MasterRef>>,
}

impl PrismicContentClient {
    pub fn new(config: PrismicConfig) -> Result<Self, ContentError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(transport)?;

        tracing::info!(endpoint = %config.endpoint, "Prismic content client configured");

        Ok(Self {
            http,
            config,
            master: Mutex::new(None),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        mut params: Vec<(&str, String)>,
        preview: bool,
    ) -> Result<T, ContentError> {
        if let Some(token) = &self.config.access_token {
            params.push(("access_token", token.clone()));
        }

        let response = self
            .http
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url = %url, status = %status, "Prismic request failed");
            return Err(if preview && status.is_client_error() {
                ContentError::PreviewResolution(format!("preview ref rejected ({status})"))
            } else {
                ContentError::Transport(format!("content service returned {status}"))
            });
        }

        response.json::<T>().await.map_err(transport)
    }

    /// Current master ref, reused for `ref_ttl` so that the queries of one
    /// page build all read the same release.
    async fn master_ref(&self) -> Result<String, ContentError> {
        let mut master = self.master.lock().await;
        if let Some(cached) = master
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.config.ref_ttl)
        {
            return Ok(cached.reference.clone());
        }

        let info: ApiInfo = self
            .get_json(&self.config.endpoint, Vec::new(), false)
            .await?;
        let reference = info
            .refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or_else(|| ContentError::Transport("API root lists no master ref".to_string()))?;

        tracing::debug!(reference = %reference, "Master ref refreshed");
        *master = Some(MasterRef {
            reference: reference.clone(),
            fetched_at: Instant::now(),
        });
        Ok(reference)
    }

    async fn search(
        &self,
        reference: &str,
        query: &SearchQuery,
        preview: bool,
    ) -> Result<SearchResponse, ContentError> {
        let mut params = vec![
            ("ref", reference.to_string()),
            ("q", query.q()),
            ("page", query.page.max(1).to_string()),
            ("pageSize", query.page_size.max(1).to_string()),
        ];
        if let Some(orderings) = &query.orderings {
            params.push(("orderings", orderings.clone()));
        }
        if let Some(after) = &query.after {
            params.push(("after", after.clone()));
        }

        let url = format!("{}/documents/search", self.config.endpoint);
        self.get_json(&url, params, preview).await
    }

    /// First document matching `predicates`, if any.
    async fn first(
        &self,
        reference: &str,
        predicates: Vec<String>,
        preview: bool,
    ) -> Result<Option<Value>, ContentError> {
        let query = SearchQuery {
            predicates,
            page: 1,
            page_size: 1,
            ..Default::default()
        };

        Ok(self
            .search(reference, &query, preview)
            .await?
            .results
            .into_iter()
            .next())
    }

    fn type_predicate(&self) -> Result<String, ContentError> {
        at("document.type", &self.config.document_type).ok_or_else(|| {
            ContentError::Transport(format!(
                "invalid document type: {}",
                self.config.document_type
            ))
        })
    }

    /// Only preview sessions of this repository are followed.
    fn preview_session_url(&self, token: &str) -> Result<Url, ContentError> {
        let rejected = || ContentError::PreviewResolution("invalid preview token".to_string());

        let url = Url::parse(token).map_err(|_| rejected())?;
        let repository = self.config.repository.as_deref().ok_or_else(rejected)?;
        let host = url.host_str().ok_or_else(rejected)?;

        let same_repository =
            host.starts_with(&format!("{repository}.")) && host.ends_with(".prismic.io");
        if url.scheme() != "https" || !same_repository {
            return Err(rejected());
        }

        Ok(url)
    }
}

#[async_trait]
impl ContentClient for PrismicContentClient {
    async fn fetch_by_id(
        &self,
        id: &str,
        options: &FetchOptions,
    ) -> Result<RawDocument, ContentError> {
        let uid_path = format!("my.{}.uid", self.config.document_type);
        let (Some(by_uid), Some(by_id)) = (at(&uid_path, id), at("document.id", id)) else {
            return Err(ContentError::not_found(id));
        };

        let reference = match &options.preview_ref {
            Some(preview_ref) => preview_ref.clone(),
            None => self.master_ref().await?,
        };
        let preview = options.is_preview();
        let type_predicate = self.type_predicate()?;

        if let Some(document) = self
            .first(&reference, vec![type_predicate.clone(), by_uid], preview)
            .await?
        {
            return Ok(document);
        }

        // Posts without a uid are routed under their document id
        self.first(&reference, vec![type_predicate, by_id], preview)
            .await?
            .filter(|document| route_id(document) == Some(id))
            .ok_or_else(|| ContentError::not_found(id))
    }

    async fn query_all_ids(&self) -> Result<Vec<String>, ContentError> {
        let reference = self.master_ref().await?;
        let mut query = SearchQuery {
            predicates: vec![self.type_predicate()?],
            page: 1,
            page_size: self.config.page_size,
            ..Default::default()
        };

        let mut ids = Vec::new();
        loop {
            let response = self.search(&reference, &query, false).await?;
            ids.extend(
                response
                    .results
                    .iter()
                    .filter_map(route_id)
                    .map(str::to_string),
            );

            if response.page >= response.total_pages {
                break;
            }
            query.page = response.page + 1;
        }

        Ok(ids)
    }

    async fn query_adjacent(
        &self,
        query: &AdjacentQuery,
    ) -> Result<Vec<RawDocument>, ContentError> {
        // A never-published anchor has no position in a publication ordering
        if query.anchor_date.is_none() {
            return Ok(Vec::new());
        }

        let reference = self.master_ref().await?;
        let search = SearchQuery {
            predicates: vec![self.type_predicate()?],
            page: 1,
            page_size: u32::try_from(query.page_size).unwrap_or(1),
            orderings: Some(ordering(query)),
            after: Some(query.anchor_document_id.clone()),
        };

        Ok(self.search(&reference, &search, false).await?.results)
    }

    async fn resolve_preview(
        &self,
        token: &str,
        document_id: Option<&str>,
    ) -> Result<String, ContentError> {
        let session_url = self.preview_session_url(token)?;

        let document_id = match document_id {
            Some(id) => id.to_string(),
            None => {
                let session: PreviewSession =
                    self.get_json(session_url.as_str(), Vec::new(), true).await?;
                session.main_document.ok_or_else(|| {
                    ContentError::PreviewResolution("preview has no main document".to_string())
                })?
            }
        };

        let by_id = at("document.id", &document_id).ok_or_else(|| {
            ContentError::PreviewResolution(format!("invalid document id: {document_id}"))
        })?;
        let document = self
            .first(token, vec![self.type_predicate()?, by_id], true)
            .await?;
        document
            .as_ref()
            .and_then(route_id)
            .map(str::to_string)
            .ok_or_else(|| {
                ContentError::PreviewResolution(format!(
                    "preview document {document_id} is not a post"
                ))
            })
    }
}
