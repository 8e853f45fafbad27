//! Build-time path enumeration.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{FallbackPolicy, PathCatalog};
use crate::error::ContentError;
use crate::ports::ContentClient;

/// Lists the ids to build eagerly and declares what happens to the rest.
#[derive(Clone)]
pub struct PathEnumerator {
    client: Arc<dyn ContentClient>,
    fallback: FallbackPolicy,
}

impl PathEnumerator {
    pub fn new(client: Arc<dyn ContentClient>, fallback: FallbackPolicy) -> Self {
        Self { client, fallback }
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Every published id, first occurrence kept, plus the fallback policy.
    pub async fn enumerate(&self) -> Result<PathCatalog, ContentError> {
        let mut seen = HashSet::new();
        let ids: Vec<String> = self
            .client
            .query_all_ids()
            .await?
            .into_iter()
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();

        tracing::info!(count = ids.len(), fallback = ?self.fallback, "Enumerated post ids");

        Ok(PathCatalog {
            ids,
            fallback: self.fallback,
        })
    }
}
