//! Build-time catalog: assemble every enumerated id.

use futures::stream::{self, StreamExt};

use crate::domain::PathCatalog;
use crate::error::ContentError;
use crate::ports::FetchOptions;
use crate::services::assembler::{AssembledPage, PageAssembler};
use crate::services::paths::PathEnumerator;

/// An id that could not be built, with the reason.
#[derive(Debug)]
pub struct SkippedPage {
    pub id: String,
    pub error: ContentError,
}

/// Outcome of a catalog build.
#[derive(Debug)]
pub struct BuildReport {
    pub catalog: PathCatalog,
    pub pages: Vec<AssembledPage>,
    pub skipped: Vec<SkippedPage>,
}

impl BuildReport {
    pub fn built_ids(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|page| page.payload.post.id.as_str())
    }
}

/// Assemble every enumerated id with up to `concurrency` builds in flight.
///
/// A failing id is logged and skipped; only a failed enumeration aborts the
/// build.
pub async fn build_catalog(
    enumerator: &PathEnumerator,
    assembler: &PageAssembler,
    concurrency: usize,
) -> Result<BuildReport, ContentError> {
    let catalog = enumerator.enumerate().await?;
    let published = FetchOptions::published();

    let results: Vec<_> = stream::iter(catalog.ids.iter().cloned())
        .map(|id| {
            let published = &published;
            async move {
                let result = assembler.assemble(&id, published).await;
                (id, result)
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut pages = Vec::new();
    let mut skipped = Vec::new();
    for (id, result) in results {
        match result {
            Ok(page) => pages.push(page),
            Err(error) => {
                tracing::warn!(id = %id, error = %error, "Skipping page in catalog build");
                skipped.push(SkippedPage { id, error });
            }
        }
    }

    tracing::info!(
        built = pages.len(),
        skipped = skipped.len(),
        "Catalog build finished"
    );

    Ok(BuildReport {
        catalog,
        pages,
        skipped,
    })
}
