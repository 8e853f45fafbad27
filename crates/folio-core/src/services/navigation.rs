//! Previous/next neighbor resolution.

use crate::domain::{AdjacentQuery, Direction, Navigation, NavigationLink, Post};
use crate::error::ContentError;
use crate::ports::ContentClient;
use crate::services::normalize::project_link;

/// Resolve both neighbors of `anchor`.
///
/// The two sides are independent queries and run concurrently. An empty
/// result on either side is an absent link, not an error; transport
/// failures still propagate.
pub async fn resolve_navigation(
    client: &dyn ContentClient,
    anchor: &Post,
) -> Result<Navigation, ContentError> {
    let previous_query = AdjacentQuery::for_anchor(Direction::Previous, anchor);
    let next_query = AdjacentQuery::for_anchor(Direction::Next, anchor);

    let (previous, next) = futures::try_join!(
        neighbor(client, &previous_query, anchor),
        neighbor(client, &next_query, anchor),
    )?;

    Ok(Navigation { previous, next })
}

async fn neighbor(
    client: &dyn ContentClient,
    query: &AdjacentQuery,
    anchor: &Post,
) -> Result<Option<NavigationLink>, ContentError> {
    let documents = client.query_adjacent(query).await?;

    let link = documents
        .first()
        .and_then(project_link)
        .filter(|link| link.id != anchor.id);

    if link.is_none() && !documents.is_empty() {
        tracing::warn!(
            anchor = %anchor.id,
            direction = ?query.direction,
            "Neighbor document has no usable id"
        );
    }

    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FetchOptions;
    use crate::services::fake::{FakeContentClient, raw_post};
    use crate::services::normalize::normalize;

    fn catalog() -> FakeContentClient {
        FakeContentClient::new(vec![
            raw_post("p1", "2021-01-01T12:00:00+0000", "2021-01-01T12:00:00+0000"),
            raw_post("p2", "2021-01-02T12:00:00+0000", "2021-01-05T12:00:00+0000"),
            raw_post("p3", "2021-01-03T12:00:00+0000", "2021-01-03T12:00:00+0000"),
        ])
    }

    async fn anchor(client: &FakeContentClient, id: &str) -> Post {
        let raw = client
            .fetch_by_id(id, &FetchOptions::published())
            .await
            .unwrap();
        normalize(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_neighbors_use_different_orderings() {
        let client = catalog();
        let post = anchor(&client, "p2").await;

        let navigation = resolve_navigation(&client, &post).await.unwrap();

        assert_eq!(navigation.previous.map(|l| l.id).as_deref(), Some("p1"));
        assert_eq!(navigation.next.map(|l| l.id).as_deref(), Some("p3"));
    }

    #[tokio::test]
    async fn test_earliest_post_has_no_previous() {
        let client = catalog();
        let post = anchor(&client, "p1").await;

        let navigation = resolve_navigation(&client, &post).await.unwrap();

        assert!(navigation.previous.is_none());
        assert!(navigation.next.is_none());
    }

    #[tokio::test]
    async fn test_links_carry_titles() {
        let client = catalog();
        let post = anchor(&client, "p3").await;

        let navigation = resolve_navigation(&client, &post).await.unwrap();

        let previous = navigation.previous.unwrap();
        assert_eq!(previous.id, "p2");
        assert_eq!(previous.title, "Post p2");
        assert_eq!(navigation.next.map(|l| l.id).as_deref(), Some("p1"));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let client = catalog().failing_adjacent();
        let post = anchor(&client, "p2").await;

        let result = resolve_navigation(&client, &post).await;
        assert!(matches!(result, Err(ContentError::Transport(_))));
    }
}
