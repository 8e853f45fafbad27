use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Post;

/// Minimal projection of a neighboring post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationLink {
    pub id: String,
    pub title: String,
}

impl From<&Post> for NavigationLink {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
        }
    }
}

/// Neighbors of an anchor post. Either side may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub previous: Option<NavigationLink>,
    pub next: Option<NavigationLink>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Previous,
    Next,
}

/// Publication date a catalog ordering is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    FirstPublication,
    LastPublication,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    pub field: DateField,
    pub descending: bool,
}

/// Cursor query: the first `page_size` documents strictly after the anchor
/// in `ordering`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacentQuery {
    pub direction: Direction,
    pub anchor_document_id: String,
    /// The anchor's value for `ordering.field`.
    pub anchor_date: Option<DateTime<Utc>>,
    pub ordering: Ordering,
    pub page_size: usize,
}

impl AdjacentQuery {
    /// Build the query for one side of the navigation.
    ///
    /// `Previous` walks first-publication dates and `Next` walks
    /// last-publication dates, both newest first.
    pub fn for_anchor(direction: Direction, anchor: &Post) -> Self {
        let (field, anchor_date) = match direction {
            Direction::Previous => (DateField::FirstPublication, anchor.first_published_at),
            Direction::Next => (DateField::LastPublication, anchor.last_published_at),
        };

        Self {
            direction,
            anchor_document_id: anchor.document_id.clone(),
            anchor_date,
            ordering: Ordering {
                field,
                descending: true,
            },
            page_size: 1,
        }
    }
}

/// A catalog document as seen by a cursor query.
#[derive(Debug, Clone, Copy)]
pub struct CursorEntry<'a> {
    pub document_id: &'a str,
    pub first_published_at: Option<DateTime<Utc>>,
    pub last_published_at: Option<DateTime<Utc>>,
}

impl AdjacentQuery {
    /// Sort key of an entry. Missing dates sort as the oldest; ties fall
    /// back to the document id.
    fn key<'a>(&self, entry: &CursorEntry<'a>) -> (Option<DateTime<Utc>>, &'a str) {
        let date = match self.ordering.field {
            DateField::FirstPublication => entry.first_published_at,
            DateField::LastPublication => entry.last_published_at,
        };
        (date, entry.document_id)
    }

    /// Whether `entry` lies strictly after the anchor in this ordering.
    pub fn is_after(&self, entry: &CursorEntry<'_>) -> bool {
        if entry.document_id == self.anchor_document_id {
            return false;
        }
        let key = self.key(entry);
        let anchor = (self.anchor_date, self.anchor_document_id.as_str());
        if self.ordering.descending {
            key < anchor
        } else {
            key > anchor
        }
    }

    /// Walk `entries` from the anchor and keep the first `page_size` hits.
    pub fn select<'a, T>(&self, entries: impl IntoIterator<Item = (CursorEntry<'a>, T)>) -> Vec<T> {
        let mut hits: Vec<_> = entries
            .into_iter()
            .filter(|(entry, _)| self.is_after(entry))
            .collect();

        hits.sort_by(|(a, _), (b, _)| {
            let order = self.key(a).cmp(&self.key(b));
            if self.ordering.descending {
                order.reverse()
            } else {
                order
            }
        });

        hits.into_iter()
            .take(self.page_size)
            .map(|(_, item)| item)
            .collect()
    }
}
