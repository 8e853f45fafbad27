//! Domain entities - the value objects a page build works with.

mod navigation;
mod page;
mod post;

pub use navigation::{
    AdjacentQuery, CursorEntry, DateField, Direction, Navigation, NavigationLink, Ordering,
};
pub use page::{FallbackPolicy, PagePayload, PathCatalog};
pub use post::{Post, RichText, Section};
