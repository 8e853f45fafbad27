//! Content service clients - Prismic over HTTP and an in-memory catalog.

mod memory;

#[cfg(feature = "prismic")]
mod prismic;

pub use memory::{ContentFixtures, FixtureError, InMemoryContentClient};

#[cfg(feature = "prismic")]
pub use prismic::{PrismicConfig, PrismicContentClient};
