//! Pipeline services - the pure and orchestrating logic of a page build.

pub mod assembler;
pub mod catalog;
pub mod metadata;
pub mod navigation;
pub mod normalize;
pub mod paths;

#[cfg(test)]
pub(crate) mod fake;

pub use assembler::{AssembledPage, PageAssembler};
pub use catalog::{BuildReport, SkippedPage, build_catalog};
pub use metadata::{MetadataConfig, PageMetadata, derive_metadata};
pub use navigation::resolve_navigation;
pub use normalize::normalize;
pub use paths::PathEnumerator;
