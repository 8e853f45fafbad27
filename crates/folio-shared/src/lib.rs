//! # Folio Shared
//!
//! Types exchanged between the page server and whatever renders its
//! responses: page and path payloads, embed directives, error bodies.

pub mod dto;
pub mod embed;
pub mod response;

pub use embed::EmbedDirective;
pub use response::ErrorResponse;
