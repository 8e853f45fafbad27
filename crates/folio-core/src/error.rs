//! Pipeline error types.

use thiserror::Error;

/// Errors raised while resolving and assembling a page.
///
/// Adapters produce these, the assembler passes them through untouched and
/// only the host boundary turns them into visible outcomes.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The identifier does not resolve to any document.
    #[error("Document not found: {id}")]
    NotFound { id: String },

    /// The document exists but cannot be normalized into a post.
    #[error("Malformed document {id}: {reason}")]
    MalformedDocument { id: String, reason: String },

    /// The preview token is unknown, expired, or resolves to nothing.
    #[error("Preview resolution failed: {0}")]
    PreviewResolution(String),

    /// The content service could not be reached or answered unexpectedly.
    #[error("Content service error: {0}")]
    Transport(String),
}

impl ContentError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
