//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent documents or values the core refuses to accept.
///
/// Tree edits themselves never fail: an unknown id is a no-op.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid document: {reason}")]
    InvalidDocument { reason: String },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DomainError {
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            reason: reason.into(),
        }
    }
}
