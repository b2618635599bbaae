//! Error types for document collaborator operations.

use thiserror::Error;

use super::ObjId;

/// Structured error types for [`Document`](super::Document) operations.
///
/// The bridge never surfaces these raw: every variant reaching application
/// code arrives wrapped in the lookup/encode/decode taxonomy.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The object id does not address a live object in this document.
    #[error("unknown object {obj}")]
    UnknownObject { obj: ObjId },

    /// An operation addressed an object of the wrong kind, such as a keyed
    /// read against a list.
    #[error("wrong object kind for {obj}: expected {expected}, found {found}")]
    WrongObjectKind {
        obj: ObjId,
        expected: String,
        found: String,
    },

    /// A list or text position was outside the valid range.
    #[error("index {index} out of range for {obj} (length {length})")]
    IndexOutOfRange {
        obj: ObjId,
        index: usize,
        length: usize,
    },

    /// An increment addressed a value that is not a counter.
    #[error("no counter at {prop:?} in {obj}")]
    MissingCounter { obj: ObjId, prop: String },

    /// An implementation-specific failure.
    #[error("document failure: {reason}")]
    Internal { reason: String },
}

impl DocumentError {
    /// Check if this error indicates a missing or unknown target.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DocumentError::UnknownObject { .. } | DocumentError::MissingCounter { .. }
        )
    }

    /// Check if this error is a kind or range violation.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            DocumentError::WrongObjectKind { .. } | DocumentError::IndexOutOfRange { .. }
        )
    }
}

// Conversion from DocumentError to the main Error type
impl From<DocumentError> for crate::Error {
    fn from(err: DocumentError) -> Self {
        crate::Error::Document(err)
    }
}
