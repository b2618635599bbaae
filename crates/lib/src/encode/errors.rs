//! Error types for the encoding pipeline.

use thiserror::Error;

use crate::{document::DocumentError, path::Path, schema::LookupError};

/// Structured error types for encoding failures.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A cautious write found an existing value of an incompatible coarse
    /// type at the target location.
    #[error("type mismatch at {path}: cannot write {attempted} over existing {existing}")]
    TypeMismatch {
        path: Path,
        attempted: String,
        existing: String,
    },

    /// A NaN or infinite float was rejected before writing.
    #[error("non-finite float at {path} cannot be encoded")]
    NonFiniteFloat { path: Path },

    /// Path resolution failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The document collaborator failed during a write.
    #[error("document error at {path}: {source}")]
    Document { path: Path, source: DocumentError },

    /// A failure reported by a value's own `Serialize` implementation.
    #[error("{0}")]
    Message(String),
}

impl EncodeError {
    /// Check if this error is a cautious-write type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, EncodeError::TypeMismatch { .. })
    }

    /// Check if this error is a rejected non-finite float.
    pub fn is_non_finite(&self) -> bool {
        matches!(self, EncodeError::NonFiniteFloat { .. })
    }

    /// Check if this error originated in path resolution.
    pub fn is_lookup(&self) -> bool {
        matches!(self, EncodeError::Lookup(_))
    }
}

impl serde::ser::Error for EncodeError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        EncodeError::Message(msg.to_string())
    }
}

// Conversion from EncodeError to the main Error type
impl From<EncodeError> for crate::Error {
    fn from(err: EncodeError) -> Self {
        crate::Error::Encode(err)
    }
}
