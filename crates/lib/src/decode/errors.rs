//! Error types for the decoding pipeline.

use thiserror::Error;

use crate::{
    document::DocumentError,
    path::{Path, PathStep},
    schema::LookupError,
};

/// Structured error types for decoding failures.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The document value disagrees with the coarse kind the target type
    /// expects.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: Path,
        expected: String,
        found: String,
    },

    /// A required key is absent from its keyed container.
    #[error("key not found: {path}")]
    KeyNotFound { path: Path },

    /// An indexed decode ran past the end of its list.
    #[error("no value at {path}")]
    ValueNotFound { path: Path },

    /// The document holds something the target type cannot represent.
    #[error("data corrupted: {reason}")]
    DataCorrupted { reason: String },

    /// Path resolution failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The document collaborator failed during a read.
    #[error("document error at {path}: {source}")]
    Document { path: Path, source: DocumentError },
}

impl DecodeError {
    /// Check if this error is a coarse kind disagreement.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, DecodeError::TypeMismatch { .. })
    }

    /// Check if this error is a missing required key.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, DecodeError::KeyNotFound { .. })
    }

    /// Check if this error is an indexed decode past the end.
    pub fn is_value_not_found(&self) -> bool {
        matches!(self, DecodeError::ValueNotFound { .. })
    }

    /// Get the path the error is annotated with, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DecodeError::TypeMismatch { path, .. }
            | DecodeError::KeyNotFound { path }
            | DecodeError::ValueNotFound { path }
            | DecodeError::Document { path, .. } => Some(path),
            DecodeError::Lookup(lookup) => lookup.path(),
            DecodeError::DataCorrupted { .. } => None,
        }
    }
}

impl serde::de::Error for DecodeError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        DecodeError::DataCorrupted {
            reason: msg.to_string(),
        }
    }

    fn invalid_type(unexp: serde::de::Unexpected, exp: &dyn serde::de::Expected) -> Self {
        DecodeError::TypeMismatch {
            path: Path::root(),
            expected: exp.to_string(),
            found: unexp.to_string(),
        }
    }

    fn invalid_length(_len: usize, _exp: &dyn serde::de::Expected) -> Self {
        DecodeError::ValueNotFound { path: Path::root() }
    }

    fn missing_field(field: &'static str) -> Self {
        DecodeError::KeyNotFound {
            path: Path::from(vec![PathStep::Key(field.to_string())]),
        }
    }
}

// Conversion from DecodeError to the main Error type
impl From<DecodeError> for crate::Error {
    fn from(err: DecodeError) -> Self {
        crate::Error::Decode(err)
    }
}
