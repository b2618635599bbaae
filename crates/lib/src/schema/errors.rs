//! Error types for schema-path resolution.

use thiserror::Error;

use crate::{
    document::DocumentError,
    path::{Path, PathError},
};

/// Structured error types for path resolution failures.
///
/// Every variant that can point at a location carries the partial path that
/// was resolved when the failure occurred, so callers can locate the
/// offending field without replaying the traversal.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LookupError {
    /// The document answered inconsistently across the calls of one
    /// traversal, such as an in-bounds index reading back as absent.
    #[error("unexpected lookup failure at {path}: {reason}")]
    UnexpectedLookupFailure { path: Path, reason: String },

    /// A human-authored path segment could not be understood.
    #[error("invalid path element '{segment}'")]
    InvalidPathElement { segment: String },

    /// An index step addressed an empty list under a read-only strategy.
    #[error("index lookup into empty list at {path}")]
    EmptyListIndex { path: Path },

    /// An index step was outside the valid range for its list.
    #[error("index {index} out of bounds at {path} (length {length})")]
    IndexOutOfBounds {
        path: Path,
        index: usize,
        length: usize,
    },

    /// A key step was applied to a container that is not a map.
    #[error("key lookup against a non-map container at {path}")]
    InvalidValueLookup { path: Path },

    /// An index step was applied to a container that is not a list.
    #[error("index lookup against a non-list container at {path}")]
    InvalidIndexLookup { path: Path },

    /// The path tries to descend through a text object, which is a leaf.
    #[error("path {path} extends through a text leaf")]
    PathExtendsThroughText { path: Path },

    /// The path tries to descend through a scalar value.
    #[error("path {path} extends through a scalar value")]
    PathExtendsThroughScalar { path: Path },

    /// A node exists at the final path step but has the wrong kind.
    #[error("mismatched schema at {path}: expected {expected}, found {found}")]
    MismatchedSchema {
        path: Path,
        expected: String,
        found: String,
    },

    /// A required node is absent and the strategy forbids creating it.
    #[error("schema missing at {path}")]
    SchemaMissing { path: Path },

    /// A single-value container was requested for the root path.
    #[error("a single-value container requires a non-empty path")]
    NoPathForSingleValue,

    /// The document collaborator itself failed.
    #[error("document error at {path}: {source}")]
    Underlying { path: Path, source: DocumentError },
}

impl LookupError {
    /// Check if this error means a required node is absent.
    pub fn is_schema_missing(&self) -> bool {
        matches!(self, LookupError::SchemaMissing { .. })
    }

    /// Check if this error is a schema shape disagreement.
    pub fn is_mismatched_schema(&self) -> bool {
        matches!(self, LookupError::MismatchedSchema { .. })
    }

    /// Check if this error is an index bound violation.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            LookupError::IndexOutOfBounds { .. } | LookupError::EmptyListIndex { .. }
        )
    }

    /// Check if this error wraps a document collaborator failure.
    pub fn is_underlying(&self) -> bool {
        matches!(self, LookupError::Underlying { .. })
    }

    /// Get the partial path at which resolution failed, if recorded.
    pub fn path(&self) -> Option<&Path> {
        match self {
            LookupError::UnexpectedLookupFailure { path, .. }
            | LookupError::EmptyListIndex { path }
            | LookupError::IndexOutOfBounds { path, .. }
            | LookupError::InvalidValueLookup { path }
            | LookupError::InvalidIndexLookup { path }
            | LookupError::PathExtendsThroughText { path }
            | LookupError::PathExtendsThroughScalar { path }
            | LookupError::MismatchedSchema { path, .. }
            | LookupError::SchemaMissing { path }
            | LookupError::Underlying { path, .. } => Some(path),
            LookupError::InvalidPathElement { .. } | LookupError::NoPathForSingleValue => None,
        }
    }
}

impl From<PathError> for LookupError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::InvalidIndexSegment { segment } => {
                LookupError::InvalidPathElement { segment }
            }
        }
    }
}

// Conversion from LookupError to the main Error type
impl From<LookupError> for crate::Error {
    fn from(err: LookupError) -> Self {
        crate::Error::Lookup(err)
    }
}
