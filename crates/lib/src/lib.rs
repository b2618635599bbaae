//!
//! Doclens: a typed lens between application values and collaborative
//! documents.
//!
//! A collaborative document exposes only low-level keyed/indexed operations
//! over opaque object ids. Doclens maps rich application types (structs,
//! vectors, maps, options, enums) onto that surface through serde, without
//! hand-written per-field traversal code.
//!
//! ## Core Concepts
//!
//! * **Document (`document::Document`)**: the low-level collaborator
//!   contract: typed get/put/insert/delete by `(object id, key or index)`,
//!   object creation, and text/counter primitives. A reference in-memory
//!   implementation backs tests and examples.
//! * **Paths (`path::Path`)**: ordered key/index steps locating a value,
//!   parsed from `"dotted.[0].strings"`.
//! * **PathResolver (`schema::PathResolver`)**: resolves a path to the
//!   object a caller should operate on, fabricating intermediate Map/List
//!   nodes as the schema strategy permits.
//! * **DocEncoder / DocDecoder (`encode` / `decode`)**: serde
//!   serializer/deserializer pair driving the document. Encoding finishes
//!   with a cleanup walk realizing whole-value-replace semantics over the
//!   additive low-level API.
//! * **Bridge types (`bridge`)**: [`Counter`], [`Text`], [`Timestamp`] and
//!   [`Bytes`] bypass generic recursion with dedicated document-native
//!   mappings; Counter and Text decode as live references that write
//!   through.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use serde::{Deserialize, Serialize};
//! use doclens::{Counter, DocDecoder, DocEncoder, MemoryDocument, Text};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Note {
//!     title: String,
//!     body: Text,
//!     views: Counter,
//! }
//!
//! let doc = Arc::new(MemoryDocument::new());
//! DocEncoder::new(doc.clone()).encode(&Note {
//!     title: "day one".to_string(),
//!     body: Text::new("Hello"),
//!     views: Counter::new(1),
//! })?;
//!
//! let mut note: Note = DocDecoder::new(doc.clone()).decode()?;
//! note.views.increment(1)?; // writes through to the document
//! note.body.push_str(" World!")?; // applied as a minimal splice
//! # Ok::<(), doclens::Error>(())
//! ```

pub mod bridge;
pub mod decode;
pub mod document;
pub mod encode;
pub mod options;
pub mod path;
pub mod schema;

pub use bridge::{Bytes, Counter, Text, Timestamp};
pub use decode::{DecodeError, DocDecoder};
pub use document::{
    DocValue, Document, DocumentError, MemoryDocument, ObjId, ObjKind, Scalar, ScalarKind,
};
pub use encode::{DocEncoder, EncodeError};
pub use options::BridgeOptions;
pub use path::{Path, PathError, PathStep};
pub use schema::{
    ContainerKind, LookupError, PathResolver, SchemaObserver, SchemaStrategy, TraceEvent,
    TracingObserver, Verbosity,
};

/// Result type used throughout the doclens library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the doclens library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured document collaborator errors from the document module
    #[error(transparent)]
    Document(document::DocumentError),

    /// Structured path resolution errors from the schema module
    #[error(transparent)]
    Lookup(schema::LookupError),

    /// Structured encoding errors from the encode module
    #[error(transparent)]
    Encode(encode::EncodeError),

    /// Structured decoding errors from the decode module
    #[error(transparent)]
    Decode(decode::DecodeError),

    /// Path parsing errors from the path module
    #[error(transparent)]
    Path(path::PathError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Document(_) => "document",
            Error::Lookup(_) => "schema",
            Error::Encode(_) => "encode",
            Error::Decode(_) => "decode",
            Error::Path(_) => "path",
        }
    }

    /// Check if this error is a coarse type disagreement, on either the
    /// encode or the decode side.
    pub fn is_type_mismatch(&self) -> bool {
        match self {
            Error::Encode(encode_err) => encode_err.is_type_mismatch(),
            Error::Decode(decode_err) => decode_err.is_type_mismatch(),
            _ => false,
        }
    }

    /// Check if this error means required schema or data was absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Lookup(lookup_err) => lookup_err.is_schema_missing(),
            Error::Encode(encode::EncodeError::Lookup(lookup_err)) => {
                lookup_err.is_schema_missing()
            }
            Error::Decode(decode::DecodeError::Lookup(lookup_err)) => {
                lookup_err.is_schema_missing()
            }
            Error::Decode(decode_err) => {
                decode_err.is_key_not_found() || decode_err.is_value_not_found()
            }
            Error::Document(doc_err) => doc_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is a schema shape disagreement.
    pub fn is_mismatched_schema(&self) -> bool {
        match self {
            Error::Lookup(lookup_err) => lookup_err.is_mismatched_schema(),
            Error::Encode(encode::EncodeError::Lookup(lookup_err)) => {
                lookup_err.is_mismatched_schema()
            }
            Error::Decode(decode::DecodeError::Lookup(lookup_err)) => {
                lookup_err.is_mismatched_schema()
            }
            _ => false,
        }
    }

    /// Check if this error is an index bound violation.
    pub fn is_out_of_bounds(&self) -> bool {
        match self {
            Error::Lookup(lookup_err) => lookup_err.is_out_of_bounds(),
            Error::Encode(encode::EncodeError::Lookup(lookup_err)) => {
                lookup_err.is_out_of_bounds()
            }
            Error::Decode(decode::DecodeError::Lookup(lookup_err)) => {
                lookup_err.is_out_of_bounds()
            }
            _ => false,
        }
    }

    /// Check if this error originated in the document collaborator.
    pub fn is_document_error(&self) -> bool {
        matches!(self, Error::Document(_))
    }
}
