//! The decoding pipeline.
//!
//! [`DocDecoder`] materializes any [`DeserializeOwned`] value out of a
//! document at a chosen path. Resolution on the decode side is always
//! read-only; typed reads pattern-match the document value against the
//! expected coarse kind and report path-annotated mismatches. Counter and
//! Text fields come out as live references bound to their position in the
//! document, so local mutation writes through.
//!
//! ```
//! use std::sync::Arc;
//! use serde::{Deserialize, Serialize};
//! use doclens::{DocDecoder, DocEncoder, MemoryDocument};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Profile {
//!     name: String,
//!     age: u32,
//! }
//!
//! let doc = Arc::new(MemoryDocument::new());
//! let profile = Profile {
//!     name: "Joe".to_string(),
//!     age: 42,
//! };
//! DocEncoder::new(doc.clone()).encode(&profile)?;
//!
//! let decoded: Profile = DocDecoder::new(doc).decode()?;
//! assert_eq!(decoded, profile);
//! # Ok::<(), doclens::Error>(())
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{document::Document, options::BridgeOptions, path::Path};

mod deserializer;
pub mod errors;

pub use errors::DecodeError;

use deserializer::ValueDeserializer;

/// Decodes application values out of a document.
pub struct DocDecoder {
    doc: Arc<dyn Document>,
    options: BridgeOptions,
}

impl DocDecoder {
    /// Creates a decoder over `doc` with default options.
    pub fn new<D: Document + 'static>(doc: Arc<D>) -> Self {
        DocDecoder {
            doc,
            options: BridgeOptions::default(),
        }
    }

    /// Creates a decoder over an already type-erased document handle.
    pub fn from_shared(doc: Arc<dyn Document>) -> Self {
        DocDecoder {
            doc,
            options: BridgeOptions::default(),
        }
    }

    /// Replaces the decoder's options.
    pub fn with_options(mut self, options: BridgeOptions) -> Self {
        self.options = options;
        self
    }

    /// The options this decoder runs with.
    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    /// Decodes a `T` from the document root.
    pub fn decode<T: DeserializeOwned>(&self) -> crate::Result<T> {
        self.decode_at(&Path::root())
    }

    /// Decodes a `T` from `path`.
    pub fn decode_at<T: DeserializeOwned>(&self, path: &Path) -> crate::Result<T> {
        let root = ValueDeserializer {
            doc: &self.doc,
            options: &self.options,
            path: path.clone(),
            slot: None,
        };
        Ok(T::deserialize(root)?)
    }
}
