//! The encoding pipeline.
//!
//! [`DocEncoder`] serializes any [`Serialize`] value into a document at a
//! chosen path. A pass resolves each container once, writes primitives 1:1
//! onto the low-level API, special-cases the bridge types, and finishes with
//! a cleanup walk that deletes whatever the pass did not write, realizing
//! whole-value-replace semantics over the additive document surface.
//!
//! ```
//! use std::sync::Arc;
//! use serde::Serialize;
//! use doclens::{DocEncoder, MemoryDocument};
//!
//! #[derive(Serialize)]
//! struct Profile {
//!     name: String,
//!     age: u32,
//! }
//!
//! let doc = Arc::new(MemoryDocument::new());
//! let encoder = DocEncoder::new(doc.clone());
//! encoder.encode(&Profile {
//!     name: "Joe".to_string(),
//!     age: 42,
//! })?;
//! # Ok::<(), doclens::Error>(())
//! ```

use std::{cell::RefCell, sync::Arc};

use serde::Serialize;

use crate::{document::Document, options::BridgeOptions, path::Path};

mod context;
pub mod errors;
mod reconcile;
mod serializer;

pub use errors::EncodeError;

use context::ContextArena;
use serializer::ValueSerializer;

/// Encodes application values into a document.
///
/// The encoder holds a shared handle to the document and its configuration;
/// each [`encode`](DocEncoder::encode) call is an independent pass with its
/// own resolver and context bookkeeping.
pub struct DocEncoder {
    doc: Arc<dyn Document>,
    options: BridgeOptions,
}

impl DocEncoder {
    /// Creates an encoder over `doc` with default options.
    pub fn new<D: Document + 'static>(doc: Arc<D>) -> Self {
        DocEncoder {
            doc,
            options: BridgeOptions::default(),
        }
    }

    /// Creates an encoder over an already type-erased document handle.
    pub fn from_shared(doc: Arc<dyn Document>) -> Self {
        DocEncoder {
            doc,
            options: BridgeOptions::default(),
        }
    }

    /// Replaces the encoder's options.
    pub fn with_options(mut self, options: BridgeOptions) -> Self {
        self.options = options;
        self
    }

    /// The options this encoder runs with.
    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    /// Encodes `value` at the document root.
    ///
    /// After the pass, root keys not produced by `value` are deleted.
    pub fn encode<T>(&self, value: &T) -> crate::Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.encode_at(value, &Path::root())
    }

    /// Encodes `value` at `path`, fabricating intermediate schema as the
    /// configured strategy permits.
    ///
    /// Cleanup after the pass is scoped to `path`: sibling subtrees are
    /// never disturbed.
    pub fn encode_at<T>(&self, value: &T, path: &Path) -> crate::Result<()>
    where
        T: ?Sized + Serialize,
    {
        let arena = RefCell::new(ContextArena::default());
        let root = ValueSerializer {
            doc: &self.doc,
            arena: &arena,
            options: &self.options,
            path: path.clone(),
            parent: None,
            slot: None,
        };
        value.serialize(root)?;
        let arena = arena.into_inner();
        reconcile::reconcile(self.doc.as_ref(), &arena, path);
        Ok(())
    }
}
