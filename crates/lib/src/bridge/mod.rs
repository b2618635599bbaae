//! Bridge types with dedicated document-native mappings.
//!
//! Most application values reach the document through generic structural
//! recursion. The types in this module bypass it: each one has a dedicated,
//! non-generic mapping to a document-native scalar or object.
//!
//! - [`Counter`]: a convergent counter. Re-encoding applies the local
//!   difference as an increment, preserving concurrent collaborators'
//!   increments instead of overwriting them.
//! - [`Text`]: collaborative text. Re-encoding applies a minimal
//!   insert/remove diff instead of replacing the node.
//! - [`Timestamp`]: milliseconds since the Unix epoch, stored as the native
//!   timestamp scalar.
//! - [`Bytes`]: a byte buffer, stored as the native bytes scalar.
//!
//! Counter and Text decode as *live references* bound to their position in
//! the document, so local mutation writes through.
//!
//! Each wrapper serializes as a newtype struct with a reserved name. The
//! bridge serializer and deserializer match those names explicitly before
//! falling through to generic recursion; any other serde format just sees
//! the underlying primitive.

use std::{fmt, sync::Arc};

use crate::{
    document::{Document, ObjId},
    path::PathStep,
};

pub(crate) mod channel;
pub mod counter;
pub(crate) mod diff;
pub mod text;
pub mod timestamp;

mod bytes;

pub use bytes::Bytes;
pub use counter::Counter;
pub use text::Text;
pub use timestamp::Timestamp;

/// Reserved newtype-struct name for [`Counter`].
pub(crate) const COUNTER_NEWTYPE: &str = "$doclens::Counter";
/// Reserved newtype-struct name for [`Text`].
pub(crate) const TEXT_NEWTYPE: &str = "$doclens::Text";
/// Reserved newtype-struct name for [`Timestamp`].
pub(crate) const TIMESTAMP_NEWTYPE: &str = "$doclens::Timestamp";

/// A live attachment of a value to one `(document, object, property)` slot.
#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) doc: Arc<dyn Document>,
    pub(crate) obj: ObjId,
    pub(crate) prop: PathStep,
}

impl Binding {
    /// Returns `true` if this binding points at exactly the given slot of
    /// the given document instance.
    pub(crate) fn is_at(&self, doc: &Arc<dyn Document>, obj: &ObjId, prop: &PathStep) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.doc), Arc::as_ptr(doc))
            && self.obj == *obj
            && self.prop == *prop
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("obj", &self.obj)
            .field("prop", &self.prop)
            .finish_non_exhaustive()
    }
}

/// A live attachment of a [`Text`] to its text object.
#[derive(Clone)]
pub(crate) struct TextBinding {
    pub(crate) doc: Arc<dyn Document>,
    pub(crate) obj: ObjId,
}

impl fmt::Debug for TextBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBinding")
            .field("obj", &self.obj)
            .finish_non_exhaustive()
    }
}
