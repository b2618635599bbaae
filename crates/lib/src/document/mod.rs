//! The document collaborator contract.
//!
//! This module defines the low-level surface the bridge drives: an abstract
//! [`Document`] exposing typed get/put/insert/delete by `(object id, key or
//! index)`, object creation, key/length introspection, and text-splice and
//! counter-increment primitives over opaque object ids.
//!
//! The bridge consumes this contract; it never implements the merge
//! algorithm, conflict resolution, or persistence behind it. A reference
//! [`MemoryDocument`](memory::MemoryDocument) implementation backs the test
//! suite and examples.

use std::fmt;

use crate::path::PathStep;

pub mod errors;
pub mod memory;

pub use errors::DocumentError;
pub use memory::{MemOp, MemoryDocument};

/// An opaque identifier for an object (Map, List, or Text) inside a document.
///
/// Ids are minted by the document when objects are created and carry no
/// meaning outside the document that produced them. The root map of every
/// document is addressed by [`ObjId::ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjId(u64);

impl ObjId {
    /// The id of the document's root map.
    pub const ROOT: ObjId = ObjId(0);

    /// Creates an id from a raw value. Intended for [`Document`] implementors.
    pub fn from_raw(raw: u64) -> Self {
        ObjId(raw)
    }

    /// Returns the raw id value.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Returns `true` if this id addresses the root map.
    pub fn is_root(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ObjId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "_root")
        } else {
            write!(f, "obj-{}", self.0)
        }
    }
}

/// The kind of a document object.
///
/// `Text` is always a leaf for path purposes: a path step can never descend
/// through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjKind {
    /// An unordered string-keyed container.
    Map,
    /// An ordered, index-addressed container.
    List,
    /// A collaborative text sequence. A path leaf.
    Text,
}

impl ObjKind {
    /// Returns `true` if path steps may descend into this object.
    pub fn is_traversable(&self) -> bool {
        matches!(self, ObjKind::Map | ObjKind::List)
    }
}

impl fmt::Display for ObjKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjKind::Map => write!(f, "map"),
            ObjKind::List => write!(f, "list"),
            ObjKind::Text => write!(f, "text"),
        }
    }
}

/// An atomic document-native value.
///
/// Scalars are the terminal values a document can hold at a key or index.
/// Integer widths narrower than 64 bits funnel into [`Scalar::Int`] /
/// [`Scalar::Uint`]; the distinction between the two is preserved on the
/// wire but collapses to one coarse [`ScalarKind::Integer`] tag for
/// compatibility checks.
///
/// ```
/// use doclens::{Scalar, ScalarKind};
///
/// assert_eq!(Scalar::Int(-3).kind(), ScalarKind::Integer);
/// assert_eq!(Scalar::Uint(3).kind(), ScalarKind::Integer);
/// assert_eq!(Scalar::F64(3.0).kind(), ScalarKind::Float);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// The null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// An unsigned 64-bit integer.
    Uint(u64),
    /// A 64-bit float. Never NaN or infinite when written by the bridge.
    F64(f64),
    /// A UTF-8 string.
    Str(String),
    /// A convergent counter with the given current value.
    Counter(i64),
    /// A timestamp in milliseconds since the Unix epoch.
    Timestamp(i64),
    /// A byte buffer.
    Bytes(Vec<u8>),
}

impl Scalar {
    /// Returns the coarse type tag for this scalar.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Null => ScalarKind::Null,
            Scalar::Bool(_) => ScalarKind::Boolean,
            Scalar::Int(_) | Scalar::Uint(_) => ScalarKind::Integer,
            Scalar::F64(_) => ScalarKind::Float,
            Scalar::Str(_) => ScalarKind::String,
            Scalar::Counter(_) => ScalarKind::Counter,
            Scalar::Timestamp(_) => ScalarKind::Timestamp,
            Scalar::Bytes(_) => ScalarKind::Bytes,
        }
    }

    /// Returns the type name as a string, for error messages.
    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    /// Returns `true` if this is the null scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Attempts to view this scalar as a signed integer.
    ///
    /// Counters and timestamps read as their integer value; unsigned values
    /// convert when they fit.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) | Scalar::Counter(n) | Scalar::Timestamp(n) => Some(*n),
            Scalar::Uint(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Attempts to view this scalar as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to view this scalar as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to view this scalar as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::F64(x) => Some(*x),
            _ => None,
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Uint(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::F64(value)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<Vec<u8>> for Scalar {
    fn from(value: Vec<u8>) -> Self {
        Scalar::Bytes(value)
    }
}

/// Coarse type tags for [`Scalar`] values.
///
/// This is the granularity cautious-write compatibility checks operate at:
/// "any integer" is one tag, distinct from "float".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Counter,
    Timestamp,
    Bytes,
}

impl ScalarKind {
    /// Returns the tag name as a string, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::Null => "null",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::String => "string",
            ScalarKind::Counter => "counter",
            ScalarKind::Timestamp => "timestamp",
            ScalarKind::Bytes => "bytes",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// A value read out of a document: either a nested object or a scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    /// A nested object, identified by its id and kind.
    Object(ObjId, ObjKind),
    /// A terminal scalar value.
    Scalar(Scalar),
}

impl DocValue {
    /// Returns the type name as a string, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            DocValue::Object(_, ObjKind::Map) => "map",
            DocValue::Object(_, ObjKind::List) => "list",
            DocValue::Object(_, ObjKind::Text) => "text",
            DocValue::Scalar(s) => s.type_name(),
        }
    }

    /// Returns `true` if this value is a nested object.
    pub fn is_object(&self) -> bool {
        matches!(self, DocValue::Object(..))
    }

    /// Returns the object id and kind if this value is a nested object.
    pub fn as_object(&self) -> Option<(ObjId, ObjKind)> {
        match self {
            DocValue::Object(id, kind) => Some((*id, *kind)),
            _ => None,
        }
    }

    /// Returns the scalar if this value is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            DocValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` if this value cannot be descended into by a path step.
    ///
    /// Text objects and all scalars are leaves.
    pub fn is_leaf(&self) -> bool {
        match self {
            DocValue::Object(_, kind) => !kind.is_traversable(),
            DocValue::Scalar(_) => true,
        }
    }
}

impl From<Scalar> for DocValue {
    fn from(value: Scalar) -> Self {
        DocValue::Scalar(value)
    }
}

/// Result alias for document operations.
pub type DocResult<T> = std::result::Result<T, DocumentError>;

/// The low-level surface of a collaborative document.
///
/// Implementations serialize their own internal state: every method takes
/// `&self` and is expected to be safe to call behind shared ownership (the
/// usual shape is a mutex or equivalent exclusive-access boundary inside the
/// implementation). The bridge issues sequences of these calls and does not
/// make a multi-call pass atomic; concurrent external mutation between two
/// calls of one pass is a caller-level hazard.
///
/// List text positions and splice offsets are Unicode scalar (char) offsets,
/// not byte offsets.
pub trait Document: Send + Sync {
    /// Reads the value at `prop` within `obj`. Returns `Ok(None)` when the
    /// key is absent or the index is out of range.
    fn get(&self, obj: &ObjId, prop: &PathStep) -> DocResult<Option<DocValue>>;

    /// Writes a scalar at `prop` within `obj`, overwriting any existing
    /// value. For a list, the index must address an existing element.
    fn put(&self, obj: &ObjId, prop: &PathStep, value: Scalar) -> DocResult<()>;

    /// Inserts a scalar into the list `obj` at `index`, shifting later
    /// elements. `index` may be at most the current length.
    fn insert(&self, obj: &ObjId, index: usize, value: Scalar) -> DocResult<()>;

    /// Creates a new object of `kind` at `prop` within `obj`, overwriting
    /// any existing value, and returns its id.
    fn put_object(&self, obj: &ObjId, prop: &PathStep, kind: ObjKind) -> DocResult<ObjId>;

    /// Creates a new object of `kind` inside the list `obj` at `index`,
    /// shifting later elements, and returns its id.
    fn insert_object(&self, obj: &ObjId, index: usize, kind: ObjKind) -> DocResult<ObjId>;

    /// Deletes the value at `prop` within `obj`. For a list this removes the
    /// element and shifts the tail.
    fn delete(&self, obj: &ObjId, prop: &PathStep) -> DocResult<()>;

    /// Returns the live keys of the map `obj`, in the document's iteration
    /// order. Empty for non-maps.
    fn keys(&self, obj: &ObjId) -> Vec<String>;

    /// Returns the number of keys, elements, or chars in `obj`. Zero for
    /// unknown objects.
    fn length(&self, obj: &ObjId) -> usize;

    /// Returns the kind of the object addressed by `obj`.
    fn object_kind(&self, obj: &ObjId) -> DocResult<ObjKind>;

    /// Returns the content of the text object `obj`.
    fn text(&self, obj: &ObjId) -> DocResult<String>;

    /// Splices the text object `obj`: deletes `delete` chars at `pos`, then
    /// inserts `insert` there.
    fn splice_text(&self, obj: &ObjId, pos: usize, delete: usize, insert: &str) -> DocResult<()>;

    /// Adds `delta` to the counter at `prop` within `obj`.
    fn increment(&self, obj: &ObjId, prop: &PathStep, delta: i64) -> DocResult<()>;
}
