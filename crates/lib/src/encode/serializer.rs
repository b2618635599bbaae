//! The serde serializer driving document writes.
//!
//! One [`ValueSerializer`] serializes one value at one path. Compound values
//! hand off to [`KeyedSerializer`] / [`IndexedSerializer`], each of which
//! performs a single path resolution at construction and registers an
//! [`EncodeContext`](super::context::EncodeContext) for the cleanup walker.
//! Bridge types are intercepted by reserved newtype name before generic
//! recursion.

use std::{cell::RefCell, sync::Arc};

use serde::ser::{self, Impossible, Serialize};

use super::{
    context::{ContextArena, CtxId},
    errors::EncodeError,
};
use crate::{
    bridge::{self, Binding, channel, diff},
    document::{DocValue, Document, ObjId, ObjKind, Scalar},
    options::BridgeOptions,
    path::{Path, PathStep},
    schema::{ContainerKind, LookupError, PathResolver, SchemaStrategy},
};

/// Serializes one value into the document at a fixed path.
///
/// `slot` carries the concrete `(container, property)` to write a terminal
/// scalar at; it is `None` only for the top-level value of a pass, which
/// resolves its own location.
pub(crate) struct ValueSerializer<'a> {
    pub doc: &'a Arc<dyn Document>,
    pub arena: &'a RefCell<ContextArena>,
    pub options: &'a BridgeOptions,
    pub path: Path,
    pub parent: Option<CtxId>,
    pub slot: Option<(ObjId, PathStep)>,
}

impl<'a> ValueSerializer<'a> {
    fn resolver(&self) -> PathResolver<'a> {
        PathResolver::new(self.doc.as_ref(), self.options.strategy)
            .with_trace(self.options.observer_ref(), self.options.verbosity)
    }

    /// Locates the slot for a terminal write, resolving (and registering a
    /// single-value context) when this is the top-level value.
    fn leaf_slot(&self) -> Result<(ObjId, PathStep), EncodeError> {
        match &self.slot {
            Some((obj, prop)) => Ok((*obj, prop.clone())),
            None => {
                let parent = self
                    .resolver()
                    .resolve(&self.path, ContainerKind::SingleValue)?;
                let last = self
                    .path
                    .last()
                    .cloned()
                    .ok_or(LookupError::NoPathForSingleValue)?;
                self.arena.borrow_mut().push(
                    self.parent,
                    parent,
                    ContainerKind::SingleValue,
                    self.path.clone(),
                );
                Ok((parent, last))
            }
        }
    }

    fn doc_err(&self, source: crate::document::DocumentError) -> EncodeError {
        EncodeError::Document {
            path: self.path.clone(),
            source,
        }
    }

    /// Writes a scalar at the slot, applying the index append rule.
    fn raw_put(&self, obj: &ObjId, prop: &PathStep, value: Scalar) -> Result<(), EncodeError> {
        match prop {
            PathStep::Key(_) => self.doc.put(obj, prop, value).map_err(|e| self.doc_err(e)),
            PathStep::Index(index) => {
                let length = self.doc.length(obj);
                if *index < length {
                    self.doc.put(obj, prop, value).map_err(|e| self.doc_err(e))
                } else if *index == length
                    && !matches!(self.options.strategy, SchemaStrategy::ReadOnly)
                {
                    self.doc
                        .insert(obj, *index, value)
                        .map_err(|e| self.doc_err(e))
                } else {
                    Err(LookupError::IndexOutOfBounds {
                        path: self.path.clone(),
                        index: *index,
                        length,
                    }
                    .into())
                }
            }
        }
    }

    /// Creates an object at the slot, applying the index append rule.
    fn raw_put_object(
        &self,
        obj: &ObjId,
        prop: &PathStep,
        kind: ObjKind,
    ) -> Result<ObjId, EncodeError> {
        match prop {
            PathStep::Key(_) => self
                .doc
                .put_object(obj, prop, kind)
                .map_err(|e| self.doc_err(e)),
            PathStep::Index(index) => {
                let length = self.doc.length(obj);
                if *index < length {
                    self.doc
                        .put_object(obj, prop, kind)
                        .map_err(|e| self.doc_err(e))
                } else if *index == length
                    && !matches!(self.options.strategy, SchemaStrategy::ReadOnly)
                {
                    self.doc
                        .insert_object(obj, *index, kind)
                        .map_err(|e| self.doc_err(e))
                } else {
                    Err(LookupError::IndexOutOfBounds {
                        path: self.path.clone(),
                        index: *index,
                        length,
                    }
                    .into())
                }
            }
        }
    }

    /// Rejects a write whose coarse type disagrees with the existing value.
    ///
    /// Null is the absence marker in this rendition and is compatible in
    /// both directions.
    fn check_compatible(&self, existing: &DocValue, attempted: &Scalar) -> Result<(), EncodeError> {
        let compatible = match existing {
            DocValue::Scalar(current) => {
                current.is_null() || attempted.is_null() || current.kind() == attempted.kind()
            }
            DocValue::Object(..) => attempted.is_null(),
        };
        if compatible {
            Ok(())
        } else {
            Err(EncodeError::TypeMismatch {
                path: self.path.clone(),
                attempted: attempted.type_name().to_string(),
                existing: existing.type_name().to_string(),
            })
        }
    }

    fn put_scalar(self, value: Scalar) -> Result<(), EncodeError> {
        let (obj, prop) = self.leaf_slot()?;
        if self.options.cautious_write
            && let Some(existing) = self.doc.get(&obj, &prop).map_err(|e| self.doc_err(e))?
        {
            self.check_compatible(&existing, &value)?;
        }
        self.raw_put(&obj, &prop, value)
    }

    /// Counter writes preserve concurrent increments: an existing counter
    /// absorbs the difference to the local value instead of being replaced.
    fn put_counter(self, value: i64, binding: Option<Binding>) -> Result<(), EncodeError> {
        let (obj, prop) = self.leaf_slot()?;
        if let Some(binding) = &binding
            && binding.is_at(self.doc, &obj, &prop)
        {
            // A live reference already bound to this slot; its increments
            // have been written through as they happened.
            return Ok(());
        }
        let existing = self.doc.get(&obj, &prop).map_err(|e| self.doc_err(e))?;
        match existing {
            Some(DocValue::Scalar(Scalar::Counter(current))) => {
                let delta = value - current;
                if delta != 0 {
                    self.doc
                        .increment(&obj, &prop, delta)
                        .map_err(|e| self.doc_err(e))?;
                }
                Ok(())
            }
            Some(ref existing_value) if self.options.cautious_write => {
                self.check_compatible(existing_value, &Scalar::Counter(value))?;
                self.raw_put(&obj, &prop, Scalar::Counter(value))
            }
            _ => self.raw_put(&obj, &prop, Scalar::Counter(value)),
        }
    }

    /// Text writes allocate the node once, then only ever splice diffs.
    fn put_text(self, new: &str) -> Result<(), EncodeError> {
        let (obj, prop) = self.leaf_slot()?;
        let existing = self.doc.get(&obj, &prop).map_err(|e| self.doc_err(e))?;
        let text_obj = match existing {
            Some(DocValue::Object(id, ObjKind::Text)) => id,
            Some(ref existing_value)
                if self.options.cautious_write
                    && !matches!(existing_value, DocValue::Scalar(Scalar::Null)) =>
            {
                return Err(EncodeError::TypeMismatch {
                    path: self.path.clone(),
                    attempted: "text".to_string(),
                    existing: existing_value.type_name().to_string(),
                });
            }
            _ => self.raw_put_object(&obj, &prop, ObjKind::Text)?,
        };
        let current = self.doc.text(&text_obj).map_err(|e| self.doc_err(e))?;
        if let Some(splice) = diff::splice_for(&current, new) {
            self.doc
                .splice_text(&text_obj, splice.pos, splice.delete, &splice.insert)
                .map_err(|e| self.doc_err(e))?;
        }
        Ok(())
    }

    fn keyed_container(self) -> Result<KeyedSerializer<'a>, EncodeError> {
        let obj = self.resolver().resolve(&self.path, ContainerKind::Keyed)?;
        let ctx = self
            .arena
            .borrow_mut()
            .push(self.parent, obj, ContainerKind::Keyed, self.path.clone());
        Ok(KeyedSerializer {
            doc: self.doc,
            arena: self.arena,
            options: self.options,
            path: self.path,
            obj,
            ctx,
            pending_key: None,
        })
    }

    fn indexed_container(self) -> Result<IndexedSerializer<'a>, EncodeError> {
        let obj = self.resolver().resolve(&self.path, ContainerKind::Indexed)?;
        let ctx = self
            .arena
            .borrow_mut()
            .push(self.parent, obj, ContainerKind::Indexed, self.path.clone());
        Ok(IndexedSerializer {
            doc: self.doc,
            arena: self.arena,
            options: self.options,
            path: self.path,
            obj,
            ctx,
            count: 0,
        })
    }
}

impl<'a> ser::Serializer for ValueSerializer<'a> {
    type Ok = ();
    type Error = EncodeError;
    type SerializeSeq = IndexedSerializer<'a>;
    type SerializeTuple = IndexedSerializer<'a>;
    type SerializeTupleStruct = IndexedSerializer<'a>;
    type SerializeTupleVariant = IndexedSerializer<'a>;
    type SerializeMap = KeyedSerializer<'a>;
    type SerializeStruct = KeyedSerializer<'a>;
    type SerializeStructVariant = KeyedSerializer<'a>;

    fn serialize_bool(self, v: bool) -> Result<(), EncodeError> {
        self.put_scalar(Scalar::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<(), EncodeError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<(), EncodeError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<(), EncodeError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<(), EncodeError> {
        self.put_scalar(Scalar::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<(), EncodeError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<(), EncodeError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<(), EncodeError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<(), EncodeError> {
        self.put_scalar(Scalar::Uint(v))
    }

    fn serialize_f32(self, v: f32) -> Result<(), EncodeError> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), EncodeError> {
        if !v.is_finite() {
            return Err(EncodeError::NonFiniteFloat {
                path: self.path.clone(),
            });
        }
        self.put_scalar(Scalar::F64(v))
    }

    fn serialize_char(self, v: char) -> Result<(), EncodeError> {
        self.put_scalar(Scalar::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<(), EncodeError> {
        self.put_scalar(Scalar::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<(), EncodeError> {
        self.put_scalar(Scalar::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<(), EncodeError> {
        self.put_scalar(Scalar::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), EncodeError> {
        self.put_scalar(Scalar::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), EncodeError> {
        self.put_scalar(Scalar::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<(), EncodeError> {
        self.put_scalar(Scalar::Str(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        match name {
            bridge::COUNTER_NEWTYPE => {
                let binding = channel::take_counter_binding();
                let local = value.serialize(CaptureI64)?;
                self.put_counter(local, binding)
            }
            bridge::TEXT_NEWTYPE => {
                let content = value.serialize(CaptureString)?;
                self.put_text(&content)
            }
            bridge::TIMESTAMP_NEWTYPE => {
                let millis = value.serialize(CaptureI64)?;
                self.put_scalar(Scalar::Timestamp(millis))
            }
            _ => value.serialize(self),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        let mut keyed = self.keyed_container()?;
        keyed.encode_entry(variant, value)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<IndexedSerializer<'a>, EncodeError> {
        self.indexed_container()
    }

    fn serialize_tuple(self, _len: usize) -> Result<IndexedSerializer<'a>, EncodeError> {
        self.indexed_container()
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<IndexedSerializer<'a>, EncodeError> {
        self.indexed_container()
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<IndexedSerializer<'a>, EncodeError> {
        let keyed = self.keyed_container()?;
        keyed.record(variant);
        let step = PathStep::Key(variant.to_string());
        let child = ValueSerializer {
            doc: keyed.doc,
            arena: keyed.arena,
            options: keyed.options,
            path: keyed.path.child(step.clone()),
            parent: Some(keyed.ctx),
            slot: Some((keyed.obj, step)),
        };
        child.indexed_container()
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<KeyedSerializer<'a>, EncodeError> {
        self.keyed_container()
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<KeyedSerializer<'a>, EncodeError> {
        self.keyed_container()
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<KeyedSerializer<'a>, EncodeError> {
        let keyed = self.keyed_container()?;
        keyed.record(variant);
        let step = PathStep::Key(variant.to_string());
        let child = ValueSerializer {
            doc: keyed.doc,
            arena: keyed.arena,
            options: keyed.options,
            path: keyed.path.child(step.clone()),
            parent: Some(keyed.ctx),
            slot: Some((keyed.obj, step)),
        };
        child.keyed_container()
    }

    fn is_human_readable(&self) -> bool {
        true
    }
}

/// Keyed container adapter: writes fields into one map object.
pub(crate) struct KeyedSerializer<'a> {
    doc: &'a Arc<dyn Document>,
    arena: &'a RefCell<ContextArena>,
    options: &'a BridgeOptions,
    path: Path,
    obj: ObjId,
    ctx: CtxId,
    pending_key: Option<String>,
}

impl<'a> KeyedSerializer<'a> {
    /// Serializes one field and records its key on success.
    fn encode_entry<T>(&mut self, key: &str, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        let step = PathStep::Key(key.to_string());
        let child = ValueSerializer {
            doc: self.doc,
            arena: self.arena,
            options: self.options,
            path: self.path.child(step.clone()),
            parent: Some(self.ctx),
            slot: Some((self.obj, step)),
        };
        value.serialize(child)?;
        self.arena.borrow_mut().record_key(self.ctx, key.to_string());
        Ok(())
    }

    fn record(&self, key: &str) {
        self.arena.borrow_mut().record_key(self.ctx, key.to_string());
    }
}

impl ser::SerializeMap for KeyedSerializer<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key = Some(key.serialize(CaptureString)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| EncodeError::Message("map value written before its key".to_string()))?;
        self.encode_entry(&key, value)
    }

    fn end(self) -> Result<(), EncodeError> {
        Ok(())
    }
}

impl ser::SerializeStruct for KeyedSerializer<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.encode_entry(key, value)
    }

    fn end(self) -> Result<(), EncodeError> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for KeyedSerializer<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.encode_entry(key, value)
    }

    fn end(self) -> Result<(), EncodeError> {
        Ok(())
    }
}

/// Indexed container adapter: writes elements into one list object.
pub(crate) struct IndexedSerializer<'a> {
    doc: &'a Arc<dyn Document>,
    arena: &'a RefCell<ContextArena>,
    options: &'a BridgeOptions,
    path: Path,
    obj: ObjId,
    ctx: CtxId,
    count: usize,
}

impl IndexedSerializer<'_> {
    /// Serializes the next element and records its index on success.
    fn encode_element<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        let index = self.count;
        let step = PathStep::Index(index);
        let child = ValueSerializer {
            doc: self.doc,
            arena: self.arena,
            options: self.options,
            path: self.path.child(step.clone()),
            parent: Some(self.ctx),
            slot: Some((self.obj, step)),
        };
        value.serialize(child)?;
        self.count += 1;
        self.arena.borrow_mut().record_index(self.ctx, index);
        Ok(())
    }
}

impl ser::SerializeSeq for IndexedSerializer<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.encode_element(value)
    }

    fn end(self) -> Result<(), EncodeError> {
        Ok(())
    }
}

impl ser::SerializeTuple for IndexedSerializer<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.encode_element(value)
    }

    fn end(self) -> Result<(), EncodeError> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for IndexedSerializer<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.encode_element(value)
    }

    fn end(self) -> Result<(), EncodeError> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for IndexedSerializer<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.encode_element(value)
    }

    fn end(self) -> Result<(), EncodeError> {
        Ok(())
    }
}

/// Minimal serializer extracting one string, used for map keys and the
/// content of bridge newtypes. Integer keys format as strings.
struct CaptureString;

macro_rules! capture_string_int {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<String, EncodeError> {
                Ok(v.to_string())
            }
        )*
    };
}

impl ser::Serializer for CaptureString {
    type Ok = String;
    type Error = EncodeError;
    type SerializeSeq = Impossible<String, EncodeError>;
    type SerializeTuple = Impossible<String, EncodeError>;
    type SerializeTupleStruct = Impossible<String, EncodeError>;
    type SerializeTupleVariant = Impossible<String, EncodeError>;
    type SerializeMap = Impossible<String, EncodeError>;
    type SerializeStruct = Impossible<String, EncodeError>;
    type SerializeStructVariant = Impossible<String, EncodeError>;

    capture_string_int! {
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
    }

    fn serialize_str(self, v: &str) -> Result<String, EncodeError> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String, EncodeError> {
        Ok(v.to_string())
    }

    fn serialize_bool(self, _v: bool) -> Result<String, EncodeError> {
        Err(key_error())
    }

    fn serialize_f32(self, _v: f32) -> Result<String, EncodeError> {
        Err(key_error())
    }

    fn serialize_f64(self, _v: f64) -> Result<String, EncodeError> {
        Err(key_error())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, EncodeError> {
        Err(key_error())
    }

    fn serialize_none(self) -> Result<String, EncodeError> {
        Err(key_error())
    }

    fn serialize_some<T>(self, value: &T) -> Result<String, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String, EncodeError> {
        Err(key_error())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, EncodeError> {
        Err(key_error())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, EncodeError> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        Err(key_error())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        Err(key_error())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, EncodeError> {
        Err(key_error())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodeError> {
        Err(key_error())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodeError> {
        Err(key_error())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        Err(key_error())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Err(key_error())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodeError> {
        Err(key_error())
    }
}

fn key_error() -> EncodeError {
    EncodeError::Message("map keys must be strings or integers".to_string())
}

/// Minimal serializer extracting one signed integer, used for the content of
/// counter and timestamp newtypes.
struct CaptureI64;

macro_rules! capture_i64_signed {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<i64, EncodeError> {
                Ok(i64::from(v))
            }
        )*
    };
}

macro_rules! capture_i64_reject {
    ($($method:ident($($arg:ty),*)),* $(,)?) => {
        $(
            fn $method(self, $(_: $arg),*) -> Result<i64, EncodeError> {
                Err(int_error())
            }
        )*
    };
}

impl ser::Serializer for CaptureI64 {
    type Ok = i64;
    type Error = EncodeError;
    type SerializeSeq = Impossible<i64, EncodeError>;
    type SerializeTuple = Impossible<i64, EncodeError>;
    type SerializeTupleStruct = Impossible<i64, EncodeError>;
    type SerializeTupleVariant = Impossible<i64, EncodeError>;
    type SerializeMap = Impossible<i64, EncodeError>;
    type SerializeStruct = Impossible<i64, EncodeError>;
    type SerializeStructVariant = Impossible<i64, EncodeError>;

    capture_i64_signed! {
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
    }

    fn serialize_i64(self, v: i64) -> Result<i64, EncodeError> {
        Ok(v)
    }

    fn serialize_u64(self, v: u64) -> Result<i64, EncodeError> {
        i64::try_from(v).map_err(|_| int_error())
    }

    capture_i64_reject! {
        serialize_bool(bool),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    }

    fn serialize_none(self) -> Result<i64, EncodeError> {
        Err(int_error())
    }

    fn serialize_some<T>(self, value: &T) -> Result<i64, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<i64, EncodeError> {
        Err(int_error())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<i64, EncodeError> {
        Err(int_error())
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<i64, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<i64, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        Err(int_error())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        Err(int_error())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, EncodeError> {
        Err(int_error())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodeError> {
        Err(int_error())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodeError> {
        Err(int_error())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        Err(int_error())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Err(int_error())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodeError> {
        Err(int_error())
    }
}

fn int_error() -> EncodeError {
    EncodeError::Message("expected an integer value".to_string())
}
