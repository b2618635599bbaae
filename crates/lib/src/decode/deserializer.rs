//! The serde deserializer driving document reads.
//!
//! One [`ValueDeserializer`] decodes one value at one path. Compound targets
//! hand off to [`KeyedAccess`] / [`IndexedAccess`], each of which performs a
//! single (read-only) path resolution at construction. Bridge types are
//! intercepted by reserved newtype name; Counter and Text come out as live
//! references bound to their position in the document.

use std::sync::Arc;

use serde::de::{
    DeserializeSeed, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
    value::{I64Deserializer, StringDeserializer},
};

use super::errors::DecodeError;
use crate::{
    bridge::{self, Binding, TextBinding, channel},
    document::{DocValue, Document, ObjId, ObjKind, Scalar},
    options::BridgeOptions,
    path::{Path, PathStep},
    schema::{ContainerKind, LookupError, PathResolver, SchemaStrategy},
};

/// Decodes one value from the document at a fixed path.
///
/// `slot` carries the concrete `(container, property)` this value sits at;
/// it is `None` only for the top-level value of a pass, which resolves its
/// own location. An absent leaf reads as the Null scalar.
pub(crate) struct ValueDeserializer<'a> {
    pub doc: &'a Arc<dyn Document>,
    pub options: &'a BridgeOptions,
    pub path: Path,
    pub slot: Option<(ObjId, PathStep)>,
}

impl<'a> ValueDeserializer<'a> {
    /// Decode-side resolution never mutates schema, whatever the configured
    /// strategy says.
    fn resolver(&self) -> PathResolver<'a> {
        PathResolver::new(self.doc.as_ref(), SchemaStrategy::ReadOnly)
            .with_trace(self.options.observer_ref(), self.options.verbosity)
    }

    fn doc_err(&self, source: crate::document::DocumentError) -> DecodeError {
        DecodeError::Document {
            path: self.path.clone(),
            source,
        }
    }

    fn mismatch(&self, expected: &str, found: &DocValue) -> DecodeError {
        DecodeError::TypeMismatch {
            path: self.path.clone(),
            expected: expected.to_string(),
            found: found.type_name().to_string(),
        }
    }

    /// The concrete `(container, property)` slot, or `None` at the root.
    fn resolved_slot(&self) -> Result<Option<(ObjId, PathStep)>, DecodeError> {
        match &self.slot {
            Some((obj, prop)) => Ok(Some((*obj, prop.clone()))),
            None if self.path.is_empty() => Ok(None),
            None => {
                let parent = self
                    .resolver()
                    .resolve(&self.path, ContainerKind::SingleValue)?;
                let last = self
                    .path
                    .last()
                    .cloned()
                    .ok_or(LookupError::NoPathForSingleValue)?;
                Ok(Some((parent, last)))
            }
        }
    }

    /// Resolves the value this deserializer points at, substituting the
    /// Null scalar when the leaf is absent.
    fn lookup(&self) -> Result<DocValue, DecodeError> {
        match self.resolved_slot()? {
            Some((obj, prop)) => Ok(self
                .doc
                .get(&obj, &prop)
                .map_err(|e| self.doc_err(e))?
                .unwrap_or(DocValue::Scalar(Scalar::Null))),
            None => {
                let kind = self
                    .doc
                    .object_kind(&ObjId::ROOT)
                    .map_err(|e| self.doc_err(e))?;
                Ok(DocValue::Object(ObjId::ROOT, kind))
            }
        }
    }

    fn visit_integer<'de, V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.lookup()? {
            DocValue::Scalar(Scalar::Int(n)) => visitor.visit_i64(n),
            DocValue::Scalar(Scalar::Uint(n)) => visitor.visit_u64(n),
            DocValue::Scalar(Scalar::Counter(n)) | DocValue::Scalar(Scalar::Timestamp(n)) => {
                visitor.visit_i64(n)
            }
            other => Err(self.mismatch("integer", &other)),
        }
    }

    fn keyed_access(&self, obj: ObjId) -> KeyedAccess<'a> {
        KeyedAccess {
            doc: self.doc,
            options: self.options,
            path: self.path.clone(),
            obj,
            keys: self.doc.keys(&obj).into_iter(),
            current: None,
        }
    }

    fn indexed_access(&self, obj: ObjId) -> IndexedAccess<'a> {
        IndexedAccess {
            doc: self.doc,
            options: self.options,
            path: self.path.clone(),
            obj,
            index: 0,
            count: self.doc.length(&obj),
        }
    }
}

impl<'de> Deserializer<'de> for ValueDeserializer<'_> {
    type Error = DecodeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.lookup()? {
            DocValue::Object(obj, ObjKind::Map) => {
                let access = self.keyed_access(obj);
                visitor.visit_map(access)
            }
            DocValue::Object(obj, ObjKind::List) => {
                let access = self.indexed_access(obj);
                visitor.visit_seq(access)
            }
            DocValue::Object(obj, ObjKind::Text) => {
                let content = self.doc.text(&obj).map_err(|e| self.doc_err(e))?;
                visitor.visit_string(content)
            }
            DocValue::Scalar(scalar) => match scalar {
                Scalar::Null => visitor.visit_unit(),
                Scalar::Bool(b) => visitor.visit_bool(b),
                Scalar::Int(n) => visitor.visit_i64(n),
                Scalar::Uint(n) => visitor.visit_u64(n),
                Scalar::F64(x) => visitor.visit_f64(x),
                Scalar::Str(s) => visitor.visit_string(s),
                Scalar::Counter(n) => visitor.visit_i64(n),
                Scalar::Timestamp(n) => visitor.visit_i64(n),
                Scalar::Bytes(b) => visitor.visit_byte_buf(b),
            },
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.lookup()? {
            DocValue::Scalar(Scalar::Bool(b)) => visitor.visit_bool(b),
            other => Err(self.mismatch("boolean", &other)),
        }
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.visit_integer(visitor)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.visit_integer(visitor)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.visit_integer(visitor)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.visit_integer(visitor)
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.visit_integer(visitor)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.visit_integer(visitor)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.visit_integer(visitor)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.visit_integer(visitor)
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.lookup()? {
            DocValue::Scalar(Scalar::F64(x)) => visitor.visit_f64(x),
            other => Err(self.mismatch("float", &other)),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.lookup()? {
            DocValue::Scalar(Scalar::Str(s)) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(DecodeError::DataCorrupted {
                        reason: format!("expected a single-char string at {}", self.path),
                    }),
                }
            }
            other => Err(self.mismatch("char", &other)),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.lookup()? {
            DocValue::Scalar(Scalar::Str(s)) => visitor.visit_string(s),
            DocValue::Object(obj, ObjKind::Text) => {
                let content = self.doc.text(&obj).map_err(|e| self.doc_err(e))?;
                visitor.visit_string(content)
            }
            other => Err(self.mismatch("string", &other)),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.lookup()? {
            DocValue::Scalar(Scalar::Bytes(bytes)) => visitor.visit_byte_buf(bytes),
            other => Err(self.mismatch("bytes", &other)),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.lookup()? {
            DocValue::Scalar(Scalar::Null) => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.lookup()? {
            DocValue::Scalar(Scalar::Null) => visitor.visit_unit(),
            other => Err(self.mismatch("null", &other)),
        }
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match name {
            bridge::COUNTER_NEWTYPE => {
                let slot = self.resolved_slot()?;
                let (obj, prop) = slot.ok_or_else(|| DecodeError::DataCorrupted {
                    reason: "a counter cannot occupy the document root".to_string(),
                })?;
                let found = self
                    .doc
                    .get(&obj, &prop)
                    .map_err(|e| self.doc_err(e))?
                    .unwrap_or(DocValue::Scalar(Scalar::Null));
                match found {
                    DocValue::Scalar(Scalar::Counter(value)) => {
                        channel::stash_counter_binding(Some(Binding {
                            doc: self.doc.clone(),
                            obj,
                            prop,
                        }));
                        let result =
                            visitor.visit_newtype_struct(I64Deserializer::<DecodeError>::new(value));
                        channel::take_counter_binding();
                        result
                    }
                    other => Err(self.mismatch("counter", &other)),
                }
            }
            bridge::TEXT_NEWTYPE => match self.lookup()? {
                DocValue::Object(obj, ObjKind::Text) => {
                    let content = self.doc.text(&obj).map_err(|e| self.doc_err(e))?;
                    channel::stash_text_binding(Some(TextBinding {
                        doc: self.doc.clone(),
                        obj,
                    }));
                    let result = visitor
                        .visit_newtype_struct(StringDeserializer::<DecodeError>::new(content));
                    channel::take_text_binding();
                    result
                }
                other => Err(self.mismatch("text", &other)),
            },
            bridge::TIMESTAMP_NEWTYPE => match self.lookup()? {
                DocValue::Scalar(Scalar::Timestamp(millis)) => {
                    visitor.visit_newtype_struct(I64Deserializer::<DecodeError>::new(millis))
                }
                other => Err(self.mismatch("timestamp", &other)),
            },
            _ => visitor.visit_newtype_struct(self),
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let obj = self.resolver().resolve(&self.path, ContainerKind::Indexed)?;
        let access = self.indexed_access(obj);
        visitor.visit_seq(access)
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let obj = self.resolver().resolve(&self.path, ContainerKind::Indexed)?;
        let count = self.doc.length(&obj);
        if count < len {
            return Err(DecodeError::ValueNotFound {
                path: self.path.child(PathStep::Index(count)),
            });
        }
        let access = self.indexed_access(obj);
        visitor.visit_seq(access)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let obj = self.resolver().resolve(&self.path, ContainerKind::Keyed)?;
        let access = self.keyed_access(obj);
        visitor.visit_map(access)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.lookup()? {
            DocValue::Scalar(Scalar::Str(variant)) => {
                visitor.visit_enum(StringDeserializer::<DecodeError>::new(variant))
            }
            DocValue::Object(obj, ObjKind::Map) => {
                let keys = self.doc.keys(&obj);
                match <[String; 1]>::try_from(keys) {
                    Ok([variant]) => visitor.visit_enum(EnumRef {
                        doc: self.doc,
                        options: self.options,
                        path: self.path.clone(),
                        obj,
                        variant,
                    }),
                    Err(keys) => Err(DecodeError::DataCorrupted {
                        reason: format!(
                            "enum at {} must have exactly one variant key, found {}",
                            self.path,
                            keys.len()
                        ),
                    }),
                }
            }
            other => Err(self.mismatch("enum", &other)),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }

    fn is_human_readable(&self) -> bool {
        true
    }
}

/// Keyed container adapter: exposes the live keys of one map object.
pub(crate) struct KeyedAccess<'a> {
    doc: &'a Arc<dyn Document>,
    options: &'a BridgeOptions,
    path: Path,
    obj: ObjId,
    keys: std::vec::IntoIter<String>,
    current: Option<String>,
}

impl<'de> MapAccess<'de> for KeyedAccess<'_> {
    type Error = DecodeError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, DecodeError>
    where
        K: DeserializeSeed<'de>,
    {
        match self.keys.next() {
            Some(key) => {
                let value = seed.deserialize(MapKeyDeserializer { key: key.clone() })?;
                self.current = Some(key);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, DecodeError>
    where
        V: DeserializeSeed<'de>,
    {
        let key = self.current.take().ok_or_else(|| DecodeError::DataCorrupted {
            reason: "map value requested before its key".to_string(),
        })?;
        let step = PathStep::Key(key);
        seed.deserialize(ValueDeserializer {
            doc: self.doc,
            options: self.options,
            path: self.path.child(step.clone()),
            slot: Some((self.obj, step)),
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.keys.len())
    }
}

/// Indexed container adapter: tracks a cursor against the list length
/// captured at construction.
pub(crate) struct IndexedAccess<'a> {
    doc: &'a Arc<dyn Document>,
    options: &'a BridgeOptions,
    path: Path,
    obj: ObjId,
    index: usize,
    count: usize,
}

impl<'de> SeqAccess<'de> for IndexedAccess<'_> {
    type Error = DecodeError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, DecodeError>
    where
        T: DeserializeSeed<'de>,
    {
        if self.index >= self.count {
            return Ok(None);
        }
        let step = PathStep::Index(self.index);
        self.index += 1;
        seed.deserialize(ValueDeserializer {
            doc: self.doc,
            options: self.options,
            path: self.path.child(step.clone()),
            slot: Some((self.obj, step)),
        })
        .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.count - self.index)
    }
}

/// Deserializes one map key, parsing integer targets out of the string.
struct MapKeyDeserializer {
    key: String,
}

macro_rules! map_key_parsed {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, DecodeError>
            where
                V: Visitor<'de>,
            {
                let parsed: $ty = self.key.parse().map_err(|_| DecodeError::DataCorrupted {
                    reason: format!("map key '{}' is not an integer", self.key),
                })?;
                visitor.$visit(parsed)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for MapKeyDeserializer {
    type Error = DecodeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.key)
    }

    map_key_parsed! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
    }

    serde::forward_to_deserialize_any! {
        bool f32 f64 char str string bytes byte_buf option unit unit_struct
        newtype_struct seq tuple tuple_struct map struct enum identifier
        ignored_any
    }
}

/// Enum access over a single-key variant map.
struct EnumRef<'a> {
    doc: &'a Arc<dyn Document>,
    options: &'a BridgeOptions,
    path: Path,
    obj: ObjId,
    variant: String,
}

impl<'de, 'a> EnumAccess<'de> for EnumRef<'a> {
    type Error = DecodeError;
    type Variant = VariantRef<'a>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, VariantRef<'a>), DecodeError>
    where
        V: DeserializeSeed<'de>,
    {
        let name =
            seed.deserialize(StringDeserializer::<DecodeError>::new(self.variant.clone()))?;
        Ok((
            name,
            VariantRef {
                doc: self.doc,
                options: self.options,
                path: self.path,
                obj: self.obj,
                variant: self.variant,
            },
        ))
    }
}

struct VariantRef<'a> {
    doc: &'a Arc<dyn Document>,
    options: &'a BridgeOptions,
    path: Path,
    obj: ObjId,
    variant: String,
}

impl<'a> VariantRef<'a> {
    fn value_deserializer(self) -> ValueDeserializer<'a> {
        let step = PathStep::Key(self.variant);
        ValueDeserializer {
            doc: self.doc,
            options: self.options,
            path: self.path.child(step.clone()),
            slot: Some((self.obj, step)),
        }
    }
}

impl<'de> VariantAccess<'de> for VariantRef<'_> {
    type Error = DecodeError;

    fn unit_variant(self) -> Result<(), DecodeError> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, DecodeError>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(self.value_deserializer())
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.value_deserializer().deserialize_tuple(len, visitor)
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.value_deserializer().deserialize_map(visitor)
    }
}
