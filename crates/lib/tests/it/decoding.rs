use serde::Deserialize;
use serde_json::json;

use doclens::{
    DecodeError, DocDecoder, DocEncoder, Document, Error, ObjId, ObjKind, Path, PathStep, Scalar,
};

use crate::helpers::doc;

#[derive(Deserialize, Debug)]
#[allow(dead_code)]
struct Person {
    name: String,
    age: u32,
}

#[test]
fn missing_required_key_reports_key_not_found() {
    let doc = doc();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("name".to_string()),
        Scalar::Str("Joe".to_string()),
    )
    .unwrap();

    let err = DocDecoder::new(doc).decode::<Person>().unwrap_err();
    match err {
        Error::Decode(DecodeError::KeyNotFound { path }) => {
            assert_eq!(path.to_string(), "age");
        }
        other => panic!("expected KeyNotFound, got {other:?}"),
    }
}

#[test]
fn wrong_scalar_kind_reports_the_full_path() {
    let doc = doc();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("name".to_string()),
        Scalar::Int(7),
    )
    .unwrap();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("age".to_string()),
        Scalar::Uint(42),
    )
    .unwrap();

    let err = DocDecoder::new(doc).decode::<Person>().unwrap_err();
    match err {
        Error::Decode(DecodeError::TypeMismatch {
            path,
            expected,
            found,
        }) => {
            assert_eq!(path.to_string(), "name");
            assert_eq!(expected, "string");
            assert_eq!(found, "integer");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn integers_do_not_decode_as_floats() {
    let doc = doc();
    let path: Path = "x".parse().unwrap();
    DocEncoder::new(doc.clone()).encode_at(&5_i64, &path).unwrap();

    let err = DocDecoder::new(doc).decode_at::<f64>(&path).unwrap_err();
    assert!(err.is_type_mismatch(), "got {err:?}");
}

#[test]
fn decoding_a_longer_tuple_than_stored_fails() {
    let doc = doc();
    let path: Path = "pair".parse().unwrap();
    DocEncoder::new(doc.clone())
        .encode_at(&(1_i64, 2_i64), &path)
        .unwrap();

    let err = DocDecoder::new(doc)
        .decode_at::<(i64, i64, i64)>(&path)
        .unwrap_err();
    match err {
        Error::Decode(DecodeError::ValueNotFound { path }) => {
            assert_eq!(path.to_string(), "pair.[2]");
        }
        other => panic!("expected ValueNotFound, got {other:?}"),
    }
}

#[test]
fn decode_at_a_missing_path_is_schema_missing() {
    let doc = doc();
    let path: Path = "nothing.here".parse().unwrap();
    let err = DocDecoder::new(doc).decode_at::<i64>(&path).unwrap_err();
    assert!(err.is_not_found(), "got {err:?}");
}

#[test]
fn decode_resolution_is_read_only_even_when_configured_otherwise() {
    // The decoder ignores CreateWhenNeeded: probing for absent structure
    // must not fabricate it.
    let doc = doc();
    let path: Path = "ghost.list.[0]".parse().unwrap();
    let _ = DocDecoder::new(doc.clone()).decode_at::<i64>(&path);
    assert!(doc.keys(&ObjId::ROOT).is_empty());
    assert!(doc.ops().is_empty());
}

#[test]
fn self_describing_decode_to_json_value() {
    let doc = doc();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("name".to_string()),
        Scalar::Str("Joe".to_string()),
    )
    .unwrap();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("hits".to_string()),
        Scalar::Counter(4),
    )
    .unwrap();
    let list = doc
        .put_object(&ObjId::ROOT, &PathStep::Key("nums".to_string()), ObjKind::List)
        .unwrap();
    doc.insert(&list, 0, Scalar::Int(1)).unwrap();
    doc.insert(&list, 1, Scalar::F64(2.5)).unwrap();
    let text = doc
        .put_object(&ObjId::ROOT, &PathStep::Key("note".to_string()), ObjKind::Text)
        .unwrap();
    doc.splice_text(&text, 0, 0, "hi").unwrap();

    let value: serde_json::Value = DocDecoder::new(doc).decode().unwrap();
    assert_eq!(
        value,
        json!({
            "name": "Joe",
            "hits": 4,
            "nums": [1, 2.5],
            "note": "hi",
        })
    );
}

#[test]
fn absent_leaves_decode_as_none() {
    let doc = doc();
    doc.put_object(&ObjId::ROOT, &PathStep::Key("box".to_string()), ObjKind::Map)
        .unwrap();

    let path: Path = "box.maybe".parse().unwrap();
    let value: Option<String> = DocDecoder::new(doc).decode_at(&path).unwrap();
    assert_eq!(value, None);
}

#[test]
fn text_objects_decode_as_plain_strings_too() {
    let doc = doc();
    let text = doc
        .put_object(&ObjId::ROOT, &PathStep::Key("body".to_string()), ObjKind::Text)
        .unwrap();
    doc.splice_text(&text, 0, 0, "shared prose").unwrap();

    let path: Path = "body".parse().unwrap();
    let body: String = DocDecoder::new(doc).decode_at(&path).unwrap();
    assert_eq!(body, "shared prose");
}

#[test]
fn unknown_keys_are_ignored_by_struct_targets() {
    let doc = doc();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("name".to_string()),
        Scalar::Str("Joe".to_string()),
    )
    .unwrap();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("age".to_string()),
        Scalar::Uint(42),
    )
    .unwrap();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("extra".to_string()),
        Scalar::Bool(true),
    )
    .unwrap();

    let person: Person = DocDecoder::new(doc).decode().unwrap();
    assert_eq!(person.name, "Joe");
    assert_eq!(person.age, 42);
}
