use serde::Serialize;
use serde_json::json;

use doclens::{
    BridgeOptions, DocEncoder, Document, EncodeError, Error, ObjId, Path, PathStep, Scalar,
};

use crate::helpers::{doc, snapshot};

fn cautious() -> BridgeOptions {
    BridgeOptions::new().with_cautious_write(true)
}

#[test]
fn cautious_write_aborts_on_coarse_mismatch() {
    let doc = doc();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("x".to_string()),
        Scalar::Str("hello".to_string()),
    )
    .unwrap();

    let path: Path = "x".parse().unwrap();
    let err = DocEncoder::new(doc.clone())
        .with_options(cautious())
        .encode_at(&5_i64, &path)
        .unwrap_err();
    match err {
        Error::Encode(EncodeError::TypeMismatch {
            path,
            attempted,
            existing,
        }) => {
            assert_eq!(path.to_string(), "x");
            assert_eq!(attempted, "integer");
            assert_eq!(existing, "string");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
    assert_eq!(snapshot(&doc)["x"], json!("hello"));
}

#[test]
fn cautious_write_uses_coarse_integer_tags() {
    // Signed over unsigned is still "integer over integer".
    let doc = doc();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("n".to_string()),
        Scalar::Uint(1),
    )
    .unwrap();

    let path: Path = "n".parse().unwrap();
    DocEncoder::new(doc.clone())
        .with_options(cautious())
        .encode_at(&-2_i64, &path)
        .unwrap();
    assert_eq!(snapshot(&doc)["n"], json!(-2));
}

#[test]
fn incautious_writes_overwrite_freely() {
    let doc = doc();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("x".to_string()),
        Scalar::Str("hello".to_string()),
    )
    .unwrap();

    let path: Path = "x".parse().unwrap();
    DocEncoder::new(doc.clone()).encode_at(&5_i64, &path).unwrap();
    assert_eq!(snapshot(&doc)["x"], json!(5));
}

#[test]
fn non_finite_floats_are_rejected_before_writing() {
    let doc = doc();
    let path: Path = "ratio".parse().unwrap();
    let encoder = DocEncoder::new(doc.clone());

    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = encoder.encode_at(&bad, &path).unwrap_err();
        assert!(
            matches!(err, Error::Encode(EncodeError::NonFiniteFloat { .. })),
            "got {err:?}"
        );
    }
    assert!(
        doc.get(&ObjId::ROOT, &PathStep::Key("ratio".to_string()))
            .unwrap()
            .is_none(),
        "nothing may be written for a rejected float"
    );
}

#[test]
fn containers_never_overwrite_leaves_of_another_kind() {
    #[derive(Serialize)]
    struct Nested {
        inner: i64,
    }

    let doc = doc();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("slot".to_string()),
        Scalar::Int(1),
    )
    .unwrap();

    let path: Path = "slot".parse().unwrap();
    let err = DocEncoder::new(doc.clone())
        .encode_at(&Nested { inner: 2 }, &path)
        .unwrap_err();
    assert!(err.is_mismatched_schema(), "got {err:?}");
    assert_eq!(snapshot(&doc)["slot"], json!(1));
}

#[test]
fn unit_values_encode_as_null() {
    #[derive(Serialize)]
    struct Marker;

    let doc = doc();
    let encoder = DocEncoder::new(doc.clone());
    encoder
        .encode_at(&Marker, &"m".parse::<Path>().unwrap())
        .unwrap();
    encoder
        .encode_at(&(), &"u".parse::<Path>().unwrap())
        .unwrap();

    let snap = snapshot(&doc);
    assert_eq!(snap["m"], json!(null));
    assert_eq!(snap["u"], json!(null));
}

#[test]
fn top_level_scalars_require_a_path() {
    let doc = doc();
    let err = DocEncoder::new(doc.clone()).encode(&5_i64).unwrap_err();
    assert!(
        matches!(
            err,
            Error::Encode(EncodeError::Lookup(
                doclens::LookupError::NoPathForSingleValue
            ))
        ),
        "got {err:?}"
    );
}
