use serde::Serialize;

use doclens::{BridgeOptions, DocEncoder, Error, Path, SchemaStrategy};

use crate::helpers::{doc, snapshot};

fn read_only() -> BridgeOptions {
    BridgeOptions::new().with_strategy(SchemaStrategy::ReadOnly)
}

#[test]
fn read_only_encode_into_missing_path_fails_without_mutation() {
    #[derive(Serialize)]
    struct Payload {
        value: i64,
    }

    let doc = doc();
    let before = snapshot(&doc);
    let encoder = DocEncoder::new(doc.clone()).with_options(read_only());

    let path: Path = "not.here.yet".parse().unwrap();
    let err = encoder
        .encode_at(&Payload { value: 1 }, &path)
        .unwrap_err();
    assert!(err.is_not_found(), "expected SchemaMissing, got {err:?}");
    assert_eq!(snapshot(&doc), before, "a failed pass must not mutate");
}

#[test]
fn read_only_encode_into_present_schema_succeeds() {
    #[derive(Serialize)]
    struct Payload {
        value: i64,
    }

    let doc = doc();
    let path: Path = "slot".parse().unwrap();
    DocEncoder::new(doc.clone())
        .encode_at(&Payload { value: 1 }, &path)
        .unwrap();

    // The schema now exists; a read-only pass may rewrite the data.
    DocEncoder::new(doc.clone())
        .with_options(read_only())
        .encode_at(&Payload { value: 2 }, &path)
        .unwrap();
    assert_eq!(snapshot(&doc)["slot"]["value"], 2);
}

#[test]
fn read_only_cannot_append_to_a_list() {
    let doc = doc();
    DocEncoder::new(doc.clone())
        .encode_at(&vec![1_i64, 2], &"list".parse::<Path>().unwrap())
        .unwrap();

    // Same length rewrites are fine; growing the list is not.
    let encoder = DocEncoder::new(doc.clone()).with_options(read_only());
    encoder
        .encode_at(&vec![3_i64, 4], &"list".parse::<Path>().unwrap())
        .unwrap();
    let err = encoder
        .encode_at(&vec![5_i64, 6, 7], &"list".parse::<Path>().unwrap())
        .unwrap_err();
    assert!(err.is_out_of_bounds(), "expected IndexOutOfBounds, got {err:?}");
}

#[test]
fn append_is_exactly_one_past_the_end() {
    let doc = doc();
    DocEncoder::new(doc.clone())
        .encode_at(&vec![10_i64, 20], &"list".parse::<Path>().unwrap())
        .unwrap();
    let encoder = DocEncoder::new(doc.clone());

    // Index 2 == length: a valid append under CreateWhenNeeded.
    let append: Path = "list.[2]".parse().unwrap();
    encoder.encode_at(&30_i64, &append).unwrap();
    assert_eq!(snapshot(&doc)["list"], serde_json::json!([10, 20, 30]));

    // Far past the end fails under every strategy.
    let gap: Path = "list.[9]".parse().unwrap();
    let err = encoder.encode_at(&90_i64, &gap).unwrap_err();
    assert!(err.is_out_of_bounds());

    let err = DocEncoder::new(doc.clone())
        .with_options(read_only())
        .encode_at(&90_i64, &gap)
        .unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn override_strategy_is_reserved_and_always_fails() {
    let doc = doc();
    let encoder = DocEncoder::new(doc.clone())
        .with_options(BridgeOptions::new().with_strategy(SchemaStrategy::Override));
    let err = encoder
        .encode_at(&42_i64, &"x".parse::<Path>().unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::Encode(_)), "got {err:?}");
    assert!(snapshot(&doc).as_object().unwrap().is_empty());
}
