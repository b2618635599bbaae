use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use doclens::{DocDecoder, DocEncoder, Path};

use crate::helpers::{doc, sample_profile};

#[test]
fn full_profile_round_trips() {
    let doc = doc();
    let profile = sample_profile();
    DocEncoder::new(doc.clone()).encode(&profile).unwrap();

    let decoded = DocDecoder::new(doc).decode::<crate::helpers::Profile>().unwrap();
    assert_eq!(decoded, profile);
}

#[test]
fn round_trip_at_a_nested_path() {
    let doc = doc();
    let profile = sample_profile();
    let path: Path = "team.members.[0]".parse().unwrap();
    DocEncoder::new(doc.clone())
        .encode_at(&profile, &path)
        .unwrap();

    let decoded: crate::helpers::Profile =
        DocDecoder::new(doc).decode_at(&path).unwrap();
    assert_eq!(decoded, profile);
}

#[test]
fn optionals_round_trip_in_both_states() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Pair {
        present: Option<i64>,
        absent: Option<i64>,
    }

    let doc = doc();
    let value = Pair {
        present: Some(9),
        absent: None,
    };
    DocEncoder::new(doc.clone()).encode(&value).unwrap();
    let decoded: Pair = DocDecoder::new(doc).decode().unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn maps_round_trip_with_string_and_integer_keys() {
    let doc = doc();

    let by_name: HashMap<String, i64> =
        [("one".to_string(), 1), ("two".to_string(), 2)].into();
    let path: Path = "by_name".parse().unwrap();
    DocEncoder::new(doc.clone()).encode_at(&by_name, &path).unwrap();
    let decoded: HashMap<String, i64> = DocDecoder::new(doc.clone()).decode_at(&path).unwrap();
    assert_eq!(decoded, by_name);

    let by_id: BTreeMap<u32, String> =
        [(1, "one".to_string()), (2, "two".to_string())].into();
    let path: Path = "by_id".parse().unwrap();
    DocEncoder::new(doc.clone()).encode_at(&by_id, &path).unwrap();
    let decoded: BTreeMap<u32, String> = DocDecoder::new(doc).decode_at(&path).unwrap();
    assert_eq!(decoded, by_id);
}

#[test]
fn enums_round_trip_across_variant_shapes() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Shape {
        Empty,
        Labeled(String),
        Pair(i32, i32),
        Sized { width: u32, height: u32 },
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Drawing {
        shapes: Vec<Shape>,
    }

    let doc = doc();
    let drawing = Drawing {
        shapes: vec![
            Shape::Empty,
            Shape::Labeled("origin".to_string()),
            Shape::Pair(3, 4),
            Shape::Sized {
                width: 800,
                height: 600,
            },
        ],
    };
    DocEncoder::new(doc.clone()).encode(&drawing).unwrap();
    let decoded: Drawing = DocDecoder::new(doc).decode().unwrap();
    assert_eq!(decoded, drawing);
}

#[test]
fn scalar_leaves_round_trip_at_single_value_paths() {
    let doc = doc();
    let encoder = DocEncoder::new(doc.clone());
    let decoder = DocDecoder::new(doc);

    let path: Path = "flags.ready".parse().unwrap();
    encoder.encode_at(&true, &path).unwrap();
    assert!(decoder.decode_at::<bool>(&path).unwrap());

    let path: Path = "limits.max".parse().unwrap();
    encoder.encode_at(&123_u64, &path).unwrap();
    assert_eq!(decoder.decode_at::<u64>(&path).unwrap(), 123);

    let path: Path = "labels.initial".parse().unwrap();
    encoder.encode_at(&'x', &path).unwrap();
    assert_eq!(decoder.decode_at::<char>(&path).unwrap(), 'x');
}

#[test]
fn nested_sequences_round_trip() {
    let doc = doc();
    let grid: Vec<Vec<i64>> = vec![vec![1, 2], vec![], vec![3]];
    let path: Path = "grid".parse().unwrap();
    DocEncoder::new(doc.clone()).encode_at(&grid, &path).unwrap();
    let decoded: Vec<Vec<i64>> = DocDecoder::new(doc).decode_at(&path).unwrap();
    assert_eq!(decoded, grid);
}

#[test]
fn tuples_round_trip() {
    let doc = doc();
    let value = (7_i64, "seven".to_string(), false);
    let path: Path = "tuple".parse().unwrap();
    DocEncoder::new(doc.clone()).encode_at(&value, &path).unwrap();
    let decoded: (i64, String, bool) = DocDecoder::new(doc).decode_at(&path).unwrap();
    assert_eq!(decoded, value);
}
