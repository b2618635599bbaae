use serde::{Deserialize, Serialize};

use doclens::{
    Counter, DocDecoder, DocEncoder, Document, ObjId, PathStep, Scalar, Text, Timestamp,
    document::MemOp,
};

use crate::helpers::doc;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Article {
    notes: Text,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Stats {
    visits: Counter,
}

#[test]
fn unbound_counter_merges_as_an_increment() {
    // An existing document counter of 2 plus a local counter of 5 must net
    // +3, not an overwrite to 5: concurrent increments survive.
    let doc = doc();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("visits".to_string()),
        Scalar::Counter(2),
    )
    .unwrap();
    doc.clear_ops();

    DocEncoder::new(doc.clone())
        .encode(&Stats {
            visits: Counter::new(5),
        })
        .unwrap();

    let ops = doc.ops();
    assert!(
        ops.contains(&MemOp::Increment {
            obj: ObjId::ROOT,
            prop: PathStep::Key("visits".to_string()),
            delta: 3,
        }),
        "expected a +3 increment, ops were {ops:?}"
    );
    assert!(
        !ops.iter().any(|op| matches!(op, MemOp::Put { .. })),
        "the counter must not be overwritten"
    );
    assert_eq!(
        doc.get(&ObjId::ROOT, &PathStep::Key("visits".to_string()))
            .unwrap()
            .unwrap()
            .as_scalar(),
        Some(&Scalar::Counter(5))
    );
}

#[test]
fn equal_counter_values_write_nothing() {
    let doc = doc();
    doc.put(
        &ObjId::ROOT,
        &PathStep::Key("visits".to_string()),
        Scalar::Counter(5),
    )
    .unwrap();
    doc.clear_ops();

    DocEncoder::new(doc.clone())
        .encode(&Stats {
            visits: Counter::new(5),
        })
        .unwrap();

    assert!(
        doc.ops().is_empty(),
        "no mutation expected, got {:?}",
        doc.ops()
    );
}

#[test]
fn decoded_counter_is_live() {
    let doc = doc();
    DocEncoder::new(doc.clone())
        .encode(&Stats {
            visits: Counter::new(1),
        })
        .unwrap();

    let mut stats: Stats = DocDecoder::new(doc.clone()).decode().unwrap();
    assert!(stats.visits.is_bound());
    stats.visits.increment(4).unwrap();

    assert_eq!(
        doc.get(&ObjId::ROOT, &PathStep::Key("visits".to_string()))
            .unwrap()
            .unwrap()
            .as_scalar(),
        Some(&Scalar::Counter(5)),
        "increments on a live counter must write through"
    );
    assert_eq!(stats.visits.value(), 5);
}

#[test]
fn re_encoding_a_bound_counter_is_a_no_op() {
    let doc = doc();
    DocEncoder::new(doc.clone())
        .encode(&Stats {
            visits: Counter::new(7),
        })
        .unwrap();

    let stats: Stats = DocDecoder::new(doc.clone()).decode().unwrap();
    doc.clear_ops();
    DocEncoder::new(doc.clone()).encode(&stats).unwrap();

    assert!(
        doc.ops().is_empty(),
        "a bound counter at its own slot must not be rewritten, got {:?}",
        doc.ops()
    );
}

#[test]
fn text_re_encode_applies_one_minimal_splice() {
    let doc = doc();
    let encoder = DocEncoder::new(doc.clone());
    encoder
        .encode(&Article {
            notes: Text::new("Hello"),
        })
        .unwrap();
    doc.clear_ops();

    encoder
        .encode(&Article {
            notes: Text::new("Hello World!"),
        })
        .unwrap();

    let ops = doc.ops();
    assert_eq!(
        ops,
        vec![MemOp::Splice {
            obj: text_obj(&doc),
            pos: 5,
            delete: 0,
            insert: " World!".to_string(),
        }],
        "a changed text must produce exactly one splice, never a node replace"
    );
}

#[test]
fn unchanged_text_writes_nothing() {
    let doc = doc();
    let encoder = DocEncoder::new(doc.clone());
    encoder
        .encode(&Article {
            notes: Text::new("stable"),
        })
        .unwrap();
    doc.clear_ops();
    encoder
        .encode(&Article {
            notes: Text::new("stable"),
        })
        .unwrap();
    assert!(doc.ops().is_empty(), "got {:?}", doc.ops());
}

#[test]
fn decoded_text_is_live() {
    let doc = doc();
    DocEncoder::new(doc.clone())
        .encode(&Article {
            notes: Text::new("Hello"),
        })
        .unwrap();

    let mut article: Article = DocDecoder::new(doc.clone()).decode().unwrap();
    assert!(article.notes.is_bound());
    article.notes.push_str(" World!").unwrap();

    assert_eq!(doc.text(&text_obj(&doc)).unwrap(), "Hello World!");

    // set() routes through the same minimal-splice diff.
    doc.clear_ops();
    article.notes.set("Hello, World!").unwrap();
    assert_eq!(doc.text(&text_obj(&doc)).unwrap(), "Hello, World!");
    assert_eq!(
        doc.ops(),
        vec![MemOp::Splice {
            obj: text_obj(&doc),
            pos: 5,
            delete: 0,
            insert: ",".to_string(),
        }]
    );
}

#[test]
fn timestamps_round_trip_through_chrono() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Event {
        at: Timestamp,
    }

    let doc = doc();
    let at = Timestamp::from_millis(1_700_000_000_123);
    DocEncoder::new(doc.clone()).encode(&Event { at }).unwrap();

    assert_eq!(
        doc.get(&ObjId::ROOT, &PathStep::Key("at".to_string()))
            .unwrap()
            .unwrap()
            .as_scalar(),
        Some(&Scalar::Timestamp(1_700_000_000_123))
    );

    let decoded: Event = DocDecoder::new(doc).decode().unwrap();
    assert_eq!(decoded.at, at);
    assert_eq!(
        decoded.at.to_datetime().unwrap().timestamp_millis(),
        1_700_000_000_123
    );
}

#[test]
fn bytes_store_as_the_native_scalar() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Blob {
        data: doclens::Bytes,
    }

    let doc = doc();
    let blob = Blob {
        data: doclens::Bytes::new(vec![1, 2, 3]),
    };
    DocEncoder::new(doc.clone()).encode(&blob).unwrap();

    assert_eq!(
        doc.get(&ObjId::ROOT, &PathStep::Key("data".to_string()))
            .unwrap()
            .unwrap()
            .as_scalar(),
        Some(&Scalar::Bytes(vec![1, 2, 3])),
        "a byte buffer must not land as a list"
    );

    let decoded: Blob = DocDecoder::new(doc).decode().unwrap();
    assert_eq!(decoded, blob);
}

/// The id of the text object at root key "notes".
fn text_obj(doc: &doclens::MemoryDocument) -> ObjId {
    doc.get(&ObjId::ROOT, &PathStep::Key("notes".to_string()))
        .unwrap()
        .unwrap()
        .as_object()
        .unwrap()
        .0
}
