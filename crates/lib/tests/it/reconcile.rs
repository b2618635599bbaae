use serde::{Deserialize, Serialize};
use serde_json::json;

use doclens::{DocDecoder, DocEncoder, Path};

use crate::helpers::{doc, sample_profile, snapshot};

#[test]
fn encoding_twice_is_idempotent() {
    let doc = doc();
    let profile = sample_profile();
    let encoder = DocEncoder::new(doc.clone());

    encoder.encode(&profile).unwrap();
    let first = snapshot(&doc);

    encoder.encode(&profile).unwrap();
    let second = snapshot(&doc);

    assert_eq!(first, second);
}

#[test]
fn lists_shrink_to_the_new_length() {
    #[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
    struct Board {
        title: String,
        entries: Vec<String>,
    }

    let doc = doc();
    let encoder = DocEncoder::new(doc.clone());

    let long = Board {
        title: "todo".to_string(),
        entries: vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "d".to_string(),
        ],
    };
    encoder.encode(&long).unwrap();

    let short = Board {
        title: "todo".to_string(),
        entries: vec!["x".to_string(), "y".to_string()],
    };
    encoder.encode(&short).unwrap();

    let decoded: Board = DocDecoder::new(doc.clone()).decode().unwrap();
    assert_eq!(decoded, short);
    assert_eq!(
        snapshot(&doc)["entries"],
        json!(["x", "y"]),
        "no stale tail elements may survive"
    );
}

#[test]
fn emptied_lists_drop_every_element() {
    let doc = doc();
    let encoder = DocEncoder::new(doc.clone());
    let path: Path = "items".parse().unwrap();

    encoder
        .encode_at(&vec![1_i64, 2, 3], &path)
        .unwrap();
    encoder.encode_at(&Vec::<i64>::new(), &path).unwrap();

    assert_eq!(snapshot(&doc)["items"], json!([]));
}

#[test]
fn removed_struct_fields_are_deleted() {
    #[derive(Serialize)]
    struct Wide {
        keep: i64,
        drop_me: String,
    }

    #[derive(Serialize)]
    struct Narrow {
        keep: i64,
    }

    let doc = doc();
    let encoder = DocEncoder::new(doc.clone());
    encoder
        .encode(&Wide {
            keep: 1,
            drop_me: "bye".to_string(),
        })
        .unwrap();
    encoder.encode(&Narrow { keep: 2 }).unwrap();

    assert_eq!(snapshot(&doc), json!({ "keep": 2 }));
}

#[test]
fn path_scoped_encodes_leave_siblings_alone() {
    #[derive(Serialize)]
    struct Prefs {
        theme: String,
    }

    let doc = doc();
    let encoder = DocEncoder::new(doc.clone());

    let profile_path: Path = "user.profile".parse().unwrap();
    let prefs_path: Path = "user.prefs".parse().unwrap();
    encoder
        .encode_at(&sample_profile(), &profile_path)
        .unwrap();
    let profile_before = snapshot(&doc)["user"]["profile"].clone();

    encoder
        .encode_at(
            &Prefs {
                theme: "light".to_string(),
            },
            &prefs_path,
        )
        .unwrap();

    let after = snapshot(&doc);
    assert_eq!(
        after["user"]["profile"], profile_before,
        "the sibling subtree must not be disturbed"
    );
    assert_eq!(after["user"]["prefs"], json!({ "theme": "light" }));
}

#[test]
fn nested_containers_are_reconciled_through_the_context_tree() {
    #[derive(Serialize)]
    struct Outer {
        inner: Inner,
    }

    #[derive(Serialize)]
    struct Inner {
        values: Vec<i64>,
    }

    let doc = doc();
    let encoder = DocEncoder::new(doc.clone());
    encoder
        .encode(&Outer {
            inner: Inner {
                values: vec![1, 2, 3],
            },
        })
        .unwrap();
    encoder
        .encode(&Outer {
            inner: Inner { values: vec![9] },
        })
        .unwrap();

    assert_eq!(snapshot(&doc), json!({ "inner": { "values": [9] } }));
}
