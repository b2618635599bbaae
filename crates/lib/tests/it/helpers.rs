use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value as Json, json};

use doclens::{
    Bytes, Counter, DocValue, Document, MemoryDocument, ObjId, ObjKind, PathStep, Scalar, Text,
    Timestamp,
};

/// Fresh shared in-memory document.
pub fn doc() -> Arc<MemoryDocument> {
    Arc::new(MemoryDocument::new())
}

/// Renders the whole document as JSON for structural comparisons.
///
/// Counters, timestamps, and byte buffers render as tagged objects so that
/// snapshots distinguish them from plain integers and lists.
pub fn snapshot(doc: &MemoryDocument) -> Json {
    object_json(doc, &ObjId::ROOT, ObjKind::Map)
}

fn object_json(doc: &MemoryDocument, obj: &ObjId, kind: ObjKind) -> Json {
    match kind {
        ObjKind::Map => {
            let mut map = serde_json::Map::new();
            for key in doc.keys(obj) {
                let value = doc
                    .get(obj, &PathStep::Key(key.clone()))
                    .unwrap()
                    .expect("listed key must be present");
                map.insert(key, value_json(doc, &value));
            }
            Json::Object(map)
        }
        ObjKind::List => {
            let items: Vec<Json> = (0..doc.length(obj))
                .map(|index| {
                    let value = doc
                        .get(obj, &PathStep::Index(index))
                        .unwrap()
                        .expect("in-bounds index must be present");
                    value_json(doc, &value)
                })
                .collect();
            Json::Array(items)
        }
        ObjKind::Text => json!(doc.text(obj).unwrap()),
    }
}

fn value_json(doc: &MemoryDocument, value: &DocValue) -> Json {
    match value {
        DocValue::Object(id, kind) => object_json(doc, id, *kind),
        DocValue::Scalar(scalar) => match scalar {
            Scalar::Null => Json::Null,
            Scalar::Bool(b) => json!(b),
            Scalar::Int(n) => json!(n),
            Scalar::Uint(n) => json!(n),
            Scalar::F64(x) => json!(x),
            Scalar::Str(s) => json!(s),
            Scalar::Counter(c) => json!({ "__counter": c }),
            Scalar::Timestamp(t) => json!({ "__timestamp": t }),
            Scalar::Bytes(b) => json!({ "__bytes": b }),
        },
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    pub theme: String,
    pub compact: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub score: f64,
    pub nickname: Option<String>,
    pub tags: Vec<String>,
    pub settings: Settings,
    pub notes: Text,
    pub visits: Counter,
    pub joined: Timestamp,
    pub avatar: Bytes,
}

pub fn sample_profile() -> Profile {
    Profile {
        name: "Joe".to_string(),
        age: 42,
        score: 7.5,
        nickname: Some("JJ".to_string()),
        tags: vec!["editor".to_string(), "owner".to_string()],
        settings: Settings {
            theme: "dark".to_string(),
            compact: false,
        },
        notes: Text::new("Hello"),
        visits: Counter::new(3),
        joined: Timestamp::from_millis(1_700_000_000_000),
        avatar: Bytes::new(vec![0xde, 0xad, 0xbe, 0xef]),
    }
}
