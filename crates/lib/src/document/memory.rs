//! In-memory reference document.
//!
//! [`MemoryDocument`] is a plain tree-of-objects implementation of the
//! [`Document`] contract. It performs no merging and keeps no history; it
//! exists so the bridge can be exercised, tested, and demonstrated without a
//! real CRDT engine behind it. It records every mutation in an operation log
//! ([`MemoryDocument::ops`]) so tests can assert not just on final state but
//! on the exact low-level writes a pass issued.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use super::{DocResult, DocValue, Document, DocumentError, ObjId, ObjKind, Scalar};
use crate::path::PathStep;

/// A mutation recorded by [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq)]
pub enum MemOp {
    Put {
        obj: ObjId,
        prop: PathStep,
    },
    Insert {
        obj: ObjId,
        index: usize,
    },
    PutObject {
        obj: ObjId,
        prop: PathStep,
        kind: ObjKind,
    },
    InsertObject {
        obj: ObjId,
        index: usize,
        kind: ObjKind,
    },
    Delete {
        obj: ObjId,
        prop: PathStep,
    },
    Splice {
        obj: ObjId,
        pos: usize,
        delete: usize,
        insert: String,
    },
    Increment {
        obj: ObjId,
        prop: PathStep,
        delta: i64,
    },
}

#[derive(Debug, Clone)]
enum Slot {
    Scalar(Scalar),
    Obj(u64),
}

#[derive(Debug)]
enum Node {
    Map(BTreeMap<String, Slot>),
    List(Vec<Slot>),
    Text(String),
}

impl Node {
    fn empty(kind: ObjKind) -> Node {
        match kind {
            ObjKind::Map => Node::Map(BTreeMap::new()),
            ObjKind::List => Node::List(Vec::new()),
            ObjKind::Text => Node::Text(String::new()),
        }
    }

    fn kind(&self) -> ObjKind {
        match self {
            Node::Map(_) => ObjKind::Map,
            Node::List(_) => ObjKind::List,
            Node::Text(_) => ObjKind::Text,
        }
    }
}

#[derive(Debug)]
struct State {
    objects: BTreeMap<u64, Node>,
    next_id: u64,
    log: Vec<MemOp>,
}

impl State {
    fn alloc(&mut self, kind: ObjKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.insert(id, Node::empty(kind));
        id
    }

    fn value_of(&self, slot: &Slot) -> DocResult<DocValue> {
        match slot {
            Slot::Scalar(s) => Ok(DocValue::Scalar(s.clone())),
            Slot::Obj(id) => {
                let node = self.objects.get(id).ok_or_else(|| DocumentError::Internal {
                    reason: format!("dangling child object {id}"),
                })?;
                Ok(DocValue::Object(ObjId::from_raw(*id), node.kind()))
            }
        }
    }
}

/// An in-memory [`Document`] with a recorded operation log.
#[derive(Debug)]
pub struct MemoryDocument {
    state: Mutex<State>,
}

impl MemoryDocument {
    /// Creates an empty document containing only the root map.
    pub fn new() -> Self {
        let mut objects = BTreeMap::new();
        objects.insert(ObjId::ROOT.raw(), Node::Map(BTreeMap::new()));
        MemoryDocument {
            state: Mutex::new(State {
                objects,
                next_id: 1,
                log: Vec::new(),
            }),
        }
    }

    /// Returns a copy of the mutation log, in execution order.
    pub fn ops(&self) -> Vec<MemOp> {
        self.state().log.clone()
    }

    /// Clears the mutation log.
    pub fn clear_ops(&self) {
        self.state().log.clear();
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory document mutex poisoned")
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn wrong_kind(obj: &ObjId, expected: &str, found: ObjKind) -> DocumentError {
    DocumentError::WrongObjectKind {
        obj: *obj,
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

impl Document for MemoryDocument {
    fn get(&self, obj: &ObjId, prop: &PathStep) -> DocResult<Option<DocValue>> {
        let st = self.state();
        let node = st
            .objects
            .get(&obj.raw())
            .ok_or(DocumentError::UnknownObject { obj: *obj })?;
        match (node, prop) {
            (Node::Map(map), PathStep::Key(key)) => {
                map.get(key).map(|slot| st.value_of(slot)).transpose()
            }
            (Node::List(list), PathStep::Index(index)) => {
                list.get(*index).map(|slot| st.value_of(slot)).transpose()
            }
            (Node::Map(_), PathStep::Index(_)) => Err(wrong_kind(obj, "list", ObjKind::Map)),
            (Node::List(_), PathStep::Key(_)) => Err(wrong_kind(obj, "map", ObjKind::List)),
            (Node::Text(_), _) => Err(wrong_kind(obj, "map or list", ObjKind::Text)),
        }
    }

    fn put(&self, obj: &ObjId, prop: &PathStep, value: Scalar) -> DocResult<()> {
        let mut st = self.state();
        let node = st
            .objects
            .get_mut(&obj.raw())
            .ok_or(DocumentError::UnknownObject { obj: *obj })?;
        match (node, prop) {
            (Node::Map(map), PathStep::Key(key)) => {
                map.insert(key.clone(), Slot::Scalar(value));
            }
            (Node::List(list), PathStep::Index(index)) => {
                let length = list.len();
                let slot = list
                    .get_mut(*index)
                    .ok_or(DocumentError::IndexOutOfRange {
                        obj: *obj,
                        index: *index,
                        length,
                    })?;
                *slot = Slot::Scalar(value);
            }
            (node, _) => return Err(wrong_kind(obj, "matching container", node.kind())),
        }
        st.log.push(MemOp::Put {
            obj: *obj,
            prop: prop.clone(),
        });
        Ok(())
    }

    fn insert(&self, obj: &ObjId, index: usize, value: Scalar) -> DocResult<()> {
        let mut st = self.state();
        let node = st
            .objects
            .get_mut(&obj.raw())
            .ok_or(DocumentError::UnknownObject { obj: *obj })?;
        match node {
            Node::List(list) => {
                if index > list.len() {
                    return Err(DocumentError::IndexOutOfRange {
                        obj: *obj,
                        index,
                        length: list.len(),
                    });
                }
                list.insert(index, Slot::Scalar(value));
            }
            node => return Err(wrong_kind(obj, "list", node.kind())),
        }
        st.log.push(MemOp::Insert { obj: *obj, index });
        Ok(())
    }

    fn put_object(&self, obj: &ObjId, prop: &PathStep, kind: ObjKind) -> DocResult<ObjId> {
        let mut st = self.state();
        if !st.objects.contains_key(&obj.raw()) {
            return Err(DocumentError::UnknownObject { obj: *obj });
        }
        let id = st.alloc(kind);
        let node = st
            .objects
            .get_mut(&obj.raw())
            .ok_or(DocumentError::UnknownObject { obj: *obj })?;
        match (node, prop) {
            (Node::Map(map), PathStep::Key(key)) => {
                map.insert(key.clone(), Slot::Obj(id));
            }
            (Node::List(list), PathStep::Index(index)) => {
                let length = list.len();
                let slot = list
                    .get_mut(*index)
                    .ok_or(DocumentError::IndexOutOfRange {
                        obj: *obj,
                        index: *index,
                        length,
                    })?;
                *slot = Slot::Obj(id);
            }
            (node, _) => return Err(wrong_kind(obj, "matching container", node.kind())),
        }
        st.log.push(MemOp::PutObject {
            obj: *obj,
            prop: prop.clone(),
            kind,
        });
        Ok(ObjId::from_raw(id))
    }

    fn insert_object(&self, obj: &ObjId, index: usize, kind: ObjKind) -> DocResult<ObjId> {
        let mut st = self.state();
        if !st.objects.contains_key(&obj.raw()) {
            return Err(DocumentError::UnknownObject { obj: *obj });
        }
        let id = st.alloc(kind);
        let node = st
            .objects
            .get_mut(&obj.raw())
            .ok_or(DocumentError::UnknownObject { obj: *obj })?;
        match node {
            Node::List(list) => {
                if index > list.len() {
                    return Err(DocumentError::IndexOutOfRange {
                        obj: *obj,
                        index,
                        length: list.len(),
                    });
                }
                list.insert(index, Slot::Obj(id));
            }
            node => return Err(wrong_kind(obj, "list", node.kind())),
        }
        st.log.push(MemOp::InsertObject {
            obj: *obj,
            index,
            kind,
        });
        Ok(ObjId::from_raw(id))
    }

    fn delete(&self, obj: &ObjId, prop: &PathStep) -> DocResult<()> {
        let mut st = self.state();
        let node = st
            .objects
            .get_mut(&obj.raw())
            .ok_or(DocumentError::UnknownObject { obj: *obj })?;
        let removed = match (node, prop) {
            (Node::Map(map), PathStep::Key(key)) => map.remove(key).is_some(),
            (Node::List(list), PathStep::Index(index)) => {
                if *index >= list.len() {
                    return Err(DocumentError::IndexOutOfRange {
                        obj: *obj,
                        index: *index,
                        length: list.len(),
                    });
                }
                list.remove(*index);
                true
            }
            (node, _) => return Err(wrong_kind(obj, "matching container", node.kind())),
        };
        if removed {
            st.log.push(MemOp::Delete {
                obj: *obj,
                prop: prop.clone(),
            });
        }
        Ok(())
    }

    fn keys(&self, obj: &ObjId) -> Vec<String> {
        let st = self.state();
        match st.objects.get(&obj.raw()) {
            Some(Node::Map(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn length(&self, obj: &ObjId) -> usize {
        let st = self.state();
        match st.objects.get(&obj.raw()) {
            Some(Node::Map(map)) => map.len(),
            Some(Node::List(list)) => list.len(),
            Some(Node::Text(text)) => text.chars().count(),
            None => 0,
        }
    }

    fn object_kind(&self, obj: &ObjId) -> DocResult<ObjKind> {
        let st = self.state();
        st.objects
            .get(&obj.raw())
            .map(Node::kind)
            .ok_or(DocumentError::UnknownObject { obj: *obj })
    }

    fn text(&self, obj: &ObjId) -> DocResult<String> {
        let st = self.state();
        match st.objects.get(&obj.raw()) {
            Some(Node::Text(text)) => Ok(text.clone()),
            Some(node) => Err(wrong_kind(obj, "text", node.kind())),
            None => Err(DocumentError::UnknownObject { obj: *obj }),
        }
    }

    fn splice_text(&self, obj: &ObjId, pos: usize, delete: usize, insert: &str) -> DocResult<()> {
        let mut st = self.state();
        let node = st
            .objects
            .get_mut(&obj.raw())
            .ok_or(DocumentError::UnknownObject { obj: *obj })?;
        match node {
            Node::Text(text) => {
                let chars: Vec<char> = text.chars().collect();
                if pos + delete > chars.len() {
                    return Err(DocumentError::IndexOutOfRange {
                        obj: *obj,
                        index: pos + delete,
                        length: chars.len(),
                    });
                }
                let mut updated: String = chars[..pos].iter().collect();
                updated.push_str(insert);
                updated.extend(&chars[pos + delete..]);
                *text = updated;
            }
            node => return Err(wrong_kind(obj, "text", node.kind())),
        }
        st.log.push(MemOp::Splice {
            obj: *obj,
            pos,
            delete,
            insert: insert.to_string(),
        });
        Ok(())
    }

    fn increment(&self, obj: &ObjId, prop: &PathStep, delta: i64) -> DocResult<()> {
        let mut st = self.state();
        let node = st
            .objects
            .get_mut(&obj.raw())
            .ok_or(DocumentError::UnknownObject { obj: *obj })?;
        let slot = match (node, prop) {
            (Node::Map(map), PathStep::Key(key)) => map.get_mut(key),
            (Node::List(list), PathStep::Index(index)) => list.get_mut(*index),
            (node, _) => return Err(wrong_kind(obj, "matching container", node.kind())),
        };
        match slot {
            Some(Slot::Scalar(Scalar::Counter(current))) => {
                *current += delta;
            }
            _ => {
                return Err(DocumentError::MissingCounter {
                    obj: *obj,
                    prop: prop.to_string(),
                });
            }
        }
        st.log.push(MemOp::Increment {
            obj: *obj,
            prop: prop.clone(),
            delta,
        });
        Ok(())
    }
}
