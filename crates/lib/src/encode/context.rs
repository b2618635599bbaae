//! Per-container bookkeeping for one encode pass.
//!
//! Every container adapter created during an encode pass registers an
//! [`EncodeContext`] recording what it wrote. Contexts live in a
//! [`ContextArena`] addressed by integer handle, with parent-to-children
//! edges as index lists; the cleanup walker consumes the arena after the
//! pass finishes and the whole structure is discarded with the pass.

use std::collections::BTreeSet;

use crate::{document::ObjId, path::Path, schema::ContainerKind};

/// Handle of a context within its arena.
pub(crate) type CtxId = usize;

#[derive(Debug)]
pub(crate) struct EncodeContext {
    pub obj: ObjId,
    pub kind: ContainerKind,
    pub path: Path,
    /// Keys successfully written through a keyed container.
    pub keys_written: BTreeSet<String>,
    /// Highest index successfully written through an indexed container.
    pub max_index_written: Option<usize>,
    pub children: Vec<CtxId>,
    pub parent: Option<CtxId>,
}

/// Arena of the contexts created by one encode pass.
#[derive(Debug, Default)]
pub(crate) struct ContextArena {
    nodes: Vec<EncodeContext>,
}

impl ContextArena {
    /// Registers a new context, linking it under `parent` when given.
    pub fn push(
        &mut self,
        parent: Option<CtxId>,
        obj: ObjId,
        kind: ContainerKind,
        path: Path,
    ) -> CtxId {
        let id = self.nodes.len();
        self.nodes.push(EncodeContext {
            obj,
            kind,
            path,
            keys_written: BTreeSet::new(),
            max_index_written: None,
            children: Vec::new(),
            parent,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    pub fn get(&self, ctx: CtxId) -> &EncodeContext {
        &self.nodes[ctx]
    }

    pub fn record_key(&mut self, ctx: CtxId, key: String) {
        self.nodes[ctx].keys_written.insert(key);
    }

    pub fn record_index(&mut self, ctx: CtxId, index: usize) {
        let max = &mut self.nodes[ctx].max_index_written;
        *max = Some(max.map_or(index, |current| current.max(index)));
    }

    /// Handles of the contexts with no parent, in creation order.
    pub fn roots(&self) -> impl Iterator<Item = CtxId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
    }
}
