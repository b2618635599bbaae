//! Post-encode cleanup.
//!
//! The low-level write API is additive: keys and indices a pass did not
//! touch survive it. Cleanup reconciles that with whole-value-replace
//! semantics by walking the contexts a pass registered and deleting
//! everything they did not write. Only contexts whose path starts with the
//! pass's path prefix are reconciled, so a path-scoped partial encode never
//! disturbs sibling subtrees; recursion into children is unconditional.

use super::context::{ContextArena, CtxId};
use crate::{document::Document, path::Path, schema::ContainerKind};

/// Reconciles every context of a finished pass against the document.
pub(crate) fn reconcile(doc: &dyn Document, arena: &ContextArena, prefix: &Path) {
    for root in arena.roots() {
        reconcile_ctx(doc, arena, root, prefix);
    }
}

fn reconcile_ctx(doc: &dyn Document, arena: &ContextArena, id: CtxId, prefix: &Path) {
    let ctx = arena.get(id);
    if ctx.path.starts_with(prefix) {
        match ctx.kind {
            ContainerKind::Keyed => {
                for key in doc.keys(&ctx.obj) {
                    if !ctx.keys_written.contains(&key) {
                        doc.delete(&ctx.obj, &crate::path::PathStep::Key(key.clone()))
                            .unwrap_or_else(|err| {
                                panic!(
                                    "cleanup failed to delete stale key '{key}' at {}: {err}",
                                    ctx.path
                                )
                            });
                    }
                }
            }
            ContainerKind::Indexed => {
                let keep = ctx.max_index_written.map_or(0, |max| max + 1);
                while doc.length(&ctx.obj) > keep {
                    let last = doc.length(&ctx.obj) - 1;
                    doc.delete(&ctx.obj, &crate::path::PathStep::Index(last))
                        .unwrap_or_else(|err| {
                            panic!(
                                "cleanup failed to delete stale index {last} at {}: {err}",
                                ctx.path
                            )
                        });
                }
            }
            ContainerKind::SingleValue => {}
        }
    }
    for child in &ctx.children {
        reconcile_ctx(doc, arena, *child, prefix);
    }
}
