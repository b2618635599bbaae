//! Schema-path resolution.
//!
//! [`PathResolver`] turns an ordered path of key/index steps into the object
//! id a caller should operate on, optionally fabricating the intermediate
//! Map/List nodes the path implies. Resolution is governed by a
//! [`SchemaStrategy`] and by the [`ContainerKind`] the caller intends to use
//! at the end of the path.
//!
//! # Resolution rules
//!
//! - The empty path resolves to the root for [`ContainerKind::Keyed`]; the
//!   root is always a map, so the other container kinds fail on it.
//! - Interior steps descend through existing Map/List nodes. A Text object
//!   or a scalar with steps remaining is an error: paths never descend
//!   through leaves.
//! - A missing interior node is an error under [`SchemaStrategy::ReadOnly`];
//!   otherwise it is created, choosing Map or List from the shape of the
//!   *next* step (an index-shaped next step means a list).
//! - The final step resolves to a container of the requested kind, created
//!   when absent and permitted. A present node of the wrong kind is an
//!   error, never overwritten.
//! - For [`ContainerKind::SingleValue`], the final step is left to the
//!   caller: resolution returns the second-to-last container.
//! - An index step may point at most one past the end of its list (an
//!   append) when creation is permitted; under `ReadOnly` it must be
//!   strictly in bounds.

use std::fmt;

use crate::{
    document::{DocValue, Document, DocumentError, ObjId, ObjKind},
    path::{Path, PathStep},
};

pub mod errors;
pub mod trace;

pub use errors::LookupError;
pub use trace::{SchemaObserver, TraceEvent, TracingObserver, Verbosity};

/// How the final path step will be used by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// The caller operates on a map at the full path.
    Keyed,
    /// The caller operates on a list at the full path.
    Indexed,
    /// The caller reads or writes one value at the final step itself.
    SingleValue,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Keyed => write!(f, "keyed"),
            ContainerKind::Indexed => write!(f, "indexed"),
            ContainerKind::SingleValue => write!(f, "single-value"),
        }
    }
}

/// Governs whether resolution may fabricate missing schema nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaStrategy {
    /// Create missing Map/List nodes along the path as needed.
    #[default]
    CreateWhenNeeded,
    /// Reserved. Currently fails every resolution.
    Override,
    /// Never create or modify schema; missing nodes are errors.
    ReadOnly,
}

/// Resolves paths against a document, fabricating schema where permitted.
///
/// A resolver borrows the document and is created fresh per top-level
/// operation; it holds no state beyond its configuration.
pub struct PathResolver<'a> {
    doc: &'a dyn Document,
    strategy: SchemaStrategy,
    observer: &'a dyn SchemaObserver,
    verbosity: Verbosity,
}

impl<'a> PathResolver<'a> {
    /// Creates a resolver with the default (silent) trace configuration.
    pub fn new(doc: &'a dyn Document, strategy: SchemaStrategy) -> Self {
        PathResolver {
            doc,
            strategy,
            observer: &trace::DEFAULT_OBSERVER,
            verbosity: Verbosity::Errors,
        }
    }

    /// Sets the observer and verbosity for traversal trace events.
    pub fn with_trace(mut self, observer: &'a dyn SchemaObserver, verbosity: Verbosity) -> Self {
        self.observer = observer;
        self.verbosity = verbosity;
        self
    }

    /// Resolves `path` for use as a container of `kind`.
    ///
    /// Returns the id of the object the caller should operate on. For
    /// `SingleValue` this is the container *holding* the final step; for
    /// `Keyed`/`Indexed` it is the object at the full path.
    pub fn resolve(&self, path: &Path, kind: ContainerKind) -> Result<ObjId, LookupError> {
        if matches!(self.strategy, SchemaStrategy::Override) {
            return Err(LookupError::UnexpectedLookupFailure {
                path: path.clone(),
                reason: "the Override schema strategy is reserved and not implemented".to_string(),
            });
        }

        let steps = path.steps();
        if steps.is_empty() {
            return match kind {
                ContainerKind::Keyed => {
                    self.emit(TraceEvent::ContainerResolved {
                        path,
                        container: kind,
                        obj: ObjId::ROOT,
                    });
                    Ok(ObjId::ROOT)
                }
                ContainerKind::Indexed => Err(LookupError::MismatchedSchema {
                    path: path.clone(),
                    expected: "list".to_string(),
                    found: "map (document root)".to_string(),
                }),
                ContainerKind::SingleValue => Err(LookupError::NoPathForSingleValue),
            };
        }

        let mut current = ObjId::ROOT;
        let mut current_kind = ObjKind::Map;
        for depth in 0..steps.len() - 1 {
            let (obj, obj_kind) =
                self.advance(current, current_kind, &steps[depth], &steps[depth + 1], path, depth)?;
            current = obj;
            current_kind = obj_kind;
        }

        let resolved = match kind {
            ContainerKind::SingleValue => current,
            ContainerKind::Keyed => {
                self.resolve_final(current, current_kind, ObjKind::Map, path)?
            }
            ContainerKind::Indexed => {
                self.resolve_final(current, current_kind, ObjKind::List, path)?
            }
        };
        self.emit(TraceEvent::ContainerResolved {
            path,
            container: kind,
            obj: resolved,
        });
        Ok(resolved)
    }

    /// Walks one interior step, creating the node when missing and allowed.
    fn advance(
        &self,
        parent: ObjId,
        parent_kind: ObjKind,
        step: &PathStep,
        next: &PathStep,
        path: &Path,
        depth: usize,
    ) -> Result<(ObjId, ObjKind), LookupError> {
        self.check_step(parent, parent_kind, step, path, depth)?;
        let found = self
            .doc
            .get(&parent, step)
            .map_err(|source| self.wrap(path, depth, source))?;
        match found {
            Some(DocValue::Object(obj, kind @ (ObjKind::Map | ObjKind::List))) => {
                self.emit(TraceEvent::StepResolved { path, depth, obj });
                Ok((obj, kind))
            }
            Some(DocValue::Object(_, ObjKind::Text)) => Err(LookupError::PathExtendsThroughText {
                path: partial(path, depth),
            }),
            Some(DocValue::Scalar(_)) => Err(LookupError::PathExtendsThroughScalar {
                path: partial(path, depth),
            }),
            None => {
                let kind = if next.is_index() {
                    ObjKind::List
                } else {
                    ObjKind::Map
                };
                let obj = self.create(parent, step, kind, path, depth)?;
                Ok((obj, kind))
            }
        }
    }

    /// Resolves the final step as a child container of the wanted kind.
    fn resolve_final(
        &self,
        parent: ObjId,
        parent_kind: ObjKind,
        want: ObjKind,
        path: &Path,
    ) -> Result<ObjId, LookupError> {
        let depth = path.len() - 1;
        let step = &path.steps()[depth];
        self.check_step(parent, parent_kind, step, path, depth)?;
        let found = self
            .doc
            .get(&parent, step)
            .map_err(|source| self.wrap(path, depth, source))?;
        match found {
            Some(DocValue::Object(obj, kind)) if kind == want => Ok(obj),
            Some(found) => Err(LookupError::MismatchedSchema {
                path: path.clone(),
                expected: want.to_string(),
                found: found.type_name().to_string(),
            }),
            None => self.create(parent, step, want, path, depth),
        }
    }

    /// Validates key/index shape and index bounds for one step.
    fn check_step(
        &self,
        parent: ObjId,
        parent_kind: ObjKind,
        step: &PathStep,
        path: &Path,
        depth: usize,
    ) -> Result<(), LookupError> {
        match (step, parent_kind) {
            (PathStep::Key(_), ObjKind::Map) => Ok(()),
            (PathStep::Key(_), _) => Err(LookupError::InvalidValueLookup {
                path: partial(path, depth),
            }),
            (PathStep::Index(index), ObjKind::List) => {
                let length = self.doc.length(&parent);
                match self.strategy {
                    SchemaStrategy::ReadOnly if length == 0 => Err(LookupError::EmptyListIndex {
                        path: partial(path, depth),
                    }),
                    SchemaStrategy::ReadOnly if *index >= length => {
                        Err(LookupError::IndexOutOfBounds {
                            path: partial(path, depth),
                            index: *index,
                            length,
                        })
                    }
                    _ if *index > length => Err(LookupError::IndexOutOfBounds {
                        path: partial(path, depth),
                        index: *index,
                        length,
                    }),
                    _ => Ok(()),
                }
            }
            (PathStep::Index(_), _) => Err(LookupError::InvalidIndexLookup {
                path: partial(path, depth),
            }),
        }
    }

    /// Fabricates a missing node, when the strategy permits.
    fn create(
        &self,
        parent: ObjId,
        step: &PathStep,
        kind: ObjKind,
        path: &Path,
        depth: usize,
    ) -> Result<ObjId, LookupError> {
        if matches!(self.strategy, SchemaStrategy::ReadOnly) {
            return Err(LookupError::SchemaMissing {
                path: partial(path, depth),
            });
        }
        let obj = match step {
            PathStep::Key(_) => self
                .doc
                .put_object(&parent, step, kind)
                .map_err(|source| self.wrap(path, depth, source))?,
            PathStep::Index(index) => {
                let length = self.doc.length(&parent);
                if *index != length {
                    // The step was in bounds moments ago yet read back as
                    // absent without being an append.
                    return Err(LookupError::UnexpectedLookupFailure {
                        path: partial(path, depth),
                        reason: format!(
                            "index {index} read back as absent in a list of length {length}"
                        ),
                    });
                }
                self.doc
                    .insert_object(&parent, *index, kind)
                    .map_err(|source| self.wrap(path, depth, source))?
            }
        };
        self.emit(TraceEvent::NodeCreated {
            path,
            depth,
            kind,
            obj,
        });
        Ok(obj)
    }

    fn wrap(&self, path: &Path, depth: usize, source: DocumentError) -> LookupError {
        LookupError::Underlying {
            path: partial(path, depth),
            source,
        }
    }

    fn emit(&self, event: TraceEvent<'_>) {
        if self.verbosity >= event.verbosity() {
            self.observer.event(&event);
        }
    }
}

fn partial(path: &Path, depth: usize) -> Path {
    path.steps()[..=depth].to_vec().into()
}
