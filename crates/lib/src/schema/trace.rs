//! Structured trace events for path traversal decisions.
//!
//! Resolution emits its decisions as typed events through an injected
//! [`SchemaObserver`] rather than logging ad hoc. The default observer
//! forwards to [`tracing`] under the `doclens::schema` target; callers who
//! want traversal decisions somewhere else (test capture, metrics) inject
//! their own observer through
//! [`BridgeOptions`](crate::options::BridgeOptions).

use super::ContainerKind;
use crate::{
    document::{ObjId, ObjKind},
    path::Path,
};

/// How much of the traversal should be narrated.
///
/// Levels are ordered: a level enables everything below it. The default,
/// [`Verbosity::Errors`], emits nothing; failures already surface as typed
/// errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// No trace events; errors only.
    #[default]
    Errors,
    /// Schema mutations: nodes fabricated during resolution.
    Debug,
    /// Every traversal decision, step by step.
    Tracing,
}

/// One traversal decision made by the resolver.
#[derive(Debug)]
pub enum TraceEvent<'a> {
    /// An interior step resolved to an existing container.
    StepResolved {
        path: &'a Path,
        depth: usize,
        obj: ObjId,
    },
    /// A missing interior or final node was fabricated.
    NodeCreated {
        path: &'a Path,
        depth: usize,
        kind: ObjKind,
        obj: ObjId,
    },
    /// A full resolution completed.
    ContainerResolved {
        path: &'a Path,
        container: ContainerKind,
        obj: ObjId,
    },
}

impl TraceEvent<'_> {
    /// The minimum verbosity at which this event is emitted.
    pub fn verbosity(&self) -> Verbosity {
        match self {
            TraceEvent::NodeCreated { .. } => Verbosity::Debug,
            TraceEvent::StepResolved { .. } | TraceEvent::ContainerResolved { .. } => {
                Verbosity::Tracing
            }
        }
    }
}

/// Receiver for traversal trace events.
pub trait SchemaObserver: Send + Sync {
    /// Called for each event at or below the configured verbosity.
    fn event(&self, event: &TraceEvent<'_>);
}

/// The default observer: forwards events to [`tracing`].
#[derive(Debug, Default)]
pub struct TracingObserver;

impl SchemaObserver for TracingObserver {
    fn event(&self, event: &TraceEvent<'_>) {
        match event {
            TraceEvent::StepResolved { path, depth, obj } => {
                tracing::trace!(target: "doclens::schema", path = %path, depth, obj = %obj, "step resolved");
            }
            TraceEvent::NodeCreated {
                path,
                depth,
                kind,
                obj,
            } => {
                tracing::debug!(target: "doclens::schema", path = %path, depth, kind = %kind, obj = %obj, "node created");
            }
            TraceEvent::ContainerResolved {
                path,
                container,
                obj,
            } => {
                tracing::trace!(target: "doclens::schema", path = %path, container = %container, obj = %obj, "container resolved");
            }
        }
    }
}

pub(crate) static DEFAULT_OBSERVER: TracingObserver = TracingObserver;
