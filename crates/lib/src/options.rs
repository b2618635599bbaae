//! Configuration for encode and decode passes.

use std::{fmt, sync::Arc};

use crate::schema::{SchemaObserver, SchemaStrategy, Verbosity, trace};

/// Options shared by [`DocEncoder`](crate::DocEncoder) and
/// [`DocDecoder`](crate::DocDecoder).
///
/// ```
/// use doclens::{BridgeOptions, SchemaStrategy, Verbosity};
///
/// let options = BridgeOptions::new()
///     .with_strategy(SchemaStrategy::ReadOnly)
///     .with_cautious_write(true)
///     .with_verbosity(Verbosity::Debug);
/// assert_eq!(options.strategy, SchemaStrategy::ReadOnly);
/// ```
#[derive(Clone)]
pub struct BridgeOptions {
    /// Whether resolution may fabricate missing schema nodes.
    pub strategy: SchemaStrategy,
    /// Check existing values for coarse type compatibility before each
    /// write, aborting on mismatch instead of overwriting.
    pub cautious_write: bool,
    /// How much of path traversal is narrated as trace events.
    pub verbosity: Verbosity,
    observer: Option<Arc<dyn SchemaObserver>>,
}

impl BridgeOptions {
    /// Creates the default options: `CreateWhenNeeded`, no cautious writes,
    /// errors-only verbosity, trace events through [`tracing`].
    pub fn new() -> Self {
        BridgeOptions {
            strategy: SchemaStrategy::default(),
            cautious_write: false,
            verbosity: Verbosity::default(),
            observer: None,
        }
    }

    /// Sets the schema strategy.
    pub fn with_strategy(mut self, strategy: SchemaStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enables or disables cautious writes.
    pub fn with_cautious_write(mut self, cautious_write: bool) -> Self {
        self.cautious_write = cautious_write;
        self
    }

    /// Sets the trace verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Replaces the default tracing-backed observer.
    pub fn with_observer(mut self, observer: Arc<dyn SchemaObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub(crate) fn observer_ref(&self) -> &dyn SchemaObserver {
        self.observer
            .as_deref()
            .unwrap_or(&trace::DEFAULT_OBSERVER)
    }
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BridgeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeOptions")
            .field("strategy", &self.strategy)
            .field("cautious_write", &self.cautious_write)
            .field("verbosity", &self.verbosity)
            .field("observer", &self.observer.as_ref().map(|_| "custom"))
            .finish()
    }
}
