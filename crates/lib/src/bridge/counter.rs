//! A convergent counter value.

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{Error as DeError, Visitor},
};
use std::fmt;

use super::{Binding, COUNTER_NEWTYPE, channel};
use crate::document::{DocValue, DocumentError, Scalar};

/// A counter with increment-merge semantics.
///
/// Counters exist so that concurrent adjustments combine instead of
/// overwriting one another. Encoding an unbound counter over an existing
/// document counter applies the *difference* as an increment; decoding
/// produces a counter bound to its position in the document, so
/// [`increment`](Counter::increment) writes through immediately.
///
/// ```
/// use doclens::Counter;
///
/// let mut hits = Counter::new(0);
/// assert!(!hits.is_bound());
/// hits.increment(2)?;
/// assert_eq!(hits.value(), 2);
/// # Ok::<(), doclens::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Counter {
    value: i64,
    binding: Option<Binding>,
}

impl Counter {
    /// Creates an unbound counter with the given starting value.
    pub fn new(value: i64) -> Self {
        Counter {
            value,
            binding: None,
        }
    }

    /// Returns the last known value of the counter.
    ///
    /// For a bound counter this reflects local increments; increments merged
    /// in from other collaborators become visible after [`sync`](Counter::sync).
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Returns `true` if this counter is a live reference into a document.
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Adds `delta` to the counter. A bound counter writes the increment
    /// through to its document immediately.
    pub fn increment(&mut self, delta: i64) -> crate::Result<()> {
        if let Some(binding) = &self.binding {
            binding.doc.increment(&binding.obj, &binding.prop, delta)?;
        }
        self.value += delta;
        Ok(())
    }

    /// Re-reads the value from the document, when bound, and returns it.
    pub fn sync(&mut self) -> crate::Result<i64> {
        if let Some(binding) = &self.binding {
            match binding.doc.get(&binding.obj, &binding.prop)? {
                Some(DocValue::Scalar(Scalar::Counter(value))) => {
                    self.value = value;
                }
                _ => {
                    return Err(DocumentError::MissingCounter {
                        obj: binding.obj,
                        prop: binding.prop.to_string(),
                    }
                    .into());
                }
            }
        }
        Ok(self.value)
    }
}

impl Default for Counter {
    fn default() -> Self {
        Counter::new(0)
    }
}

impl From<i64> for Counter {
    fn from(value: i64) -> Self {
        Counter::new(value)
    }
}

impl PartialEq for Counter {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Counter {}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for Counter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // The bridge serializer collects the binding from the slot; any
        // other format ignores it and sees a plain integer.
        channel::stash_counter_binding(self.binding.clone());
        serializer.serialize_newtype_struct(COUNTER_NEWTYPE, &self.value)
    }
}

struct CounterVisitor;

impl<'de> Visitor<'de> for CounterVisitor {
    type Value = Counter;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a counter value")
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Counter, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Ok(Counter {
            value,
            binding: channel::take_counter_binding(),
        })
    }

    fn visit_i64<E>(self, value: i64) -> Result<Counter, E>
    where
        E: DeError,
    {
        Ok(Counter {
            value,
            binding: channel::take_counter_binding(),
        })
    }

    fn visit_u64<E>(self, value: u64) -> Result<Counter, E>
    where
        E: DeError,
    {
        let value = i64::try_from(value)
            .map_err(|_| E::custom(format!("counter value {value} out of range")))?;
        self.visit_i64(value)
    }
}

impl<'de> Deserialize<'de> for Counter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_newtype_struct(COUNTER_NEWTYPE, CounterVisitor)
    }
}
