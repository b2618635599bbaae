//! Handoff slots between the bridge codec and the wrapper types.
//!
//! serde's data model has no side channel, so a binding (which holds a
//! document handle) cannot travel through it. The codec instead parks the
//! binding in a thread-local slot immediately before driving the wrapper's
//! serde impl, and the wrapper impl collects it. Each slot is written and
//! consumed within one synchronous call; the codec clears it afterwards so
//! nothing stale survives an error path. When a wrapper is driven by a
//! foreign serde format the slots are empty and the wrapper comes out
//! unbound.

use std::cell::Cell;

use super::{Binding, TextBinding};

thread_local! {
    static COUNTER_SLOT: Cell<Option<Binding>> = const { Cell::new(None) };
    static TEXT_SLOT: Cell<Option<TextBinding>> = const { Cell::new(None) };
}

pub(crate) fn stash_counter_binding(binding: Option<Binding>) {
    COUNTER_SLOT.with(|slot| slot.set(binding));
}

pub(crate) fn take_counter_binding() -> Option<Binding> {
    COUNTER_SLOT.with(Cell::take)
}

pub(crate) fn stash_text_binding(binding: Option<TextBinding>) {
    TEXT_SLOT.with(|slot| slot.set(binding));
}

pub(crate) fn take_text_binding() -> Option<TextBinding> {
    TEXT_SLOT.with(Cell::take)
}
