//! Value slot of a single number field.
//!
//! The slot is the only place that knows whether the field holds a typed
//! value, nothing, or text the backend could not parse. It performs no
//! parsing itself; the caller decides which transition applies.

/// What the field currently holds.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueSlot<V> {
    Empty,
    Valid(V),
    /// The raw text was rejected by coercion.
    ///
    /// `last_parsed` is the typed value the field held before the bad input.
    /// It is never reported as the field's value, but remote-side change
    /// detection compares against it.
    Unparsable { last_parsed: Option<V> },
}

/// Snapshot of the slot taken right before a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition<V> {
    /// Reported value before the transition (`None` while unparsable).
    pub old_value: Option<V>,
    /// Last successfully parsed value before the transition.
    pub old_last_parsed: Option<V>,
    pub was_unparsable: bool,
}

/// Typed value, raw text and unparsable flag of one field.
///
/// Invariant: while unparsable, [`value`](Self::value) is `None` and the raw
/// text is non-empty.
#[derive(Clone, Debug)]
pub struct FieldValue<V> {
    slot: ValueSlot<V>,
    raw_text: String,

    /// Monotonic revision counter, incremented on any slot or raw-text change.
    revision: u64,
}

impl<V> Default for FieldValue<V> {
    fn default() -> Self {
        Self {
            slot: ValueSlot::Empty,
            raw_text: String::new(),
            revision: 0,
        }
    }
}

impl<V: Copy + PartialEq> FieldValue<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self) -> &ValueSlot<V> {
        &self.slot
    }

    /// The reported typed value.
    pub fn value(&self) -> Option<V> {
        match self.slot {
            ValueSlot::Valid(v) => Some(v),
            ValueSlot::Empty | ValueSlot::Unparsable { .. } => None,
        }
    }

    /// The typed value including the one hidden behind bad input.
    pub fn last_parsed(&self) -> Option<V> {
        match self.slot {
            ValueSlot::Valid(v) => Some(v),
            ValueSlot::Unparsable { last_parsed } => last_parsed,
            ValueSlot::Empty => None,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn is_unparsable(&self) -> bool {
        matches!(self.slot, ValueSlot::Unparsable { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.slot, ValueSlot::Empty)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Store a successfully parsed value together with the text it came from.
    pub fn adopt(&mut self, value: V, raw_text: String) -> Transition<V> {
        self.replace(ValueSlot::Valid(value), raw_text)
    }

    /// Record text the backend rejected.
    ///
    /// Empty text cannot be unparsable; it clears the slot instead.
    pub fn mark_unparsable(&mut self, raw_text: String) -> Transition<V> {
        if raw_text.is_empty() {
            return self.clear();
        }
        let last_parsed = self.last_parsed();
        self.replace(ValueSlot::Unparsable { last_parsed }, raw_text)
    }

    /// Drop any value and raw text.
    pub fn clear(&mut self) -> Transition<V> {
        self.replace(ValueSlot::Empty, String::new())
    }

    fn replace(&mut self, slot: ValueSlot<V>, raw_text: String) -> Transition<V> {
        let changed = self.slot != slot || self.raw_text != raw_text;
        let transition = Transition {
            old_value: self.value(),
            old_last_parsed: self.last_parsed(),
            was_unparsable: self.is_unparsable(),
        };
        if changed {
            log::trace!(
                target: "numfield.sync",
                "slot {:?} -> {:?} (raw {:?} -> {:?})",
                slot_name(&self.slot),
                slot_name(&slot),
                self.raw_text,
                raw_text
            );
            self.slot = slot;
            self.raw_text = raw_text;
            self.revision = self.revision.wrapping_add(1);
        }
        transition
    }
}

fn slot_name<V>(slot: &ValueSlot<V>) -> &'static str {
    match slot {
        ValueSlot::Empty => "empty",
        ValueSlot::Valid(_) => "valid",
        ValueSlot::Unparsable { .. } => "unparsable",
    }
}
