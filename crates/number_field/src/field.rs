//! Shared handle around a [`FieldSyncEngine`].
//!
//! Each operation borrows the engine only long enough to compute the
//! resulting events, then dispatches them with the borrow released. A
//! listener may therefore read from or write back into the same field; the
//! engine's idempotence rule (same value, no events) keeps such feedback
//! loops finite.
//!
//! Events raised from inside a listener are queued behind the events of the
//! update that is still being delivered. Listeners always see updates in the
//! order the engine applied them, so the last value-change delivered matches
//! the field's value.

use crate::coercion::{FloatDomain, IntegerDomain, NumericDomain};
use crate::config::FieldConfig;
use crate::constraints::ConstraintSet;
use crate::engine::{
    Events, FieldEvent, FieldSyncEngine, ValidationStatusEvent, ValueChangeEvent,
};
use crate::error::Result;
use crate::i18n::NumberFieldI18n;
use crate::listeners::{Listeners, Registration};
use crate::validator::ValidationResult;
use bus::{FieldCommand, Property, PropertyKey, PropertyUpdate};
use core_types::{FieldId, ValidationMode, ValueChangeMode};
use input_core::ValueSlot;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::sync::mpsc::Sender;

pub type FloatField = NumberField<FloatDomain>;
pub type IntegerField = NumberField<IntegerDomain>;

/// Events waiting for delivery, shared by every clone of a field.
struct Delivery<V> {
    dispatching: Cell<bool>,
    pending: RefCell<VecDeque<FieldEvent<V>>>,
}

impl<V> Delivery<V> {
    fn new() -> Self {
        Self {
            dispatching: Cell::new(false),
            pending: RefCell::new(VecDeque::new()),
        }
    }
}

/// Clears the dispatching flag even if a listener panics.
struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct NumberField<D: NumericDomain> {
    engine: Rc<RefCell<FieldSyncEngine<D>>>,
    delivery: Rc<Delivery<D::Value>>,
    status_listeners: Listeners<ValidationStatusEvent>,
    value_listeners: Listeners<ValueChangeEvent<D::Value>>,
}

impl<D: NumericDomain> Clone for NumberField<D> {
    fn clone(&self) -> Self {
        Self {
            engine: Rc::clone(&self.engine),
            delivery: Rc::clone(&self.delivery),
            status_listeners: self.status_listeners.clone(),
            value_listeners: self.value_listeners.clone(),
        }
    }
}

impl<D: NumericDomain> fmt::Debug for NumberField<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engine = self.engine.borrow();
        f.debug_struct("NumberField")
            .field("id", &engine.field_id())
            .field("slot", engine.slot())
            .field("raw_text", &engine.raw_text())
            .field("invalid", &engine.is_invalid())
            .finish()
    }
}

impl<D: NumericDomain> NumberField<D> {
    pub fn new(id: FieldId) -> Self {
        Self {
            engine: Rc::new(RefCell::new(FieldSyncEngine::new(id))),
            delivery: Rc::new(Delivery::new()),
            status_listeners: Listeners::new(),
            value_listeners: Listeners::new(),
        }
    }

    pub fn from_config(id: FieldId, config: &FieldConfig) -> Result<Self> {
        let field = Self::new(id);
        field.engine.borrow_mut().apply_config(config)?;
        Ok(field)
    }

    fn update(&self, f: impl FnOnce(&mut FieldSyncEngine<D>) -> Events<D::Value>) {
        let events = {
            let mut engine = self.engine.borrow_mut();
            f(&mut engine)
        };
        self.dispatch(events);
    }

    /// Queue `events`; the outermost caller delivers the queue in order.
    fn dispatch(&self, events: Events<D::Value>) {
        self.delivery.pending.borrow_mut().extend(events);
        if self.delivery.dispatching.replace(true) {
            return;
        }
        let _guard = DispatchGuard(&self.delivery.dispatching);
        loop {
            let next = self.delivery.pending.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            match event {
                FieldEvent::ValidationStatus(e) => self.status_listeners.dispatch(&e),
                FieldEvent::ValueChanged(e) => self.value_listeners.dispatch(&e),
            }
        }
    }

    // Value

    pub fn field_id(&self) -> FieldId {
        self.engine.borrow().field_id()
    }

    pub fn value(&self) -> Option<D::Value> {
        self.engine.borrow().value()
    }

    pub fn set_value(&self, value: Option<D::Value>) -> Result<()> {
        let events = self.engine.borrow_mut().set_value(value)?;
        self.dispatch(events);
        Ok(())
    }

    pub fn clear(&self) {
        // `None` always formats back to itself, so this cannot fail.
        let events = self.engine.borrow_mut().set_value(None).unwrap_or_default();
        self.dispatch(events);
    }

    pub fn slot(&self) -> ValueSlot<D::Value> {
        self.engine.borrow().slot().clone()
    }

    pub fn raw_text(&self) -> String {
        self.engine.borrow().raw_text().to_string()
    }

    pub fn is_unparsable(&self) -> bool {
        self.engine.borrow().is_unparsable()
    }

    pub fn is_empty(&self) -> bool {
        let engine = self.engine.borrow();
        engine.value().is_none() && !engine.is_unparsable()
    }

    // Inbound remote updates

    pub fn handle_command(&self, command: &FieldCommand) {
        self.update(|engine| engine.handle_command(command));
    }

    pub fn sync_from_remote(&self, text: &str) {
        self.update(|engine| engine.sync_from_remote(text));
    }

    // Constraints

    pub fn constraints(&self) -> ConstraintSet {
        self.engine.borrow().constraints().clone()
    }

    pub fn set_required(&self, required: bool) {
        self.engine.borrow_mut().set_required(required);
    }

    pub fn set_min(&self, min: D::Value) -> Result<()> {
        self.engine.borrow_mut().set_min(min)
    }

    pub fn set_max(&self, max: D::Value) -> Result<()> {
        self.engine.borrow_mut().set_max(max)
    }

    pub fn set_step(&self, step: D::Value) -> Result<()> {
        self.engine.borrow_mut().set_step(step)
    }

    pub fn set_step_buttons_visible(&self, visible: bool) {
        self.engine.borrow_mut().set_step_buttons_visible(visible);
    }

    pub fn value_change_mode(&self) -> ValueChangeMode {
        self.engine.borrow().value_change_mode()
    }

    pub fn set_value_change_mode(&self, mode: ValueChangeMode) {
        self.engine.borrow_mut().set_value_change_mode(mode);
    }

    pub fn i18n(&self) -> Option<NumberFieldI18n> {
        self.engine.borrow().i18n().cloned()
    }

    pub fn set_i18n(&self, i18n: NumberFieldI18n) {
        self.engine.borrow_mut().set_i18n(i18n);
    }

    pub fn set_i18n_toml(&self, source: &str) -> Result<()> {
        self.engine.borrow_mut().set_i18n_toml(source)
    }

    pub fn apply_config(&self, config: &FieldConfig) -> Result<()> {
        self.engine.borrow_mut().apply_config(config)
    }

    // Validation

    pub fn is_invalid(&self) -> bool {
        self.engine.borrow().is_invalid()
    }

    pub fn error_message(&self) -> String {
        self.engine.borrow().error_message().to_string()
    }

    pub fn set_invalid(&self, invalid: bool) {
        self.engine.borrow_mut().set_invalid(invalid);
    }

    pub fn set_error_message(&self, message: impl Into<String>) {
        self.engine.borrow_mut().set_error_message(message);
    }

    pub fn validation_mode(&self) -> ValidationMode {
        self.engine.borrow().validation_mode()
    }

    pub fn set_manual_validation(&self, enabled: bool) {
        self.engine.borrow_mut().set_manual_validation(enabled);
    }

    pub fn revalidate(&self) -> ValidationResult {
        self.engine.borrow_mut().revalidate()
    }

    pub fn validate_for_binding(&self, value: Option<D::Value>) -> ValidationResult {
        self.engine.borrow().validate_for_binding(value)
    }

    pub fn add_validation_status_listener(
        &self,
        listener: impl Fn(&ValidationStatusEvent) + 'static,
    ) -> Registration {
        self.status_listeners.subscribe(listener)
    }

    pub fn add_value_change_listener(
        &self,
        listener: impl Fn(&ValueChangeEvent<D::Value>) + 'static,
    ) -> Registration {
        self.value_listeners.subscribe(listener)
    }

    // Remote surface

    pub fn property(&self, key: PropertyKey) -> Option<Property> {
        self.engine.borrow().property(key).cloned()
    }

    pub fn connect(&self, tx: Sender<PropertyUpdate>) {
        self.engine.borrow_mut().connect(tx);
    }

    pub fn attach(&self) {
        self.engine.borrow_mut().attach();
    }

    pub fn detach(&self) {
        self.engine.borrow_mut().detach();
    }

    pub fn is_attached(&self) -> bool {
        self.engine.borrow().is_attached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn clones_share_state_and_listeners() {
        let field = FloatField::new(1);
        let other = field.clone();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _ = other.add_validation_status_listener(move |_| h.set(h.get() + 1));

        field.sync_from_remote("1");
        assert_eq!(other.value(), Some(1.0));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listeners_can_read_the_field_during_dispatch() {
        let field = IntegerField::new(1);
        let seen = Rc::new(Cell::new(None));
        let (f, s) = (field.clone(), Rc::clone(&seen));
        let _ = field.add_value_change_listener(move |_| s.set(f.value()));

        field.set_value(Some(12)).unwrap();
        assert_eq!(seen.get(), Some(12));
    }

    #[test]
    fn from_config_rejects_bad_configuration() {
        let config = FieldConfig {
            step: Some(-1.0),
            ..FieldConfig::default()
        };
        assert!(FloatField::from_config(1, &config).is_err());
    }

    #[test]
    fn clear_is_a_programmatic_empty_set() {
        let field = FloatField::new(1);
        field.set_value(Some(3.0)).unwrap();
        field.clear();
        assert!(field.is_empty());
        assert_eq!(field.raw_text(), "");
    }

    #[test]
    fn debug_shows_slot() {
        let field = IntegerField::new(4);
        field.sync_from_remote("x");
        let shown = format!("{field:?}");
        assert!(shown.contains("Unparsable"), "{shown}");
    }
}
