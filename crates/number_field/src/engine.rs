//! The synchronization engine.
//!
//! [`FieldSyncEngine`] decides, for every inbound update, which transition
//! the value slot takes, runs validation and returns the events to deliver.
//! It never calls listeners itself: the caller dispatches the returned
//! events after releasing its borrow of the engine, which lets listeners
//! write back into the same field.
//!
//! Transitions:
//!
//! | update                              | slot            | events                      |
//! |-------------------------------------|-----------------|-----------------------------|
//! | remote text, parses                 | `Valid(v)`      | status; value-change if new |
//! | remote text, does not parse         | `Unparsable`    | status                      |
//! | remote text, empty                  | `Empty`         | status; value-change if set |
//! | `set_value(v)`, `v` differs         | `Valid`/`Empty` | value-change                |
//! | `set_value(None)` on bad input      | `Empty`         | status                      |
//! | `set_value(v)` on bad input parsed  | `Valid(v)`      | status                      |
//! | as `v` before                       |                 |                             |
//! | `set_value(v)`, same `v`            | unchanged       | none                        |

use crate::coercion::NumericDomain;
use crate::config::FieldConfig;
use crate::constraints::ConstraintSet;
use crate::controller::ValidationStateController;
use crate::error::{ConfigError, Result};
use crate::i18n::NumberFieldI18n;
use crate::remote::RemoteProperties;
use crate::validator::{ConstraintValidator, ValidationOrigin, ValidationResult};
use bus::{FieldCommand, Property, PropertyKey, PropertyUpdate};
use core_types::{FieldId, ValidationMode, ValueChangeMode};
use input_core::{FieldValue, ValueSlot, is_blank, normalize_raw_text};
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::mpsc::Sender;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationStatusEvent {
    pub field_id: FieldId,
    pub valid: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ValueChangeEvent<V> {
    pub field_id: FieldId,
    pub old: Option<V>,
    pub new: Option<V>,
    /// `true` when the change came from the remote surface.
    pub from_remote: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldEvent<V> {
    ValidationStatus(ValidationStatusEvent),
    ValueChanged(ValueChangeEvent<V>),
}

pub type Events<V> = Vec<FieldEvent<V>>;

#[derive(Debug)]
pub struct FieldSyncEngine<D: NumericDomain> {
    id: FieldId,
    value: FieldValue<D::Value>,
    constraints: ConstraintSet,
    i18n: Option<NumberFieldI18n>,
    controller: ValidationStateController,
    value_change_mode: ValueChangeMode,
    remote: RemoteProperties,
    _domain: PhantomData<D>,
}

impl<D: NumericDomain> FieldSyncEngine<D> {
    pub fn new(id: FieldId) -> Self {
        let mut remote = RemoteProperties::new(id);
        remote.push(Property::Invalid(false));
        Self {
            id,
            value: FieldValue::new(),
            constraints: ConstraintSet::for_domain::<D>(),
            i18n: None,
            controller: ValidationStateController::new(),
            value_change_mode: ValueChangeMode::default(),
            remote,
            _domain: PhantomData,
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn field_id(&self) -> FieldId {
        self.id
    }

    /// Reported value; `None` while empty or unparsable.
    pub fn value(&self) -> Option<D::Value> {
        self.value.value()
    }

    pub fn slot(&self) -> &ValueSlot<D::Value> {
        self.value.slot()
    }

    pub fn raw_text(&self) -> &str {
        self.value.raw_text()
    }

    pub fn is_unparsable(&self) -> bool {
        self.value.is_unparsable()
    }

    pub fn revision(&self) -> u64 {
        self.value.revision()
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn i18n(&self) -> Option<&NumberFieldI18n> {
        self.i18n.as_ref()
    }

    pub fn is_invalid(&self) -> bool {
        self.controller.is_invalid()
    }

    pub fn error_message(&self) -> &str {
        self.controller.error_message()
    }

    pub fn validation_mode(&self) -> ValidationMode {
        self.controller.mode()
    }

    pub fn value_change_mode(&self) -> ValueChangeMode {
        self.value_change_mode
    }

    pub fn is_attached(&self) -> bool {
        self.remote.is_attached()
    }

    /// Last value pushed (or recorded) for a remote property.
    pub fn property(&self, key: PropertyKey) -> Option<&Property> {
        self.remote.get(key)
    }

    // =========================================================================
    // Inbound updates
    // =========================================================================

    pub fn handle_command(&mut self, command: &FieldCommand) -> Events<D::Value> {
        if command.field_id() != self.id {
            log::warn!(
                target: "numfield.bus",
                "field {} ignoring command addressed to {}",
                self.id,
                command.field_id()
            );
            return Vec::new();
        }

        let mode = self.value_change_mode;
        match command {
            FieldCommand::Input { text, .. } if mode.syncs_on_input() => {
                self.sync_from_remote(text)
            }
            FieldCommand::Change { text, .. } if mode.syncs_on_change() => {
                self.sync_from_remote(text)
            }
            FieldCommand::Blur { text, .. } if mode.syncs_on_blur() => self.sync_from_remote(text),
            // The remote surface only fires this when its parsing and the
            // reported text disagree, so it always goes through the pipeline.
            FieldCommand::UnparsableChange { text, .. } => self.sync_from_remote(text),
            FieldCommand::Attach { .. } => {
                self.attach();
                Vec::new()
            }
            FieldCommand::Detach { .. } => {
                self.detach();
                Vec::new()
            }
            other => {
                log::trace!(
                    target: "numfield.sync",
                    "{other:?} does not sync in {mode:?} mode"
                );
                Vec::new()
            }
        }
    }

    /// Reconcile raw text reported by the remote surface.
    pub fn sync_from_remote(&mut self, text: &str) -> Events<D::Value> {
        let text = normalize_raw_text(text).into_owned();
        self.remote.record(Property::InputText(text.clone()));

        let transition = match D::parse(&text) {
            Some(value) => self.value.adopt(value, text),
            None if is_blank(&text) => self.value.clear(),
            None => self.value.mark_unparsable(text),
        };

        let result = self.run_validation();
        let mut events = vec![self.status_event(&result)];

        // Bad input hides the value without replacing it, so compare what
        // was last parsed rather than what is reported.
        let old = transition.old_last_parsed;
        let new = self.value.last_parsed();
        if old != new {
            events.push(FieldEvent::ValueChanged(ValueChangeEvent {
                field_id: self.id,
                old,
                new,
                from_remote: true,
            }));
        }
        events
    }

    /// Programmatic value update.
    ///
    /// Rejects values the domain cannot format back into parsable text
    /// (such as NaN) without touching the field.
    pub fn set_value(&mut self, value: Option<D::Value>) -> Result<Events<D::Value>> {
        if let Some(v) = value
            && D::parse(&D::format(v)) != Some(v)
        {
            return Err(ConfigError::OutOfDomain {
                name: "value",
                value: D::to_f64(v),
            });
        }

        if value == self.value.value() && !self.value.is_unparsable() {
            return Ok(Vec::new());
        }

        let transition = match value {
            Some(v) => self.value.adopt(v, D::format(v)),
            None => self.value.clear(),
        };
        self.remote
            .push(Property::InputText(self.value.raw_text().to_string()));
        let result = self.run_validation();

        // Bad input hid the last parsed value; consumers last saw that one.
        let old = if transition.was_unparsable {
            transition.old_last_parsed
        } else {
            transition.old_value
        };
        if transition.was_unparsable && (value.is_none() || old == value) {
            // Replacing bad input without moving the reported value: only
            // the status feed can tell consumers that the field changed.
            return Ok(vec![self.status_event(&result)]);
        }

        Ok(vec![FieldEvent::ValueChanged(ValueChangeEvent {
            field_id: self.id,
            old,
            new: value,
            from_remote: false,
        })])
    }

    // =========================================================================
    // Constraints and configuration
    // =========================================================================

    pub fn set_required(&mut self, required: bool) {
        self.constraints.set_required(required);
        self.remote.push(Property::Required(required));
    }

    pub fn set_min(&mut self, min: D::Value) -> Result<()> {
        let min = D::to_f64(min);
        self.constraints.set_min(min)?;
        self.remote.push(Property::Min(min));
        Ok(())
    }

    pub fn set_max(&mut self, max: D::Value) -> Result<()> {
        let max = D::to_f64(max);
        self.constraints.set_max(max)?;
        self.remote.push(Property::Max(max));
        Ok(())
    }

    pub fn set_step(&mut self, step: D::Value) -> Result<()> {
        let step = D::to_f64(step);
        self.constraints.set_step(step)?;
        self.remote.push(Property::Step(step));
        Ok(())
    }

    pub fn set_i18n(&mut self, i18n: NumberFieldI18n) {
        self.i18n = Some(i18n);
    }

    pub fn set_i18n_toml(&mut self, source: &str) -> Result<()> {
        let i18n = NumberFieldI18n::from_toml_str(source)?;
        self.set_i18n(i18n);
        Ok(())
    }

    pub fn set_step_buttons_visible(&mut self, visible: bool) {
        self.remote.push(Property::StepButtonsVisible(visible));
    }

    pub fn set_value_change_mode(&mut self, mode: ValueChangeMode) {
        self.value_change_mode = mode;
        if let Some(ms) = mode.timeout_ms() {
            self.remote.push(Property::ValueChangeTimeout(ms));
        }
    }

    /// Apply a whole configuration, or nothing if any part is rejected.
    pub fn apply_config(&mut self, config: &FieldConfig) -> Result<()> {
        let min = config.min.map(|v| domain_value::<D>("min", v)).transpose()?;
        let max = config.max.map(|v| domain_value::<D>("max", v)).transpose()?;
        let step = config.step.map(|v| domain_value::<D>("step", v)).transpose()?;

        let mut candidate = self.constraints.clone();
        candidate.set_required(config.required);
        if let Some(min) = min {
            candidate.set_min(D::to_f64(min))?;
        }
        if let Some(max) = max {
            candidate.set_max(D::to_f64(max))?;
        }
        if let Some(step) = step {
            candidate.set_step(D::to_f64(step))?;
        }

        // Everything below is infallible.
        self.constraints = candidate;
        self.remote.push(Property::Required(config.required));
        if min.is_some() {
            self.remote.push(Property::Min(self.constraints.min()));
        }
        if max.is_some() {
            self.remote.push(Property::Max(self.constraints.max()));
        }
        if step.is_some() {
            self.remote.push(Property::Step(self.constraints.step()));
        }
        if let Some(i18n) = &config.i18n {
            self.set_i18n(i18n.clone());
        }
        self.set_manual_validation(config.manual_validation);
        self.set_step_buttons_visible(config.step_buttons_visible);
        self.set_value_change_mode(config.value_change_mode);
        Ok(())
    }

    // =========================================================================
    // Validation and presentation
    // =========================================================================

    pub fn set_manual_validation(&mut self, enabled: bool) {
        self.controller.set_manual_validation(enabled);
    }

    pub fn set_invalid(&mut self, invalid: bool) {
        if self.controller.set_invalid(invalid) {
            self.remote.push(Property::Invalid(invalid));
        }
    }

    pub fn set_error_message(&mut self, message: impl Into<String>) {
        if self.controller.set_error_message(message) {
            self.push_presentation();
        }
    }

    /// Validate the current state and apply it to the presentation, without
    /// emitting events.
    pub fn revalidate(&mut self) -> ValidationResult {
        self.run_validation()
    }

    /// Validate on behalf of an external binding consumer.
    ///
    /// The required check is skipped and the presentation is left alone.
    /// The field's own unparsable state still takes precedence.
    pub fn validate_for_binding(&self, value: Option<D::Value>) -> ValidationResult {
        ConstraintValidator::new(&self.constraints, self.i18n.as_ref()).validate::<D>(
            value,
            self.value.is_unparsable(),
            ValidationOrigin::Binding,
        )
    }

    fn run_validation(&mut self) -> ValidationResult {
        let result = ConstraintValidator::new(&self.constraints, self.i18n.as_ref()).validate::<D>(
            self.value.value(),
            self.value.is_unparsable(),
            ValidationOrigin::Field,
        );
        if self.controller.apply(&result) {
            self.push_presentation();
        }
        result
    }

    fn push_presentation(&mut self) {
        self.remote.push(Property::Invalid(self.controller.is_invalid()));
        self.remote.push(Property::ErrorMessage(
            self.controller.error_message().to_string(),
        ));
    }

    fn status_event(&self, result: &ValidationResult) -> FieldEvent<D::Value> {
        FieldEvent::ValidationStatus(ValidationStatusEvent {
            field_id: self.id,
            valid: result.is_ok(),
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn connect(&mut self, tx: Sender<PropertyUpdate>) {
        self.remote.connect(tx);
    }

    /// Resend every synchronized property. Fires no events.
    pub fn attach(&mut self) {
        self.remote.attach();
    }

    /// Stop sending properties. State is kept as is.
    pub fn detach(&mut self) {
        self.remote.detach();
    }
}

fn domain_value<D: NumericDomain>(name: &'static str, value: f64) -> Result<D::Value> {
    if value.is_nan() {
        return Err(ConfigError::NotANumber { name });
    }
    D::from_f64(value).ok_or(ConfigError::OutOfDomain { name, value })
}
