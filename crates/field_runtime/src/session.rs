//! A single field wired to an in-process bus, driven by script steps.

use crate::script::ScriptStep;
use crate::FieldRuntime;
use bus::{Bus, FieldCommand, Property, PropertyUpdate};
use core_types::FieldId;
use number_field::{NumberField, NumericDomain, Registration};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender};

/// One observable effect, in the order it happened within a step.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Output {
    Status {
        field_id: FieldId,
        valid: bool,
    },
    Value {
        field_id: FieldId,
        old: Option<f64>,
        new: Option<f64>,
        from_remote: bool,
    },
    Update {
        field_id: FieldId,
        property: Property,
    },
    Snapshot {
        field_id: FieldId,
        value: Option<f64>,
        raw_text: String,
        unparsable: bool,
        invalid: bool,
        error_message: String,
    },
    Error {
        message: String,
    },
}

impl Output {
    pub fn to_json_line(&self) -> String {
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl From<PropertyUpdate> for Output {
    fn from(update: PropertyUpdate) -> Self {
        Output::Update {
            field_id: update.field_id,
            property: update.property,
        }
    }
}

pub struct Session<D: NumericDomain> {
    field: NumberField<D>,
    runtime: FieldRuntime,
    cmd_tx: Sender<FieldCommand>,
    update_rx: Receiver<PropertyUpdate>,
    events: Rc<RefCell<Vec<Output>>>,
    _registrations: Vec<Registration>,
}

impl<D: NumericDomain> Session<D> {
    /// Register `field` on a fresh bus. The attach flush is left pending
    /// for the first [`drain`](Self::drain).
    pub fn new(field: NumberField<D>) -> Self {
        let Bus {
            cmd_tx,
            cmd_rx,
            update_tx,
            update_rx,
        } = Bus::new();
        let mut runtime = FieldRuntime::new(cmd_rx, update_tx);
        runtime.register(field.clone());

        let events = Rc::new(RefCell::new(Vec::new()));
        let status = Rc::clone(&events);
        let values = Rc::clone(&events);
        let registrations = vec![
            field.add_validation_status_listener(move |e| {
                status.borrow_mut().push(Output::Status {
                    field_id: e.field_id,
                    valid: e.valid,
                })
            }),
            field.add_value_change_listener(move |e| {
                values.borrow_mut().push(Output::Value {
                    field_id: e.field_id,
                    old: e.old.map(D::to_f64),
                    new: e.new.map(D::to_f64),
                    from_remote: e.from_remote,
                })
            }),
        ];

        Self {
            field,
            runtime,
            cmd_tx,
            update_rx,
            events,
            _registrations: registrations,
        }
    }

    pub fn field(&self) -> &NumberField<D> {
        &self.field
    }

    pub fn run(&mut self, step: &ScriptStep) -> Vec<Output> {
        let mut outputs = Vec::new();
        match step {
            ScriptStep::Command(command) => {
                if self.cmd_tx.send(command.clone()).is_ok() {
                    self.runtime.pump();
                }
            }
            ScriptStep::SetValue(value) => {
                if let Err(message) = self.set_value(*value) {
                    outputs.push(Output::Error { message });
                }
            }
            ScriptStep::Manual(enabled) => self.field.set_manual_validation(*enabled),
            ScriptStep::SetInvalid(invalid) => self.field.set_invalid(*invalid),
            ScriptStep::SetErrorMessage(message) => self.field.set_error_message(message.as_str()),
            ScriptStep::Status => outputs.push(self.snapshot()),
        }
        let mut drained = self.drain();
        drained.append(&mut outputs);
        drained
    }

    /// Listener events first, then property updates sent since the last drain.
    pub fn drain(&mut self) -> Vec<Output> {
        let mut outputs = std::mem::take(&mut *self.events.borrow_mut());
        outputs.extend(self.update_rx.try_iter().map(Output::from));
        outputs
    }

    fn set_value(&self, value: Option<f64>) -> Result<(), String> {
        let value = match value {
            Some(v) => Some(
                D::from_f64(v).ok_or_else(|| format!("{v} is not representable in this field"))?,
            ),
            None => None,
        };
        self.field.set_value(value).map_err(|err| err.to_string())
    }

    fn snapshot(&self) -> Output {
        Output::Snapshot {
            field_id: self.field.field_id(),
            value: self.field.value().map(D::to_f64),
            raw_text: self.field.raw_text(),
            unparsable: self.field.is_unparsable(),
            invalid: self.field.is_invalid(),
            error_message: self.field.error_message(),
        }
    }
}
