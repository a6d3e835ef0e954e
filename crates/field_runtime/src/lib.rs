//! Routes commands from the remote surface to registered fields.
//!
//! The runtime owns the receiving end of the command channel and the
//! sending end of the property channel. Fields stay single-threaded: the
//! caller drives delivery with [`FieldRuntime::pump`] on the thread that
//! owns the fields.

mod script;
mod session;

pub use script::{ScriptError, ScriptStep, parse_line, parse_script};
pub use session::{Output, Session};

use bus::{FieldCommand, PropertyUpdate};
use core_types::FieldId;
use number_field::{NumberField, NumericDomain};
use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};

/// A field the runtime can route commands to.
pub trait RemoteField {
    fn field_id(&self) -> FieldId;
    fn handle_command(&self, command: &FieldCommand);
    fn connect(&self, tx: Sender<PropertyUpdate>);
    fn attach(&self);
}

impl<D: NumericDomain> RemoteField for NumberField<D> {
    fn field_id(&self) -> FieldId {
        NumberField::field_id(self)
    }

    fn handle_command(&self, command: &FieldCommand) {
        NumberField::handle_command(self, command);
    }

    fn connect(&self, tx: Sender<PropertyUpdate>) {
        NumberField::connect(self, tx);
    }

    fn attach(&self) {
        NumberField::attach(self);
    }
}

pub struct FieldRuntime {
    fields: HashMap<FieldId, Box<dyn RemoteField>>,
    cmd_rx: Receiver<FieldCommand>,
    update_tx: Sender<PropertyUpdate>,
}

impl FieldRuntime {
    pub fn new(cmd_rx: Receiver<FieldCommand>, update_tx: Sender<PropertyUpdate>) -> Self {
        Self {
            fields: HashMap::new(),
            cmd_rx,
            update_tx,
        }
    }

    /// Connect the field to the property channel and attach it.
    ///
    /// A field registered under an id that is already taken replaces the
    /// previous one.
    pub fn register(&mut self, field: impl RemoteField + 'static) {
        let id = field.field_id();
        field.connect(self.update_tx.clone());
        field.attach();
        if self.fields.insert(id, Box::new(field)).is_some() {
            log::warn!(target: "numfield.bus", "field {id} registered twice, replacing");
        }
    }

    pub fn unregister(&mut self, id: FieldId) -> bool {
        self.fields.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Deliver one command. Returns `false` if no field has its id.
    pub fn dispatch(&self, command: &FieldCommand) -> bool {
        let id = command.field_id();
        match self.fields.get(&id) {
            Some(field) => {
                field.handle_command(command);
                true
            }
            None => {
                log::warn!(target: "numfield.bus", "dropping {command:?}: no field {id}");
                false
            }
        }
    }

    /// Deliver every command queued so far without blocking.
    ///
    /// Returns the number of commands that reached a field.
    pub fn pump(&mut self) -> usize {
        let mut delivered = 0;
        loop {
            match self.cmd_rx.try_recv() {
                Ok(command) => {
                    if self.dispatch(&command) {
                        delivered += 1;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!(target: "numfield.bus", "command channel closed");
                    break;
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bus::Bus;
    use number_field::{FloatField, IntegerField};

    #[test]
    fn pump_routes_by_field_id() {
        let bus = Bus::new();
        let mut runtime = FieldRuntime::new(bus.cmd_rx, bus.update_tx);
        let a = FloatField::new(1);
        let b = IntegerField::new(2);
        runtime.register(a.clone());
        runtime.register(b.clone());

        bus.cmd_tx
            .send(FieldCommand::Change { field_id: 2, text: "7".into() })
            .unwrap();
        bus.cmd_tx
            .send(FieldCommand::Change { field_id: 1, text: "0.5".into() })
            .unwrap();

        assert_eq!(runtime.pump(), 2);
        assert_eq!(a.value(), Some(0.5));
        assert_eq!(b.value(), Some(7));
    }

    #[test]
    fn unknown_ids_are_dropped() {
        let bus = Bus::new();
        let mut runtime = FieldRuntime::new(bus.cmd_rx, bus.update_tx);
        runtime.register(FloatField::new(1));

        bus.cmd_tx
            .send(FieldCommand::Change { field_id: 9, text: "1".into() })
            .unwrap();
        assert_eq!(runtime.pump(), 0);
    }

    #[test]
    fn registering_attaches() {
        let bus = Bus::new();
        let mut runtime = FieldRuntime::new(bus.cmd_rx, bus.update_tx);
        let field = FloatField::new(4);
        runtime.register(field.clone());
        assert!(field.is_attached());
        assert_eq!(runtime.len(), 1);
        assert!(bus.update_rx.try_recv().is_ok());

        assert!(runtime.unregister(4));
        assert!(runtime.is_empty());
    }
}
