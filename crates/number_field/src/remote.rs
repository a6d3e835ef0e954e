//! Outbound side of the synchronized-property channel.
//!
//! Every property the field pushes is kept in a mirror keyed by property
//! kind. While detached nothing is sent, but the mirror keeps updating; on
//! attach the whole mirror is sent again, so the remote surface shows exactly
//! what it showed before it went away.

use bus::{Property, PropertyKey, PropertyUpdate, send_update};
use core_types::FieldId;
use std::collections::BTreeMap;
use std::sync::mpsc::Sender;

#[derive(Debug)]
pub struct RemoteProperties {
    field_id: FieldId,
    mirror: BTreeMap<PropertyKey, Property>,
    tx: Option<Sender<PropertyUpdate>>,
    attached: bool,
}

impl RemoteProperties {
    pub fn new(field_id: FieldId) -> Self {
        Self {
            field_id,
            mirror: BTreeMap::new(),
            tx: None,
            attached: false,
        }
    }

    pub fn connect(&mut self, tx: Sender<PropertyUpdate>) {
        self.tx = Some(tx);
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn get(&self, key: PropertyKey) -> Option<&Property> {
        self.mirror.get(&key)
    }

    /// Update the mirror and send the property if it changed.
    pub fn push(&mut self, property: Property) {
        if self.mirror.get(&property.key()) == Some(&property) {
            return;
        }
        self.mirror.insert(property.key(), property.clone());
        if self.attached {
            self.send(property);
        }
    }

    /// Update the mirror with a value the remote side already has.
    pub fn record(&mut self, property: Property) {
        self.mirror.insert(property.key(), property);
    }

    pub fn attach(&mut self) {
        self.attached = true;
        let properties: Vec<Property> = self.mirror.values().cloned().collect();
        log::debug!(
            target: "numfield.bus",
            "field {} attached, resending {} properties",
            self.field_id,
            properties.len()
        );
        for property in properties {
            self.send(property);
        }
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    fn send(&self, property: Property) {
        let Some(tx) = &self.tx else {
            return;
        };
        send_update(
            tx,
            PropertyUpdate {
                field_id: self.field_id,
                property,
            },
        );
    }
}
