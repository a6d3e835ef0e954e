use core_types::FieldId;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};

/// Inbound notifications from the remote UI surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldCommand {
    // Raw text synchronization
    Input {
        field_id: FieldId,
        text: String,
    },
    Change {
        field_id: FieldId,
        text: String,
    },
    Blur {
        field_id: FieldId,
        text: String,
    },
    /// The remote surface's own parsing disagrees with what it last reported.
    UnparsableChange {
        field_id: FieldId,
        text: String,
    },
    // Lifecycle
    Attach {
        field_id: FieldId,
    },
    Detach {
        field_id: FieldId,
    },
}

impl FieldCommand {
    pub fn field_id(&self) -> FieldId {
        match self {
            Self::Input { field_id, .. }
            | Self::Change { field_id, .. }
            | Self::Blur { field_id, .. }
            | Self::UnparsableChange { field_id, .. }
            | Self::Attach { field_id }
            | Self::Detach { field_id } => *field_id,
        }
    }
}

/// A synchronized property pushed to the remote surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "value", rename_all = "camelCase")]
pub enum Property {
    // Presentation
    Invalid(bool),
    ErrorMessage(String),
    // Constraint mirrors (advisory client-side precheck)
    Min(f64),
    Max(f64),
    Step(f64),
    Required(bool),
    // Input element
    InputText(String),
    StepButtonsVisible(bool),
    ValueChangeTimeout(u32),
}

/// Identifies a property independent of its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyKey {
    Invalid,
    ErrorMessage,
    Min,
    Max,
    Step,
    Required,
    InputText,
    StepButtonsVisible,
    ValueChangeTimeout,
}

impl Property {
    pub fn key(&self) -> PropertyKey {
        match self {
            Self::Invalid(_) => PropertyKey::Invalid,
            Self::ErrorMessage(_) => PropertyKey::ErrorMessage,
            Self::Min(_) => PropertyKey::Min,
            Self::Max(_) => PropertyKey::Max,
            Self::Step(_) => PropertyKey::Step,
            Self::Required(_) => PropertyKey::Required,
            Self::InputText(_) => PropertyKey::InputText,
            Self::StepButtonsVisible(_) => PropertyKey::StepButtonsVisible,
            Self::ValueChangeTimeout(_) => PropertyKey::ValueChangeTimeout,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyUpdate {
    pub field_id: FieldId,
    #[serde(flatten)]
    pub property: Property,
}

pub struct Bus {
    pub cmd_tx: Sender<FieldCommand>, // shareable for transports
    pub cmd_rx: Receiver<FieldCommand>,
    pub update_tx: Sender<PropertyUpdate>, // cloned into every field
    pub update_rx: Receiver<PropertyUpdate>,
}

impl Bus {
    pub fn new() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (update_tx, update_rx) = mpsc::channel();
        Self {
            cmd_tx,
            cmd_rx,
            update_tx,
            update_rx,
        }
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

/// Push a property update, logging instead of failing when nobody listens.
pub fn send_update(tx: &Sender<PropertyUpdate>, update: PropertyUpdate) {
    if let Err(err) = tx.send(update) {
        log::debug!(target: "numfield.bus", "dropped property update: {:?}", err.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_reports_its_field() {
        let cmd = FieldCommand::UnparsableChange {
            field_id: 9,
            text: "1e".to_string(),
        };
        assert_eq!(cmd.field_id(), 9);
        assert_eq!(FieldCommand::Detach { field_id: 3 }.field_id(), 3);
    }

    #[test]
    fn property_update_serializes_flat() {
        let update = PropertyUpdate {
            field_id: 1,
            property: Property::ErrorMessage("too big".to_string()),
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(
            json,
            r#"{"field_id":1,"name":"errorMessage","value":"too big"}"#
        );
    }

    #[test]
    fn command_round_trips_through_json() {
        let json = r#"{"type":"change","field_id":2,"text":"4.5"}"#;
        let cmd: FieldCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            FieldCommand::Change {
                field_id: 2,
                text: "4.5".to_string()
            }
        );
    }

    #[test]
    fn bus_delivers_in_order() {
        let bus = Bus::new();
        send_update(
            &bus.update_tx,
            PropertyUpdate {
                field_id: 1,
                property: Property::Invalid(true),
            },
        );
        send_update(
            &bus.update_tx,
            PropertyUpdate {
                field_id: 1,
                property: Property::Invalid(false),
            },
        );
        let got: Vec<_> = bus.update_rx.try_iter().map(|u| u.property).collect();
        assert_eq!(got, vec![Property::Invalid(true), Property::Invalid(false)]);
    }

    #[test]
    fn send_after_receiver_dropped_is_silent() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        send_update(
            &tx,
            PropertyUpdate {
                field_id: 1,
                property: Property::Required(true),
            },
        );
    }

    #[test]
    fn keys_match_variants() {
        assert_eq!(Property::Step(0.5).key(), PropertyKey::Step);
        assert_eq!(
            Property::ValueChangeTimeout(300).key(),
            PropertyKey::ValueChangeTimeout
        );
    }
}
