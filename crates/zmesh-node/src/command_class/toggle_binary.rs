//! Toggle-binary command class (0x28).
//!
//! The structurally simplest member of the family: a boolean switch whose
//! Set toggles it, with Get/Report for state. The report datum is 0x00 for
//! off and anything else (devices send 0xFF) for on.

use tracing::{debug, warn};
use zmesh_wire::{split_app_payload, COMMAND_CLASS_TOGGLE_BINARY};

use crate::command_class::{send_command, CommandClass, RequestFlags, ValueWrite};
use crate::node::Node;
use crate::value::{Datum, Genre, ValueKind, ValueSpec};

/// Toggle the switch state.
pub const TOGGLE_BINARY_SET: u8 = 0x01;
/// Request a state report.
pub const TOGGLE_BINARY_GET: u8 = 0x02;
/// State report from the device.
pub const TOGGLE_BINARY_REPORT: u8 = 0x03;

/// Index of the cached "Toggle Switch" value.
pub const VALUE_INDEX_SWITCH: u8 = 0;

/// Handler for the toggle-binary capability.
#[derive(Debug, Default)]
pub struct ToggleBinary;

impl CommandClass for ToggleBinary {
    fn class_id(&self) -> u8 {
        COMMAND_CLASS_TOGGLE_BINARY
    }

    fn name(&self) -> &'static str {
        "ToggleBinary"
    }

    fn create_vars(&self, node: &Node, instance: u8) {
        node.create_value(&ValueSpec {
            genre: Genre::User,
            command_class: self.class_id(),
            instance,
            index: VALUE_INDEX_SWITCH,
            kind: ValueKind::Bool,
            label: "Toggle Switch",
            units: "",
            read_only: false,
        });
    }

    fn request_state(&self, node: &Node, instance: u8, flags: RequestFlags) -> bool {
        if flags.contains(RequestFlags::DYNAMIC) {
            self.request_value(node, instance);
            return true;
        }
        false
    }

    fn request_value(&self, node: &Node, _instance: u8) {
        send_command(node, COMMAND_CLASS_TOGGLE_BINARY, TOGGLE_BINARY_GET, &[]);
    }

    fn handle_msg(&self, node: &Node, payload: &[u8], instance: u8) -> bool {
        let Ok((sub_command, data)) = split_app_payload(payload) else {
            warn!("ToggleBinary[node {}]: empty payload", node.node_id());
            return false;
        };

        if sub_command == TOGGLE_BINARY_REPORT {
            let Some(&state) = data.first() else {
                warn!(
                    "ToggleBinary[node {}]: report missing state byte",
                    node.node_id()
                );
                return false;
            };
            debug!(
                "ToggleBinary[node {}]: received report, state={}",
                node.node_id(),
                if state != 0 { "on" } else { "off" }
            );
            return node.update_from_report(
                self.class_id(),
                instance,
                VALUE_INDEX_SWITCH,
                Datum::Bool(state != 0),
            );
        }

        false
    }

    fn set_value(&self, node: &Node, _write: &ValueWrite) -> bool {
        debug!("ToggleBinary[node {}]: toggling switch state", node.node_id());
        send_command(node, COMMAND_CLASS_TOGGLE_BINARY, TOGGLE_BINARY_SET, &[]);
        true
    }
}
