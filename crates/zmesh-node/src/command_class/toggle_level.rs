//! Toggle-multilevel command class (0x29).
//!
//! The device holds a byte level that a Set toggles between off and its
//! last level, and that level-change commands ramp up or down. The device
//! reports its level asynchronously; the cached "Level" value at index 0
//! tracks the last report.

use tracing::{debug, warn};
use zmesh_wire::{split_app_payload, COMMAND_CLASS_TOGGLE_LEVEL};

use crate::command_class::{send_command, CommandClass, RequestFlags, ValueWrite};
use crate::node::Node;
use crate::value::{Datum, Genre, ValueKind, ValueSpec};

/// Toggle the level state.
pub const TOGGLE_LEVEL_SET: u8 = 0x01;
/// Request a level report.
pub const TOGGLE_LEVEL_GET: u8 = 0x02;
/// Level report from the device.
pub const TOGGLE_LEVEL_REPORT: u8 = 0x03;
/// Begin ramping the level.
pub const TOGGLE_LEVEL_START_LEVEL_CHANGE: u8 = 0x04;
/// Stop ramping the level.
pub const TOGGLE_LEVEL_STOP_LEVEL_CHANGE: u8 = 0x05;

/// Index of the cached "Level" value.
pub const VALUE_INDEX_LEVEL: u8 = 0;

// StartLevelChange parameter byte layout. Remaining bits are reserved
// and must be zero.
const PARAM_DIRECTION_DOWN: u8 = 0x01;
const PARAM_IGNORE_START_LEVEL: u8 = 0x20;
const PARAM_ROLLOVER: u8 = 0x80;

/// Ramp direction for a level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Increase the level.
    Up,
    /// Decrease the level.
    Down,
}

/// Handler for the toggle-multilevel capability.
#[derive(Debug, Default)]
pub struct ToggleLevel;

impl ToggleLevel {
    /// Encode the StartLevelChange parameter byte.
    fn level_change_param(direction: Direction, ignore_start_level: bool, rollover: bool) -> u8 {
        let mut param = match direction {
            Direction::Up => 0x00,
            Direction::Down => PARAM_DIRECTION_DOWN,
        };
        if ignore_start_level {
            param |= PARAM_IGNORE_START_LEVEL;
        }
        if rollover {
            param |= PARAM_ROLLOVER;
        }
        param
    }

    /// Start ramping the node's level.
    ///
    /// Fire-and-forget; the resulting level arrives later as a report.
    pub fn start_level_change(
        node: &Node,
        direction: Direction,
        ignore_start_level: bool,
        rollover: bool,
    ) {
        debug!(
            "ToggleLevel[node {}]: starting level change, direction={:?} \
             ignore_start_level={} rollover={}",
            node.node_id(),
            direction,
            ignore_start_level,
            rollover
        );
        let param = Self::level_change_param(direction, ignore_start_level, rollover);
        send_command(
            node,
            COMMAND_CLASS_TOGGLE_LEVEL,
            TOGGLE_LEVEL_START_LEVEL_CHANGE,
            &[param],
        );
    }

    /// Stop a running level change.
    pub fn stop_level_change(node: &Node) {
        debug!("ToggleLevel[node {}]: stopping level change", node.node_id());
        send_command(
            node,
            COMMAND_CLASS_TOGGLE_LEVEL,
            TOGGLE_LEVEL_STOP_LEVEL_CHANGE,
            &[],
        );
    }
}

impl CommandClass for ToggleLevel {
    fn class_id(&self) -> u8 {
        COMMAND_CLASS_TOGGLE_LEVEL
    }

    fn name(&self) -> &'static str {
        "ToggleLevel"
    }

    fn create_vars(&self, node: &Node, instance: u8) {
        node.create_value(&ValueSpec {
            genre: Genre::User,
            command_class: self.class_id(),
            instance,
            index: VALUE_INDEX_LEVEL,
            kind: ValueKind::Byte,
            label: "Level",
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
        // A parameterless start-level-change makes the device answer with
        // a level report without moving the level; it doubles as the
        // state probe for this class.
        send_command(
            node,
            COMMAND_CLASS_TOGGLE_LEVEL,
            TOGGLE_LEVEL_START_LEVEL_CHANGE,
            &[],
        );
    }

    fn handle_msg(&self, node: &Node, payload: &[u8], instance: u8) -> bool {
        let Ok((sub_command, data)) = split_app_payload(payload) else {
            warn!("ToggleLevel[node {}]: empty payload", node.node_id());
            return false;
        };

        if sub_command == TOGGLE_LEVEL_REPORT {
            let Some(&level) = data.first() else {
                warn!(
                    "ToggleLevel[node {}]: report missing level byte",
                    node.node_id()
                );
                return false;
            };
            debug!(
                "ToggleLevel[node {}]: received report, level={}",
                node.node_id(),
                level
            );
            return node.update_from_report(
                self.class_id(),
                instance,
                VALUE_INDEX_LEVEL,
                Datum::Byte(level),
            );
        }

        false
    }

    fn set_value(&self, node: &Node, _write: &ValueWrite) -> bool {
        // Set carries no parameters; it toggles between off and the last
        // level. The requested datum only updated the local cache.
        debug!("ToggleLevel[node {}]: toggling level state", node.node_id());
        send_command(node, COMMAND_CLASS_TOGGLE_LEVEL, TOGGLE_LEVEL_SET, &[]);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_change_param_bits() {
        assert_eq!(
            ToggleLevel::level_change_param(Direction::Down, true, false),
            0x21
        );
        assert_eq!(
            ToggleLevel::level_change_param(Direction::Up, false, false),
            0x00
        );
        assert_eq!(
            ToggleLevel::level_change_param(Direction::Up, false, true),
            0x80
        );
        assert_eq!(
            ToggleLevel::level_change_param(Direction::Down, true, true),
            0xA1
        );
    }
}
