//! Protocol constants
//!
//! Command class identifiers, transmit-option flags, and the fixed offsets
//! of the outbound frame layout.

use bitflags::bitflags;

// ============================================================================
// Command Class Identifiers
// ============================================================================

/// Toggle-binary switch capability (boolean state, toggled by Set).
pub const COMMAND_CLASS_TOGGLE_BINARY: u8 = 0x28;
/// Toggle-multilevel capability (byte level, Set toggles, level ramps).
pub const COMMAND_CLASS_TOGGLE_LEVEL: u8 = 0x29;

// ============================================================================
// Transmit Options
// ============================================================================

bitflags! {
    /// Delivery flags carried in the last byte of every outbound frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TransmitOptions: u8 {
        /// Request a link-layer acknowledgement from the destination.
        const ACK = 0x01;
        /// Let the transport route through intermediate nodes as needed.
        const AUTO_ROUTE = 0x04;
    }
}

impl TransmitOptions {
    /// The fixed option set used for all command-class traffic.
    pub const DEFAULT: TransmitOptions = TransmitOptions::ACK.union(TransmitOptions::AUTO_ROUTE);
}

// ============================================================================
// Frame Layout
// ============================================================================

/// Offset of the destination node id.
pub const FRAME_OFFSET_NODE_ID: usize = 0;
/// Offset of the payload-length byte.
pub const FRAME_OFFSET_LENGTH: usize = 1;
/// Offset of the command class identifier.
pub const FRAME_OFFSET_COMMAND_CLASS: usize = 2;
/// Offset of the sub-command code.
pub const FRAME_OFFSET_SUB_COMMAND: usize = 3;
/// Offset of the first sub-command parameter, if any.
pub const FRAME_OFFSET_PARAMS: usize = 4;

/// Bytes of a frame that are not counted by the payload-length byte:
/// node id, the length byte itself, and the trailing transmit options.
pub const FRAME_OVERHEAD: usize = 3;

/// Smallest valid frame: a parameterless sub-command.
pub const MIN_FRAME_SIZE: usize = FRAME_OVERHEAD + 2;

/// Largest parameter run a single frame may carry. The length byte counts
/// command class + sub-command + params, so params are capped two short
/// of the byte's range.
pub const MAX_FRAME_PARAMS: usize = u8::MAX as usize - 2;
