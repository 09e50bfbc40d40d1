//! Command class handlers.
//!
//! A command class owns the wire rules for one device capability: which
//! sub-commands it speaks, how their parameters are laid out, and which
//! values it caches. Every class follows the same shape — probe the device,
//! decode its reports into the value store, write application changes back
//! through the transport — so the family is one trait with small
//! implementations, not a hierarchy. Framing and transmit options are
//! shared through [`send_command`]; no handler builds frame bytes itself.

use bitflags::bitflags;
use tracing::{trace, warn};
use zmesh_wire::FrameBuilder;

use crate::node::Node;
use crate::value::Datum;

pub mod toggle_binary;
pub mod toggle_level;

pub use toggle_binary::ToggleBinary;
pub use toggle_level::{Direction, ToggleLevel};

bitflags! {
    /// Which kinds of device state a refresh should query.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RequestFlags: u32 {
        /// Fixed capabilities that never change after inclusion.
        const STATIC = 0x0000_0001;
        /// State that survives for the session.
        const SESSION = 0x0000_0002;
        /// Frequently-changing state (levels, switch positions).
        const DYNAMIC = 0x0000_0004;
    }
}

/// An application-initiated write request routed to a handler.
#[derive(Debug, Clone, Copy)]
pub struct ValueWrite {
    /// Target endpoint instance.
    pub instance: u8,
    /// Target value index within the class/instance.
    pub index: u8,
    /// Datum already accepted into the local cache.
    pub datum: Datum,
}

/// One device capability's protocol handler.
///
/// Handlers are stateless: everything they cache lives in the owning
/// node's value store, everything they send goes through the node's
/// transport. None of these operations block; outbound traffic is
/// fire-and-forget and confirmation, if any, arrives later as a report on
/// the receive path.
pub trait CommandClass: Send + Sync {
    /// Capability identifier, fixed per implementation.
    fn class_id(&self) -> u8;

    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Create this class's value slots for an endpoint instance.
    ///
    /// Idempotent per instance, and required before any report or write
    /// targeting that instance can land; without it they are logged
    /// no-ops.
    fn create_vars(&self, _node: &Node, _instance: u8) {}

    /// Issue state queries matching the requested flags.
    ///
    /// Returns true if a request was enqueued. The base behavior queries
    /// nothing.
    fn request_state(&self, _node: &Node, _instance: u8, _flags: RequestFlags) -> bool {
        false
    }

    /// Enqueue this class's "elicit a report" probe.
    fn request_value(&self, _node: &Node, _instance: u8) {}

    /// Decode one inbound application payload (`[sub_command, data...]`).
    ///
    /// Returns true iff the sub-command was recognized and handled; false
    /// means "not mine" and the caller may offer the payload elsewhere or
    /// drop it.
    fn handle_msg(&self, node: &Node, payload: &[u8], instance: u8) -> bool;

    /// Write-through to the device for a cache-accepted value write.
    ///
    /// The read-only policy has already been enforced by the value layer;
    /// implementations only encode and enqueue. Returns false if this
    /// class does not support writes.
    fn set_value(&self, _node: &Node, _write: &ValueWrite) -> bool {
        false
    }
}

/// Encode a class command frame and hand it to the node's transport.
///
/// The single framing path for all handler traffic: node addressing,
/// payload length, and the fixed ACK | AUTO_ROUTE transmit options are
/// applied here.
pub(crate) fn send_command(node: &Node, class_id: u8, sub_command: u8, params: &[u8]) {
    match FrameBuilder::new(node.node_id(), class_id, sub_command)
        .params(params)
        .encode()
    {
        Ok(frame) => {
            trace!(
                "CommandClass[node {}]: sending frame {}",
                node.node_id(),
                hex::encode(&frame)
            );
            node.transport().send(&frame);
        }
        Err(err) => {
            warn!(
                "CommandClass[node {}]: dropping sub-command 0x{:02x} for class 0x{:02x}: {}",
                node.node_id(),
                sub_command,
                class_id,
                err
            );
        }
    }
}
