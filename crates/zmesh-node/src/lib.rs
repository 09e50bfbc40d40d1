//! # zmesh-node
//!
//! Command-class dispatch and value synchronization for zmesh nodes.
//!
//! This crate sits between the binary wire protocol ([`zmesh_wire`]) and an
//! in-process model of device state. Each device capability has a
//! [`CommandClass`] handler owning its wire rules; each handler caches
//! state in typed, persisted, observable [`Value`]s owned by the
//! [`Node`]. Inbound payloads arrive on the transport's receive thread
//! while application threads read and write the same values; the shared
//! state is serialized by [`sync::Guarded`].
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use zmesh_node::command_class::{RequestFlags, ToggleLevel};
//! use zmesh_node::transport::FrameRecorder;
//! use zmesh_node::Node;
//!
//! let transport = Arc::new(FrameRecorder::new());
//! let mut node = Node::new(0x00C0_FFEE, 12, transport);
//! node.add_command_class(Arc::new(ToggleLevel));
//!
//! // Probe the device; its level arrives later as a report.
//! node.request_all_state(1, RequestFlags::DYNAMIC);
//! ```

pub mod command_class;
pub mod node;
pub mod persist;
pub mod store;
pub mod sync;
pub mod transport;
pub mod value;

pub use command_class::{CommandClass, RequestFlags, ValueWrite};
pub use node::{Node, ValueEvent, ValueObserver};
pub use persist::PersistedValue;
pub use store::ValueStore;
pub use transport::Transport;
pub use value::{Datum, Genre, Value, ValueId, ValueKind, ValueSpec};
