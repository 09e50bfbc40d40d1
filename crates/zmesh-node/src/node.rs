//! Per-node dispatch and value synchronization.
//!
//! A [`Node`] owns the command classes attached to it, the guarded store of
//! every value they create, and the handle to the outbound transport. Two
//! kinds of thread meet here: the transport's receive thread delivering
//! inbound payloads through [`Node::handle_application_command`], and
//! application threads reading values and issuing writes. All read-modify-
//! write of a value (datum together with its set flag) happens inside one
//! critical section on the store, so a reader never observes a torn
//! update; observers are notified after the lock is released.
//!
//! There is no ordering guarantee between an application write and a
//! logically stale report arriving around the same time. The last writer
//! by arrival wins, matching the device's own eventual consistency.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::command_class::{CommandClass, RequestFlags, ValueWrite};
use crate::persist::PersistedValue;
use crate::store::ValueStore;
use crate::sync::Guarded;
use crate::transport::Transport;
use crate::value::{Datum, Value, ValueId, ValueSpec};

// ============================================================================
// Change Notification
// ============================================================================

/// A successful value change, local or device-initiated.
#[derive(Debug, Clone, Copy)]
pub struct ValueEvent {
    /// Identity of the changed value.
    pub id: ValueId,
    /// The new datum.
    pub datum: Datum,
}

/// Observer of value changes on a node.
///
/// Called exactly once per successful change, outside the store lock, so
/// an observer may read the node back without deadlocking.
pub trait ValueObserver: Send + Sync {
    /// A value on the node changed.
    fn value_changed(&self, event: &ValueEvent);
}

// ============================================================================
// Node
// ============================================================================

/// One addressable device on the mesh.
///
/// The node owns its values; they are created by command classes via
/// `create_vars` and released together when the node is dropped.
pub struct Node {
    home_id: u32,
    node_id: u8,
    transport: Arc<dyn Transport>,
    classes: BTreeMap<u8, Arc<dyn CommandClass>>,
    values: Guarded<ValueStore>,
    observers: Guarded<Vec<Arc<dyn ValueObserver>>>,
}

impl Node {
    /// Create a node with no command classes attached.
    pub fn new(home_id: u32, node_id: u8, transport: Arc<dyn Transport>) -> Self {
        Node {
            home_id,
            node_id,
            transport,
            classes: BTreeMap::new(),
            values: Guarded::new(ValueStore::new(home_id, node_id)),
            observers: Guarded::new(Vec::new()),
        }
    }

    /// Network identifier.
    pub fn home_id(&self) -> u32 {
        self.home_id
    }

    /// Node address.
    pub fn node_id(&self) -> u8 {
        self.node_id
    }

    /// The outbound transport handle.
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Attach a command class and create its values for instance 1.
    ///
    /// Attaching the same class id again replaces the handler but leaves
    /// existing values untouched (`create_vars` is idempotent per slot).
    pub fn add_command_class(&mut self, class: Arc<dyn CommandClass>) {
        class.create_vars(self, 1);
        self.classes.insert(class.class_id(), class);
    }

    /// Create an attached class's values for an additional endpoint
    /// instance. Returns false if the class is not attached.
    pub fn create_instance(&self, class_id: u8, instance: u8) -> bool {
        match self.classes.get(&class_id) {
            Some(class) => {
                class.create_vars(self, instance);
                true
            }
            None => {
                warn!(
                    "Node[{}]: cannot create instance {} for unattached class 0x{:02x}",
                    self.node_id, instance, class_id
                );
                false
            }
        }
    }

    /// Register a change observer.
    pub fn add_observer(&self, observer: Arc<dyn ValueObserver>) {
        self.observers.lock().push(observer);
    }

    /// Create a value slot on behalf of a command class.
    pub fn create_value(&self, spec: &ValueSpec) {
        self.values.lock().create(spec);
    }

    /// Snapshot of a value, if its slot exists.
    pub fn value(&self, class_id: u8, instance: u8, index: u8) -> Option<Value> {
        self.values.lock().get(class_id, instance, index).cloned()
    }

    // ------------------------------------------------------------------------
    // Receive path
    // ------------------------------------------------------------------------

    /// Route an inbound application payload to the matching class handler.
    ///
    /// Returns true iff a handler recognized and handled the payload;
    /// false means the caller may try elsewhere or drop it.
    pub fn handle_application_command(&self, class_id: u8, payload: &[u8], instance: u8) -> bool {
        match self.classes.get(&class_id) {
            Some(class) => class.handle_msg(self, payload, instance),
            None => {
                debug!(
                    "Node[{}]: no handler for command class 0x{:02x}",
                    self.node_id, class_id
                );
                false
            }
        }
    }

    /// Apply a device-initiated update decoded from a report.
    ///
    /// A report for a slot that was never created is logged and dropped;
    /// handlers surface that as an unhandled payload.
    pub fn update_from_report(
        &self,
        class_id: u8,
        instance: u8,
        index: u8,
        datum: Datum,
    ) -> bool {
        let event = {
            let mut store = self.values.lock();
            let Some(value) = store.get_mut(class_id, instance, index) else {
                warn!(
                    "Node[{}]: report for missing value class=0x{:02x} instance={} index={}",
                    self.node_id, class_id, instance, index
                );
                return false;
            };
            if !value.on_value_changed(datum) {
                warn!(
                    "Node[{}]: report datum {:?} does not match value kind {:?}",
                    self.node_id,
                    datum,
                    value.kind()
                );
                return false;
            }
            ValueEvent {
                id: value.id(),
                datum,
            }
        };
        self.notify(&event);
        true
    }

    // ------------------------------------------------------------------------
    // Application path
    // ------------------------------------------------------------------------

    /// Application write: update the cache optimistically, notify, then
    /// write through to the device.
    ///
    /// Returns false without enqueuing anything if the slot is missing,
    /// the value is read-only, or the datum kind does not match. The true
    /// result reports only that the write-through was enqueued; the
    /// device's answer, if any, arrives later as a report.
    pub fn set_value(&self, class_id: u8, instance: u8, index: u8, datum: Datum) -> bool {
        let event = {
            let mut store = self.values.lock();
            let Some(value) = store.get_mut(class_id, instance, index) else {
                warn!(
                    "Node[{}]: set for missing value class=0x{:02x} instance={} index={}",
                    self.node_id, class_id, instance, index
                );
                return false;
            };
            if !value.set(datum) {
                debug!(
                    "Node[{}]: set rejected for class=0x{:02x} instance={} index={} \
                     (read-only or kind mismatch)",
                    self.node_id, class_id, instance, index
                );
                return false;
            }
            ValueEvent {
                id: value.id(),
                datum,
            }
        };
        self.notify(&event);

        let Some(class) = self.classes.get(&class_id) else {
            warn!(
                "Node[{}]: no handler to write through class 0x{:02x}",
                self.node_id, class_id
            );
            return false;
        };
        class.set_value(
            self,
            &ValueWrite {
                instance,
                index,
                datum,
            },
        )
    }

    /// Parse a canonical string and apply it as a value write.
    ///
    /// Unparsable input returns false with no mutation; otherwise behaves
    /// exactly like [`Node::set_value`].
    pub fn set_value_from_string(
        &self,
        class_id: u8,
        instance: u8,
        index: u8,
        text: &str,
    ) -> bool {
        let kind = {
            let store = self.values.lock();
            match store.get(class_id, instance, index) {
                Some(value) => value.kind(),
                None => {
                    warn!(
                        "Node[{}]: set for missing value class=0x{:02x} instance={} index={}",
                        self.node_id, class_id, instance, index
                    );
                    return false;
                }
            }
        };
        match Datum::parse(kind, text) {
            Some(datum) => self.set_value(class_id, instance, index, datum),
            None => false,
        }
    }

    /// Ask one class to refresh device state matching the flags.
    pub fn request_state(&self, class_id: u8, instance: u8, flags: RequestFlags) -> bool {
        match self.classes.get(&class_id) {
            Some(class) => class.request_state(self, instance, flags),
            None => false,
        }
    }

    /// Ask every attached class to refresh device state matching the
    /// flags. Returns true if any class enqueued a request.
    pub fn request_all_state(&self, instance: u8, flags: RequestFlags) -> bool {
        let mut requested = false;
        for class in self.classes.values() {
            requested |= class.request_state(self, instance, flags);
        }
        requested
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Serialize every value this node owns.
    pub fn save_values(&self) -> Vec<PersistedValue> {
        self.values.lock().save_all()
    }

    /// Restore persisted records into already-created slots. Loading does
    /// not raise change notifications.
    pub fn load_values(&self, records: &[PersistedValue]) {
        self.values.lock().load_all(records);
    }

    fn notify(&self, event: &ValueEvent) {
        let observers: Vec<Arc<dyn ValueObserver>> = self.observers.lock().clone();
        for observer in observers {
            observer.value_changed(event);
        }
    }
}
