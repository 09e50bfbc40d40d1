//! Per-node value storage.
//!
//! The store maps `(command_class, instance, index)` to the node's owned
//! [`Value`]s. Command classes create their slots lazily through
//! [`ValueStore::create`] when they attach to an instance; lookups for
//! slots that were never created simply miss. The store itself carries no
//! locking; the node wraps it in a [`Guarded`](crate::sync::Guarded) so
//! creation never races with the receive-path and application-path
//! lookups.

use std::collections::HashMap;

use tracing::trace;

use crate::persist::PersistedValue;
use crate::value::{Value, ValueSpec};

/// Key of a value slot within one node.
pub type SlotKey = (u8, u8, u8);

/// All values owned by one node.
#[derive(Debug, Default)]
pub struct ValueStore {
    home_id: u32,
    node_id: u8,
    values: HashMap<SlotKey, Value>,
}

impl ValueStore {
    /// Create an empty store for a node.
    pub fn new(home_id: u32, node_id: u8) -> Self {
        ValueStore {
            home_id,
            node_id,
            values: HashMap::new(),
        }
    }

    /// Create a value slot if it does not exist yet.
    ///
    /// Idempotent: a second creation for the same slot leaves the existing
    /// value (and any datum it holds) untouched.
    pub fn create(&mut self, spec: &ValueSpec) {
        let key = (spec.command_class, spec.instance, spec.index);
        if self.values.contains_key(&key) {
            return;
        }
        trace!(
            "ValueStore[node {}]: creating {} value class=0x{:02x} instance={} index={}",
            self.node_id,
            spec.label,
            spec.command_class,
            spec.instance,
            spec.index
        );
        self.values
            .insert(key, Value::new(self.home_id, self.node_id, spec));
    }

    /// Look up a value slot.
    pub fn get(&self, command_class: u8, instance: u8, index: u8) -> Option<&Value> {
        self.values.get(&(command_class, instance, index))
    }

    /// Look up a value slot for mutation.
    pub fn get_mut(&mut self, command_class: u8, instance: u8, index: u8) -> Option<&mut Value> {
        self.values.get_mut(&(command_class, instance, index))
    }

    /// Number of value slots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no slots.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize every value, ordered by slot key so output is stable.
    pub fn save_all(&self) -> Vec<PersistedValue> {
        let mut keys: Vec<SlotKey> = self.values.keys().copied().collect();
        keys.sort_unstable();
        keys.iter().map(|key| self.values[key].save()).collect()
    }

    /// Apply persisted records to already-created slots.
    ///
    /// Records for slots that were never created are skipped; creation
    /// belongs to the command classes, not to the persisted document.
    pub fn load_all(&mut self, records: &[PersistedValue]) {
        for record in records {
            let key = (record.command_class, record.instance, record.index);
            if let Some(value) = self.values.get_mut(&key) {
                value.load(record);
            } else {
                trace!(
                    "ValueStore[node {}]: skipping persisted record for absent slot \
                     class=0x{:02x} instance={} index={}",
                    self.node_id,
                    record.command_class,
                    record.instance,
                    record.index
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Datum, Genre, ValueKind};

    fn level_spec() -> ValueSpec {
        ValueSpec {
            genre: Genre::User,
            command_class: 0x29,
            instance: 1,
            index: 0,
            kind: ValueKind::Byte,
            label: "Level",
            units: "",
            read_only: false,
        }
    }

    #[test]
    fn test_create_is_idempotent() {
        let mut store = ValueStore::new(1, 5);
        store.create(&level_spec());
        store
            .get_mut(0x29, 1, 0)
            .unwrap()
            .on_value_changed(Datum::Byte(7));

        store.create(&level_spec());
        assert_eq!(store.len(), 1, "second create must not duplicate");
        assert_eq!(
            store.get(0x29, 1, 0).unwrap().datum(),
            Some(Datum::Byte(7)),
            "second create must not reset the existing value"
        );
    }

    #[test]
    fn test_lookup_miss_for_uncreated_slot() {
        let store = ValueStore::new(1, 5);
        assert!(store.get(0x29, 1, 0).is_none());
    }

    #[test]
    fn test_save_and_load_all() {
        let mut store = ValueStore::new(1, 5);
        store.create(&level_spec());
        store
            .get_mut(0x29, 1, 0)
            .unwrap()
            .on_value_changed(Datum::Byte(200));

        let records = store.save_all();
        assert_eq!(records.len(), 1);

        let mut restored = ValueStore::new(1, 5);
        restored.create(&level_spec());
        restored.load_all(&records);
        assert_eq!(
            restored.get(0x29, 1, 0).unwrap().datum(),
            Some(Datum::Byte(200))
        );
    }

    #[test]
    fn test_load_skips_absent_slots() {
        let mut store = ValueStore::new(1, 5);
        store.create(&level_spec());
        let records = store.save_all();

        let mut other = ValueStore::new(1, 5);
        other.load_all(&records);
        assert!(other.is_empty());
    }
}
