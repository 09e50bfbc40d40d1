//! Typed device values.
//!
//! A [`Value`] caches the last known datum for one capability slot on one
//! node: a dimmer level, a switch state. Values are typed over a closed set
//! of payload kinds ([`Datum`]) with a single metadata record around them,
//! so the hot paths (report decode, write-through) match on a tag instead
//! of going through a trait object.
//!
//! A freshly created value is *unset*: nothing has been heard from the
//! device and nothing was loaded from a persisted record. Unset is a
//! distinct, observable state, not a default datum. The first successful
//! update moves the value to set, and it never moves back for the lifetime
//! of the value.

use serde::{Deserialize, Serialize};

use crate::persist::PersistedValue;

// ============================================================================
// Identity
// ============================================================================

/// Visibility classification of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    /// Managed by the stack itself; not normally shown to users.
    System,
    /// User-facing device state.
    User,
    /// Device configuration parameters.
    Config,
}

/// Composite identity of a value. Immutable once assigned; equality is
/// structural over all six fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueId {
    /// Network identifier.
    pub home_id: u32,
    /// Node address within the network.
    pub node_id: u8,
    /// Visibility classification.
    pub genre: Genre,
    /// Capability the value belongs to.
    pub command_class: u8,
    /// 1-based endpoint instance on the node.
    pub instance: u8,
    /// Disambiguates multiple values within one class/instance.
    pub index: u8,
}

// ============================================================================
// Payload
// ============================================================================

/// Payload kind of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Boolean state.
    Bool,
    /// Single byte (levels, counts).
    Byte,
}

/// A typed datum, one variant per [`ValueKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datum {
    /// Boolean state.
    Bool(bool),
    /// Single byte.
    Byte(u8),
}

impl Datum {
    /// The kind tag of this datum.
    pub fn kind(&self) -> ValueKind {
        match self {
            Datum::Bool(_) => ValueKind::Bool,
            Datum::Byte(_) => ValueKind::Byte,
        }
    }

    /// Canonical string form, as written to persisted records.
    pub fn canonical_string(&self) -> String {
        match self {
            Datum::Bool(true) => "True".to_string(),
            Datum::Bool(false) => "False".to_string(),
            Datum::Byte(b) => b.to_string(),
        }
    }

    /// Parse the canonical string form for a given kind.
    ///
    /// Boolean parsing is case-insensitive (`"true"`, `"TRUE"`, `"True"`
    /// all parse); bytes are decimal. Returns `None` for anything else.
    pub fn parse(kind: ValueKind, text: &str) -> Option<Datum> {
        match kind {
            ValueKind::Bool => {
                if text.eq_ignore_ascii_case("true") {
                    Some(Datum::Bool(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Some(Datum::Bool(false))
                } else {
                    None
                }
            }
            ValueKind::Byte => text.parse::<u8>().ok().map(Datum::Byte),
        }
    }
}

// ============================================================================
// Value
// ============================================================================

/// Creation request for a value, supplied by a command class's
/// `create_vars`. The node fills in the network/node identity.
#[derive(Debug, Clone)]
pub struct ValueSpec {
    /// Visibility classification.
    pub genre: Genre,
    /// Owning command class.
    pub command_class: u8,
    /// 1-based endpoint instance.
    pub instance: u8,
    /// Index within the class/instance.
    pub index: u8,
    /// Payload kind.
    pub kind: ValueKind,
    /// Display name.
    pub label: &'static str,
    /// Display units (may be empty).
    pub units: &'static str,
    /// Reject application writes if true.
    pub read_only: bool,
}

/// A typed, cached device value.
#[derive(Debug, Clone)]
pub struct Value {
    id: ValueId,
    kind: ValueKind,
    label: String,
    units: String,
    read_only: bool,
    datum: Option<Datum>,
}

impl Value {
    /// Create an unset value from a spec.
    pub fn new(home_id: u32, node_id: u8, spec: &ValueSpec) -> Self {
        Value {
            id: ValueId {
                home_id,
                node_id,
                genre: spec.genre,
                command_class: spec.command_class,
                instance: spec.instance,
                index: spec.index,
            },
            kind: spec.kind,
            label: spec.label.to_string(),
            units: spec.units.to_string(),
            read_only: spec.read_only,
            datum: None,
        }
    }

    /// Identity of this value.
    pub fn id(&self) -> ValueId {
        self.id
    }

    /// Payload kind.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Display name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Display units.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Whether application writes are rejected.
    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// Whether a datum has ever been received or loaded.
    pub fn is_set(&self) -> bool {
        self.datum.is_some()
    }

    /// The cached datum, if any has arrived.
    pub fn datum(&self) -> Option<Datum> {
        self.datum
    }

    /// Application-initiated write to the local cache.
    ///
    /// The cache is updated optimistically, before any device confirmation.
    /// Returns false without mutating if the value is read-only or the
    /// datum kind does not match; write-through to the device is the
    /// node's job once this accepts.
    pub fn set(&mut self, datum: Datum) -> bool {
        if self.read_only || datum.kind() != self.kind {
            return false;
        }
        self.datum = Some(datum);
        true
    }

    /// Device-initiated update from a decoded report.
    ///
    /// Overwrites the cache regardless of the read-only policy (the policy
    /// gates application writes, not the device's own state). Returns false
    /// only on a kind mismatch.
    pub fn on_value_changed(&mut self, datum: Datum) -> bool {
        if datum.kind() != self.kind {
            return false;
        }
        self.datum = Some(datum);
        true
    }

    /// Parse a canonical string and apply it as an application write.
    ///
    /// Unparsable input returns false and leaves the cache untouched.
    pub fn set_from_string(&mut self, text: &str) -> bool {
        match Datum::parse(self.kind, text) {
            Some(datum) => self.set(datum),
            None => false,
        }
    }

    /// Serialize to a persisted record.
    ///
    /// An unset value writes the empty marker, never a typed default, so a
    /// round trip cannot fabricate a datum the device never reported.
    pub fn save(&self) -> PersistedValue {
        PersistedValue {
            genre: self.id.genre,
            command_class: self.id.command_class,
            instance: self.id.instance,
            index: self.id.index,
            kind: self.kind,
            label: self.label.clone(),
            units: self.units.clone(),
            read_only: self.read_only,
            value: Some(match self.datum {
                Some(datum) => datum.canonical_string(),
                None => String::new(),
            }),
        }
    }

    /// Apply a persisted record.
    ///
    /// An absent or empty `value` attribute leaves the value unset. A
    /// loaded datum does not raise a change notification; it restores
    /// state, it does not report new state.
    pub fn load(&mut self, record: &PersistedValue) {
        self.label = record.label.clone();
        self.units = record.units.clone();
        match record.value.as_deref() {
            None | Some("") => {}
            Some(text) => {
                if let Some(datum) = Datum::parse(self.kind, text) {
                    self.datum = Some(datum);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byte_spec(read_only: bool) -> ValueSpec {
        ValueSpec {
            genre: Genre::User,
            command_class: 0x29,
            instance: 1,
            index: 0,
            kind: ValueKind::Byte,
            label: "Level",
            units: "",
            read_only,
        }
    }

    fn bool_spec() -> ValueSpec {
        ValueSpec {
            genre: Genre::User,
            command_class: 0x28,
            instance: 1,
            index: 0,
            kind: ValueKind::Bool,
            label: "Toggle",
            units: "",
            read_only: false,
        }
    }

    #[test]
    fn test_fresh_value_is_unset() {
        let value = Value::new(0x1234_5678, 5, &byte_spec(false));
        assert!(!value.is_set());
        assert_eq!(value.datum(), None);
        assert_eq!(value.save().value.as_deref(), Some(""));
    }

    #[test]
    fn test_set_updates_cache() {
        let mut value = Value::new(1, 5, &byte_spec(false));
        assert!(value.set(Datum::Byte(0x2A)));
        assert!(value.is_set());
        assert_eq!(value.datum(), Some(Datum::Byte(0x2A)));
    }

    #[test]
    fn test_read_only_rejects_set_but_not_report() {
        let mut value = Value::new(1, 5, &byte_spec(true));
        assert!(!value.set(Datum::Byte(1)), "read-only must reject set");
        assert!(!value.is_set());

        assert!(value.on_value_changed(Datum::Byte(9)));
        assert_eq!(value.datum(), Some(Datum::Byte(9)));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let mut value = Value::new(1, 5, &byte_spec(false));
        assert!(!value.set(Datum::Bool(true)));
        assert!(!value.on_value_changed(Datum::Bool(true)));
        assert!(!value.is_set());
    }

    #[test]
    fn test_set_from_string_case_insensitive() {
        for text in ["TRUE", "true", "True", "tRuE"] {
            let mut value = Value::new(1, 5, &bool_spec());
            assert!(value.set_from_string(text), "{text:?} must parse");
            assert_eq!(value.datum(), Some(Datum::Bool(true)));
        }

        let mut value = Value::new(1, 5, &bool_spec());
        assert!(value.set_from_string("False"));
        assert_eq!(value.datum(), Some(Datum::Bool(false)));
    }

    #[test]
    fn test_set_from_string_rejects_garbage() {
        let mut value = Value::new(1, 5, &bool_spec());
        for text in ["", "yes", "1", "truth", " true "] {
            assert!(!value.set_from_string(text), "{text:?} must not parse");
            assert!(!value.is_set());
        }
    }

    #[test]
    fn test_byte_parse() {
        assert_eq!(Datum::parse(ValueKind::Byte, "42"), Some(Datum::Byte(42)));
        assert_eq!(Datum::parse(ValueKind::Byte, "255"), Some(Datum::Byte(255)));
        assert_eq!(Datum::parse(ValueKind::Byte, "256"), None);
        assert_eq!(Datum::parse(ValueKind::Byte, "0x2A"), None);
    }

    #[test]
    fn test_persist_round_trip_preserves_state() {
        for datum in [Datum::Bool(true), Datum::Bool(false)] {
            let mut original = Value::new(1, 5, &bool_spec());
            assert!(original.set(datum));

            let record = original.save();
            let mut restored = Value::new(1, 5, &bool_spec());
            restored.load(&record);
            assert_eq!(restored.datum(), Some(datum));
            assert!(restored.is_set());
        }
    }

    #[test]
    fn test_empty_marker_round_trip_stays_unset() {
        let unset = Value::new(1, 5, &bool_spec());
        let record = unset.save();
        assert_eq!(record.value.as_deref(), Some(""));

        let mut restored = Value::new(1, 5, &bool_spec());
        restored.load(&record);
        assert!(!restored.is_set(), "empty marker must not fabricate a datum");

        // An absent attribute behaves the same as the empty marker.
        let mut absent = record;
        absent.value = None;
        let mut restored = Value::new(1, 5, &bool_spec());
        restored.load(&absent);
        assert!(!restored.is_set());
    }

    #[test]
    fn test_load_accepts_any_case() {
        let mut record = Value::new(1, 5, &bool_spec()).save();
        record.value = Some("true".to_string());
        let mut value = Value::new(1, 5, &bool_spec());
        value.load(&record);
        assert_eq!(value.datum(), Some(Datum::Bool(true)));
    }
}
