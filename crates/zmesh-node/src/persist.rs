//! Persisted value records.
//!
//! One record per value, carrying its identity within the node, its display
//! metadata, and a `value` attribute holding the canonical string form of
//! the datum. An empty or absent attribute denotes "unset"; the document
//! format around these records (where the file lives, how nodes are
//! grouped) is the configuration layer's concern, not this crate's.

use serde::{Deserialize, Serialize};

use crate::value::{Genre, ValueKind};

/// Serialized form of one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedValue {
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
    pub label: String,
    /// Display units.
    pub units: String,
    /// Whether application writes are rejected.
    pub read_only: bool,
    /// Canonical string form of the datum; empty or absent means unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}
