// ── Hardware inventory entities ──
//
// Discrete hardware (fans, supervisors, power supplies) is stored as
// InventoryItem, keyed by serial within a device. Pluggable optics get
// the richer bay/type/module triple so ports and optics stay linked.

use serde::{Deserialize, Serialize};

use super::entity_id::ObjectId;

/// A discrete hardware component observed in a device.
///
/// The observed serial set is authoritative: items whose serial is no
/// longer reported by the device are deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ObjectId,
    pub device: ObjectId,
    pub name: String,
    pub serial: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub part_id: String,
}

/// A physical bay a module can be seated in, keyed by `(device, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleBay {
    pub id: ObjectId,
    pub device: ObjectId,
    pub name: String,
}

/// Hardware model of a pluggable module, keyed by model string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleType {
    pub id: ObjectId,
    pub model: String,
    pub manufacturer: String,
}

/// A seated module, keyed by `(device, bay)`. Serial and type are
/// updated in place when the observed part changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ObjectId,
    pub device: ObjectId,
    pub module_bay: ObjectId,
    pub module_type: ObjectId,
    pub serial: String,
}
