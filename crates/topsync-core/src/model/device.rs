// ── Device entity ──

use serde::{Deserialize, Serialize};

use super::entity_id::ObjectId;

/// Device lifecycle status as stored by the inventory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum DeviceStatus {
    Active,
    Planned,
    Offline,
    Decommissioning,
}

/// A network device, keyed by its unique name.
///
/// Created on first sighting, updated on every subsequent reconciliation,
/// never deleted by the engine. `serial` is intentionally empty for
/// stacked devices — a stack has no single chassis serial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: ObjectId,
    pub name: String,
    pub device_type: ObjectId,
    pub platform: Option<ObjectId>,
    pub role: Option<ObjectId>,
    pub serial: String,
    pub site: ObjectId,
    pub status: DeviceStatus,
    /// Primary management address, set once an address is actually bound
    /// to one of the device's interfaces.
    pub primary_ip4: Option<ObjectId>,
    /// Free-form operator-extensible attributes. The engine only writes
    /// the `os` field (name + version of the running software).
    pub custom_fields: CustomFields,
}

/// Custom attributes carried on a device record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
}

impl Device {
    pub fn is_active(&self) -> bool {
        matches!(self.status, DeviceStatus::Active)
    }
}
