// ── IPAM entities: addresses, VLANs, prefixes ──

use serde::{Deserialize, Serialize};

use super::entity_id::ObjectId;

/// Address lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum IpStatus {
    Active,
    Reserved,
    Deprecated,
}

/// The `(object-type, object-id)` pair an address is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedObject {
    pub object_type: String,
    pub object_id: ObjectId,
}

impl AssignedObject {
    /// Binding to a device interface — the only kind the engine creates.
    pub fn interface(id: ObjectId) -> Self {
        Self {
            object_type: "dcim.interface".to_owned(),
            object_id: id,
        }
    }
}

/// An IP address, keyed by its CIDR string.
///
/// Assign-once: once `assigned_object` is populated the engine never
/// rebinds the address to a different object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddress {
    pub id: ObjectId,
    /// CIDR notation, e.g. `10.0.0.2/24`.
    pub address: String,
    pub status: IpStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_object: Option<AssignedObject>,
}

impl IpAddress {
    pub fn is_assigned(&self) -> bool {
        self.assigned_object.is_some()
    }
}

/// A VLAN, keyed by its numeric id. Device facts are authoritative for
/// the name; VLANs are never deleted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: ObjectId,
    pub vid: u16,
    pub name: String,
}

/// A subnet record, read-only for the engine. Used solely to derive the
/// owning site for a newly discovered device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefix {
    pub id: ObjectId,
    /// CIDR notation, e.g. `10.0.0.0/24`.
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<ObjectId>,
}
