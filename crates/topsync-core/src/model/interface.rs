// ── Interface entity ──

use serde::{Deserialize, Serialize};

use super::entity_id::ObjectId;

/// Media classification used by the inventory service.
///
/// Serialized with the service's own type identifiers so the REST layer
/// can pass values through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[non_exhaustive]
pub enum InterfaceType {
    /// SVIs, loopbacks, tunnels — anything with no physical media.
    #[serde(rename = "virtual")]
    #[strum(serialize = "virtual")]
    Virtual,
    #[serde(rename = "100base-tx")]
    #[strum(serialize = "100base-tx")]
    FastEthernet,
    #[serde(rename = "1000base-t")]
    #[strum(serialize = "1000base-t")]
    GigabitEthernet,
    #[serde(rename = "10gbase-t")]
    #[strum(serialize = "10gbase-t")]
    TenGigabitEthernet,
    #[serde(rename = "25gbase-x-sfp28")]
    #[strum(serialize = "25gbase-x-sfp28")]
    TwentyFiveGigSfp28,
    /// Hardware reported as unknown or not present.
    #[serde(rename = "other")]
    #[strum(serialize = "other")]
    Other,
}

/// A device interface, keyed by `(device, name)`.
///
/// Created on first sighting and updated in place; never deleted — a
/// device only reports the interfaces it currently has, and absence is
/// not treated as evidence of removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub id: ObjectId,
    pub device: ObjectId,
    pub name: String,
    #[serde(rename = "type")]
    pub if_type: InterfaceType,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
}
