// ── Fact model ──
//
// The typed snapshot of one device's observed state, as produced by a
// Collector. Field names follow the command output they are parsed from
// (show version / show vlan / show ip interface / show cdp neighbors
// detail / show inventory / show module / show switch).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identity and software-version block of a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFacts {
    pub hostname: String,
    /// OS name, e.g. `IOS-XE`.
    pub os: String,
    /// OS version string, e.g. `17.9.4a`.
    pub version: String,
    /// Chassis serial. Ignored for stacked devices.
    pub chassis_sn: String,
    /// Platform family, e.g. `c9300`.
    pub platform: String,
    /// Chassis model, e.g. `C9300-48P`.
    pub chassis: String,
}

/// One entry of the device's interface table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceFacts {
    /// Vendor hardware descriptor, e.g. `10/100/1000BaseTX`.
    #[serde(default)]
    pub hardware_type: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub mtu: Option<u32>,
    /// Addresses configured on the interface, CIDR notation.
    #[serde(default)]
    pub ipv4: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// One discovered neighbor, from the link-layer discovery table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborFacts {
    /// Advertised neighbor identity (hostname).
    pub device_id: String,
    /// Advertised capability string, e.g. `Switch IGMP`.
    #[serde(default)]
    pub capabilities: String,
    /// Advertised platform, e.g. `cisco WS-C3750G-24TS`.
    #[serde(default)]
    pub platform: String,
    /// Advertised software version string.
    #[serde(default)]
    pub software_version: String,
    /// Interface on *this* device the neighbor was seen on.
    pub local_interface: String,
    /// Port identifier on the neighbor's side.
    pub port_id: String,
    /// Advertised management addresses, in advertisement order.
    #[serde(default)]
    pub management_addresses: Vec<String>,
    /// Native VLAN advertised on the link, if any.
    #[serde(default)]
    pub native_vlan: Option<u16>,
}

/// One module entry of a hardware report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Orderable part identifier, e.g. `GLC-SX-MMD`.
    #[serde(default)]
    pub part_id: String,
    pub serial: String,
}

/// A chassis slot and the modules seated in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEntry {
    pub slot: String,
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

/// Hardware report, in one of the two shapes devices emit.
///
/// The collector resolves the shape once per device from the OS family;
/// the inventory reconciler dispatches on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum HardwareReport {
    /// Slot → route-processor → module tree.
    RouteProcessor { slots: Vec<SlotEntry> },
    /// Flat list of named modules.
    FlatModule { modules: Vec<ModuleEntry> },
}

/// One member of a stacked chassis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackMember {
    pub slot: u16,
    pub serial: String,
    #[serde(default)]
    pub model: String,
}

/// Stack membership, from the stack query. Absent entirely when the
/// device does not support the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFacts {
    pub members: Vec<StackMember>,
}

/// The complete observed state of one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFacts {
    pub version: VersionFacts,
    /// VLAN id → name.
    #[serde(default)]
    pub vlans: BTreeMap<u16, String>,
    /// Interface name → facts.
    #[serde(default)]
    pub interfaces: BTreeMap<String, InterfaceFacts>,
    #[serde(default)]
    pub neighbors: Vec<NeighborFacts>,
    #[serde(default)]
    pub inventory: Option<HardwareReport>,
    /// `None` when the stack query is unsupported — treated as not
    /// stacked.
    #[serde(default)]
    pub stack: Option<StackFacts>,
    /// The address we reached the device on, CIDR or bare.
    #[serde(default)]
    pub management_address: Option<String>,
}

impl DeviceFacts {
    /// More than one chassis member presenting as one logical device.
    pub fn is_stacked(&self) -> bool {
        self.stack
            .as_ref()
            .is_some_and(|stack| stack.members.len() > 1)
    }
}

// ── OS family detection ─────────────────────────────────────────────

/// Neighbor OS family derived from the advertised version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[non_exhaustive]
pub enum OsFamily {
    #[strum(serialize = "IOS-XE")]
    IosXe,
    #[strum(serialize = "IOS")]
    Ios,
    #[strum(serialize = "NX-OS")]
    NxOs,
    #[strum(serialize = "unknown")]
    Unknown,
}

impl OsFamily {
    /// Substring match in fixed priority order. `IOS-XE` must be tested
    /// before `IOS` since its marker string is a superset match.
    pub fn detect(version: &str) -> Self {
        if version.contains("IOS-XE") || version.contains("IOS XE") {
            Self::IosXe
        } else if version.contains("IOS") {
            Self::Ios
        } else if version.contains("NX-OS") {
            Self::NxOs
        } else {
            Self::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_family_prefers_ios_xe_over_ios() {
        let version = "Cisco IOS-XE Software, Version 17.9.4a";
        assert_eq!(OsFamily::detect(version), OsFamily::IosXe);
    }

    #[test]
    fn os_family_plain_ios() {
        let version = "Cisco IOS Software, C3750 Software, Version 12.2(55)SE";
        assert_eq!(OsFamily::detect(version), OsFamily::Ios);
    }

    #[test]
    fn os_family_unknown_for_unrecognized() {
        assert_eq!(OsFamily::detect("JunOS 21.2R3"), OsFamily::Unknown);
    }

    #[test]
    fn single_member_stack_is_not_stacked() {
        let stack = StackFacts {
            members: vec![StackMember {
                slot: 1,
                serial: "ABC123".into(),
                model: "C9300-48P".into(),
            }],
        };
        let facts = DeviceFacts {
            version: VersionFacts {
                hostname: "sw".into(),
                os: "IOS-XE".into(),
                version: "17.9".into(),
                chassis_sn: "ABC123".into(),
                platform: "c9300".into(),
                chassis: "C9300-48P".into(),
            },
            vlans: BTreeMap::new(),
            interfaces: BTreeMap::new(),
            neighbors: Vec::new(),
            inventory: None,
            stack: Some(stack),
            management_address: None,
        };
        assert!(!facts.is_stacked());
    }
}
