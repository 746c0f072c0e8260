// ── Interface reconciliation ──

use tracing::{debug, info, warn};

use crate::error::Error;
use crate::facts::DeviceFacts;
use crate::model::{AssignedObject, Device, Interface, InterfaceType, IpStatus};
use crate::store::{NewInterface, NewIpAddress, Store};

use super::site::normalize_cidr;

/// Classify media from the vendor-reported hardware descriptor of the
/// device's own interface table.
pub fn media_type_for_descriptor(descriptor: Option<&str>) -> InterfaceType {
    let Some(descriptor) = descriptor else {
        return InterfaceType::Virtual;
    };
    let lower = descriptor.to_lowercase();
    if lower == "unknown" || lower == "not present" {
        InterfaceType::Other
    } else if lower.contains("ten gigabit") || lower.contains("10gig") {
        InterfaceType::TenGigabitEthernet
    } else if lower.contains("10/100/1000") || lower.contains("gigabit ethernet") {
        InterfaceType::GigabitEthernet
    } else if lower.contains("10/100") || lower.contains("fast ethernet") {
        InterfaceType::FastEthernet
    } else {
        InterfaceType::Virtual
    }
}

/// Classify media from the interface name alone — all we have for link
/// endpoints learned from a neighbor advertisement.
///
/// `TenGigabitEthernet` must be tested before `GigabitEthernet`, which
/// it contains as a substring.
pub fn media_type_for_name(name: &str) -> InterfaceType {
    if name.contains("Vlan") {
        InterfaceType::Virtual
    } else if name.contains("TwentyFiveGigE") {
        InterfaceType::TwentyFiveGigSfp28
    } else if name.contains("TenGigabitEthernet") {
        InterfaceType::TenGigabitEthernet
    } else if name.contains("GigabitEthernet") {
        InterfaceType::GigabitEthernet
    } else if name.contains("FastEthernet") {
        InterfaceType::FastEthernet
    } else {
        InterfaceType::Virtual
    }
}

/// Upsert every interface of the observed table, then bind any
/// configured addresses (assign-once).
///
/// Interfaces are additive only, mirroring the VLAN policy: entries
/// absent from the table are left untouched.
pub async fn reconcile_interfaces<S: Store>(
    store: &S,
    device: &Device,
    facts: &DeviceFacts,
) -> Result<(), Error> {
    for (name, observed) in &facts.interfaces {
        let if_type = media_type_for_descriptor(observed.hardware_type.as_deref());

        let iface = match store.interface(device.id, name).await? {
            Some(mut existing) => {
                if existing.if_type != if_type
                    || existing.enabled != observed.enabled
                    || existing.mtu != observed.mtu
                {
                    debug!(device = device.name, interface = name, "updating interface");
                    existing.if_type = if_type;
                    existing.enabled = observed.enabled;
                    existing.mtu = observed.mtu;
                    store.update_interface(&existing).await?;
                }
                existing
            }
            None => {
                info!(device = device.name, interface = name, %if_type, "creating interface");
                store
                    .create_interface(NewInterface {
                        device: device.id,
                        name: name.clone(),
                        if_type,
                        enabled: observed.enabled,
                        mtu: observed.mtu,
                        description: String::new(),
                    })
                    .await?
            }
        };

        for address in &observed.ipv4 {
            bind_address(store, device, &iface, address).await?;
        }
    }
    Ok(())
}

/// Assign-once address binding: an address already bound to any object
/// is left untouched and the conflict is logged. A fresh assignment also
/// promotes the address to the device's primary.
async fn bind_address<S: Store>(
    store: &S,
    device: &Device,
    iface: &Interface,
    address: &str,
) -> Result<(), Error> {
    let cidr = normalize_cidr(address);

    let ip = match store.ip_by_address(&cidr).await? {
        Some(ip) => ip,
        None => {
            info!(address = cidr, "creating address");
            store
                .create_ip(NewIpAddress {
                    address: cidr.clone(),
                    status: IpStatus::Active,
                    description: format!("Auto-discovered address for {}", device.name),
                })
                .await?
        }
    };

    if let Some(bound) = &ip.assigned_object {
        if bound.object_id != iface.id {
            warn!(
                address = cidr,
                object_type = bound.object_type,
                object_id = %bound.object_id,
                "address already assigned elsewhere, leaving untouched"
            );
        }
        return Ok(());
    }

    info!(address = cidr, device = device.name, interface = iface.name, "assigning address");
    let mut ip = ip;
    ip.assigned_object = Some(AssignedObject::interface(iface.id));
    store.update_ip(&ip).await?;

    // Re-read the device: the pass may have changed it since our copy.
    if let Some(mut fresh) = store.device_by_name(&device.name).await? {
        info!(device = device.name, address = cidr, "setting primary address");
        fresh.primary_ip4 = Some(ip.id);
        store.update_device(&fresh).await?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::facts::{InterfaceFacts, VersionFacts};
    use crate::reconcile::device::reconcile_device;
    use std::collections::BTreeMap;
    use crate::store::memory::MemoryStore;

    fn facts_with_interfaces(entries: Vec<(&str, InterfaceFacts)>) -> DeviceFacts {
        DeviceFacts {
            version: VersionFacts {
                hostname: "SW1".into(),
                os: "IOS".into(),
                version: "12.2".into(),
                chassis_sn: "X".into(),
                platform: "c3750".into(),
                chassis: "WS-C3750G".into(),
            },
            vlans: BTreeMap::new(),
            interfaces: entries
                .into_iter()
                .map(|(name, f)| (name.to_owned(), f))
                .collect(),
            neighbors: Vec::new(),
            inventory: None,
            stack: None,
            management_address: None,
        }
    }

    #[test]
    fn descriptor_classification() {
        assert_eq!(
            media_type_for_descriptor(Some("10/100/1000BaseTX")),
            InterfaceType::GigabitEthernet
        );
        assert_eq!(
            media_type_for_descriptor(Some("Ten Gigabit Ethernet")),
            InterfaceType::TenGigabitEthernet
        );
        assert_eq!(
            media_type_for_descriptor(Some("10/100BaseTX")),
            InterfaceType::FastEthernet
        );
        assert_eq!(
            media_type_for_descriptor(Some("not present")),
            InterfaceType::Other
        );
        assert_eq!(
            media_type_for_descriptor(Some("EtherSVI")),
            InterfaceType::Virtual
        );
        assert_eq!(media_type_for_descriptor(None), InterfaceType::Virtual);
    }

    #[test]
    fn name_classification_checks_longest_match_first() {
        assert_eq!(
            media_type_for_name("TenGigabitEthernet1/1/1"),
            InterfaceType::TenGigabitEthernet
        );
        assert_eq!(
            media_type_for_name("GigabitEthernet1/0/1"),
            InterfaceType::GigabitEthernet
        );
        assert_eq!(media_type_for_name("Vlan100"), InterfaceType::Virtual);
        assert_eq!(media_type_for_name("Port-channel1"), InterfaceType::Virtual);
    }

    #[tokio::test]
    async fn creates_and_binds_addresses_assign_once() {
        let store = MemoryStore::new();
        let facts = facts_with_interfaces(vec![(
            "Vlan1",
            InterfaceFacts {
                hardware_type: Some("EtherSVI".into()),
                enabled: true,
                mtu: Some(1500),
                ipv4: vec!["10.0.0.1/24".into()],
            },
        )]);
        let device = reconcile_device(&store, &facts).await.unwrap();

        reconcile_interfaces(&store, &device, &facts).await.unwrap();

        let ips = store.ips().unwrap();
        assert_eq!(ips.len(), 1);
        let iface = store.interface(device.id, "Vlan1").await.unwrap().unwrap();
        assert_eq!(
            ips[0].assigned_object.as_ref().unwrap().object_id,
            iface.id
        );
        let device = store.device_by_name("SW1").await.unwrap().unwrap();
        assert_eq!(device.primary_ip4, Some(ips[0].id));

        // Second run: no duplicate interface, assignment untouched.
        reconcile_interfaces(&store, &device, &facts).await.unwrap();
        assert_eq!(store.interfaces().unwrap().len(), 1);
        assert_eq!(store.ips().unwrap(), ips);
    }

    #[tokio::test]
    async fn foreign_assignment_is_never_stolen() {
        let store = MemoryStore::new();
        let facts = facts_with_interfaces(vec![(
            "Vlan1",
            InterfaceFacts {
                hardware_type: Some("EtherSVI".into()),
                enabled: true,
                mtu: None,
                ipv4: vec!["10.0.0.1".into()],
            },
        )]);
        let device = reconcile_device(&store, &facts).await.unwrap();

        // Pre-bind the address to some other object.
        let ip = store
            .create_ip(NewIpAddress {
                address: "10.0.0.1/24".into(),
                status: IpStatus::Active,
                description: String::new(),
            })
            .await
            .unwrap();
        let mut claimed = ip.clone();
        claimed.assigned_object = Some(AssignedObject::interface(crate::model::ObjectId(777)));
        store.update_ip(&claimed).await.unwrap();

        reconcile_interfaces(&store, &device, &facts).await.unwrap();

        let after = store.ip_by_address("10.0.0.1/24").await.unwrap().unwrap();
        assert_eq!(
            after.assigned_object.as_ref().unwrap().object_id,
            crate::model::ObjectId(777)
        );
        let device = store.device_by_name("SW1").await.unwrap().unwrap();
        assert_eq!(device.primary_ip4, None);
    }
}
