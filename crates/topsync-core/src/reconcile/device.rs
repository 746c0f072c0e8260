// ── Device reconciliation ──

use tracing::{debug, info};

use crate::error::Error;
use crate::facts::DeviceFacts;
use crate::model::{CustomFields, Device, DeviceStatus, IpStatus};
use crate::store::{NewDevice, NewIpAddress, Store};

use super::site::{normalize_cidr, resolve_site};
use super::taxonomy::{ensure_device_type, ensure_platform, ensure_role};

/// Role given to devices we reconcile directly (we only connect to
/// switches; neighbors get their role from advertised capabilities).
const SELF_ROLE: &str = "Switch";

/// Upsert the device record itself from its version facts.
///
/// Identity fields come from the version block; `stacked` status from
/// stack membership. A stack has no single chassis serial, so the serial
/// field is blanked for stacked devices. The primary address is *not*
/// set here — that happens once an address is actually bound to an
/// interface.
pub async fn reconcile_device<S: Store>(store: &S, facts: &DeviceFacts) -> Result<Device, Error> {
    let version = &facts.version;
    let hostname = version.hostname.as_str();

    let stacked = facts.is_stacked();
    let serial = if stacked {
        debug!(device = hostname, "stacked chassis, blanking serial");
        String::new()
    } else {
        version.chassis_sn.clone()
    };

    let platform = ensure_platform(store, &version.platform).await?;
    let device_type = ensure_device_type(store, &version.chassis).await?;
    let os_full = format!("{} {}", version.os, version.version);

    // Make sure the management address exists before site resolution so
    // rediscovery and first discovery walk the same path.
    let mgmt = facts.management_address.as_deref().map(normalize_cidr);
    if let Some(cidr) = &mgmt {
        if store.ip_by_address(cidr).await?.is_none() {
            info!(device = hostname, address = cidr, "creating management address");
            store
                .create_ip(NewIpAddress {
                    address: cidr.clone(),
                    status: IpStatus::Active,
                    description: format!("Auto-discovered address for {hostname}"),
                })
                .await?;
        }
    }

    let site = resolve_site(store, hostname, mgmt.as_deref()).await?;

    match store.device_by_name(hostname).await? {
        Some(mut existing) => {
            info!(device = hostname, "device known, updating in place");
            existing.device_type = device_type;
            existing.platform = Some(platform);
            existing.serial = serial;
            existing.site = site;
            existing.custom_fields = CustomFields { os: Some(os_full) };
            store.update_device(&existing).await?;
            Ok(existing)
        }
        None => {
            info!(device = hostname, "device unknown, creating");
            let role = ensure_role(store, SELF_ROLE).await?;
            let created = store
                .create_device(NewDevice {
                    name: hostname.to_owned(),
                    device_type,
                    platform: Some(platform),
                    role: Some(role),
                    serial,
                    site,
                    status: DeviceStatus::Active,
                    custom_fields: CustomFields { os: Some(os_full) },
                })
                .await?;
            debug!(device = hostname, id = %created.id, "device created");
            Ok(created)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::facts::{StackFacts, StackMember, VersionFacts};
    use crate::store::memory::MemoryStore;
    use std::collections::BTreeMap;

    fn base_facts() -> DeviceFacts {
        DeviceFacts {
            version: VersionFacts {
                hostname: "SW1".into(),
                os: "IOS-XE".into(),
                version: "17.9.4a".into(),
                chassis_sn: "FOC1234X0AB".into(),
                platform: "c9300".into(),
                chassis: "C9300-48P".into(),
            },
            vlans: BTreeMap::new(),
            interfaces: BTreeMap::new(),
            neighbors: Vec::new(),
            inventory: None,
            stack: None,
            management_address: Some("10.0.0.1".into()),
        }
    }

    #[tokio::test]
    async fn creates_then_updates_in_place() {
        let store = MemoryStore::new();
        let facts = base_facts();

        let created = reconcile_device(&store, &facts).await.unwrap();
        assert_eq!(created.serial, "FOC1234X0AB");
        assert_eq!(
            created.custom_fields.os.as_deref(),
            Some("IOS-XE 17.9.4a")
        );

        let mut updated_facts = facts.clone();
        updated_facts.version.chassis_sn = "FOC9999X0ZZ".into();
        let updated = reconcile_device(&store, &updated_facts).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.serial, "FOC9999X0ZZ");
        assert_eq!(store.devices().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stacked_device_gets_blank_serial() {
        let store = MemoryStore::new();
        let mut facts = base_facts();
        facts.stack = Some(StackFacts {
            members: vec![
                StackMember {
                    slot: 1,
                    serial: "AAA".into(),
                    model: "C9300-48P".into(),
                },
                StackMember {
                    slot: 2,
                    serial: "BBB".into(),
                    model: "C9300-48P".into(),
                },
            ],
        });

        let device = reconcile_device(&store, &facts).await.unwrap();
        assert_eq!(device.serial, "");
    }

    #[tokio::test]
    async fn management_address_is_created_once() {
        let store = MemoryStore::new();
        let facts = base_facts();

        reconcile_device(&store, &facts).await.unwrap();
        reconcile_device(&store, &facts).await.unwrap();

        let ips = store.ips().unwrap();
        assert_eq!(ips.len(), 1);
        assert_eq!(ips[0].address, "10.0.0.1/24");
    }

    #[tokio::test]
    async fn primary_address_is_not_set_here() {
        let store = MemoryStore::new();
        let device = reconcile_device(&store, &base_facts()).await.unwrap();
        assert_eq!(device.primary_ip4, None);
    }
}
