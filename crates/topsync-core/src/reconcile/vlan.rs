// ── VLAN reconciliation ──

use tracing::{debug, info};

use crate::error::Error;
use crate::facts::DeviceFacts;
use crate::store::Store;

/// Upsert every VLAN of the observed table by numeric id.
///
/// The device is the source of truth for naming: a stored VLAN whose
/// name drifted is renamed. VLANs absent from the table are left
/// untouched — a device only reports the VLANs it knows about, and
/// absence is not evidence of removal fleet-wide.
pub async fn reconcile_vlans<S: Store>(store: &S, facts: &DeviceFacts) -> Result<(), Error> {
    for (&vid, name) in &facts.vlans {
        match store.vlan_by_vid(vid).await? {
            Some(mut existing) => {
                if existing.name != *name {
                    info!(vid, old = existing.name, new = name, "renaming VLAN");
                    existing.name.clone_from(name);
                    store.update_vlan(&existing).await?;
                } else {
                    debug!(vid, name, "VLAN up to date");
                }
            }
            None => {
                info!(vid, name, "creating VLAN");
                store.create_vlan(vid, name).await?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::facts::{DeviceFacts, VersionFacts};
    use crate::store::memory::MemoryStore;
    use std::collections::BTreeMap;

    fn facts_with_vlans(vlans: &[(u16, &str)]) -> DeviceFacts {
        DeviceFacts {
            version: VersionFacts {
                hostname: "SW1".into(),
                os: "IOS".into(),
                version: "12.2".into(),
                chassis_sn: "X".into(),
                platform: "c3750".into(),
                chassis: "WS-C3750G".into(),
            },
            vlans: vlans
                .iter()
                .map(|&(vid, name)| (vid, name.to_owned()))
                .collect(),
            interfaces: BTreeMap::new(),
            neighbors: Vec::new(),
            inventory: None,
            stack: None,
            management_address: None,
        }
    }

    #[tokio::test]
    async fn renames_on_drift_and_leaves_unobserved_alone() {
        let store = MemoryStore::new();
        store.create_vlan(10, "OLD").await.unwrap();
        store.create_vlan(20, "KEEP").await.unwrap();

        let facts = facts_with_vlans(&[(10, "NEW"), (30, "FRESH")]);
        reconcile_vlans(&store, &facts).await.unwrap();

        let vlans = store.vlans().unwrap();
        assert_eq!(vlans.len(), 3);
        assert_eq!(vlans.iter().find(|v| v.vid == 10).unwrap().name, "NEW");
        assert_eq!(vlans.iter().find(|v| v.vid == 20).unwrap().name, "KEEP");
        assert_eq!(vlans.iter().find(|v| v.vid == 30).unwrap().name, "FRESH");
    }

    #[tokio::test]
    async fn second_run_changes_nothing() {
        let store = MemoryStore::new();
        let facts = facts_with_vlans(&[(10, "USERS"), (20, "VOICE")]);

        reconcile_vlans(&store, &facts).await.unwrap();
        let first = store.vlans().unwrap();
        reconcile_vlans(&store, &facts).await.unwrap();
        let second = store.vlans().unwrap();

        assert_eq!(first, second);
    }
}
