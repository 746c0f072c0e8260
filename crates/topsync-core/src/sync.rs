// ── Orchestration ──
//
// One device is fully reconciled before the next begins: collect facts,
// then VLANs → device → interfaces → (loose-cable GC) → neighbors →
// inventory. There is no transaction around a device's pass; a crash
// mid-pass leaves the device partially updated, and the idempotency of
// every step is what makes re-running the whole pass safe.

use tracing::{info, warn};

use crate::collect::Collector;
use crate::error::Error;
use crate::facts::DeviceFacts;
use crate::reconcile::cables::remove_loose_cables;
use crate::reconcile::device::reconcile_device;
use crate::reconcile::interface::reconcile_interfaces;
use crate::reconcile::inventory::reconcile_inventory;
use crate::reconcile::neighbor::reconcile_neighbors;
use crate::reconcile::vlan::reconcile_vlans;
use crate::store::Store;

/// How one device's pass ended.
#[derive(Debug)]
pub enum DeviceOutcome {
    /// Every reconciliation step completed.
    Synced,
    /// Nothing was mutated: the device was unreachable or its facts
    /// could not be collected. An `UnsupportedCommand` from `collect`
    /// lands here only when a required query failed; collectors degrade
    /// optional queries (stack membership, hardware report) to `None`
    /// fields, which reconcile as not stacked / no inventory.
    Skipped { reason: String },
    /// The pass aborted partway through on a store error. Safe to
    /// re-run once the cause is fixed.
    Failed { error: Error },
}

/// Per-device outcomes of one full sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub outcomes: Vec<(String, DeviceOutcome)>,
}

impl SyncReport {
    pub fn synced(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, DeviceOutcome::Synced))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, DeviceOutcome::Failed { .. }))
            .count()
    }
}

/// Drives the reconcilers, one device at a time.
pub struct Engine<C, S> {
    collector: C,
    store: S,
}

impl<C: Collector, S: Store> Engine<C, S> {
    pub fn new(collector: C, store: S) -> Self {
        Self { collector, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run a full pass over the given device names, strictly in order.
    ///
    /// A connectivity failure skips that device and moves on; store
    /// errors abort only the affected device's pass.
    pub async fn run(&self, devices: &[String]) -> SyncReport {
        let mut report = SyncReport::default();
        for name in devices {
            let outcome = match self.sync_device(name).await {
                Ok(()) => DeviceOutcome::Synced,
                Err(err @ (Error::Connectivity { .. } | Error::UnsupportedCommand { .. })) => {
                    warn!(device = name, error = %err, "skipping device");
                    DeviceOutcome::Skipped {
                        reason: err.to_string(),
                    }
                }
                Err(error) => {
                    warn!(device = name, error = %error, "device pass aborted");
                    DeviceOutcome::Failed { error }
                }
            };
            report.outcomes.push((name.clone(), outcome));
        }
        report
    }

    /// Collect facts for one device and run every reconciler against
    /// the store.
    pub async fn sync_device(&self, name: &str) -> Result<(), Error> {
        info!(device = name, "collecting facts");
        let facts = self.collector.collect(name).await?;
        self.apply_facts(&facts).await
    }

    /// Reconcile an already-collected fact snapshot.
    pub async fn apply_facts(&self, facts: &DeviceFacts) -> Result<(), Error> {
        let hostname = &facts.version.hostname;
        info!(device = hostname, "reconciling");

        reconcile_vlans(&self.store, facts).await?;
        let device = reconcile_device(&self.store, facts).await?;
        reconcile_interfaces(&self.store, &device, facts).await?;

        // Clear half-terminated leftovers before walking neighbors so
        // the link pass never matches a loose record.
        let removed = remove_loose_cables(&self.store).await?;
        if removed > 0 {
            info!(device = hostname, removed, "removed loose cables");
        }

        reconcile_neighbors(&self.store, &device, &facts.neighbors).await?;

        if let Some(report) = &facts.inventory {
            reconcile_inventory(&self.store, &device, report, facts.is_stacked()).await?;
        }

        info!(device = hostname, "device pass complete");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::collect::Collector;
    use crate::facts::{
        HardwareReport, InterfaceFacts, ModuleEntry, NeighborFacts, VersionFacts,
    };
    use crate::store::memory::MemoryStore;
    use std::collections::{BTreeMap, HashMap};

    /// Collector serving canned fact snapshots from memory.
    struct CannedCollector {
        facts: HashMap<String, DeviceFacts>,
    }

    impl Collector for CannedCollector {
        async fn collect(&self, device: &str) -> Result<DeviceFacts, Error> {
            self.facts
                .get(device)
                .cloned()
                .ok_or_else(|| Error::connectivity(device, "no route to host"))
        }
    }

    fn sw1_facts() -> DeviceFacts {
        let mut interfaces = BTreeMap::new();
        interfaces.insert(
            "GigabitEthernet1/0/1".to_owned(),
            InterfaceFacts {
                hardware_type: Some("10/100/1000BaseTX".into()),
                enabled: true,
                mtu: Some(1500),
                ipv4: Vec::new(),
            },
        );
        interfaces.insert(
            "Vlan1".to_owned(),
            InterfaceFacts {
                hardware_type: Some("EtherSVI".into()),
                enabled: true,
                mtu: Some(1500),
                ipv4: vec!["10.0.0.1/24".into()],
            },
        );

        let mut vlans = BTreeMap::new();
        vlans.insert(1, "default".to_owned());
        vlans.insert(10, "USERS".to_owned());

        DeviceFacts {
            version: VersionFacts {
                hostname: "SW1".into(),
                os: "IOS".into(),
                version: "12.2(55)SE".into(),
                chassis_sn: "FDO1111A1AA".into(),
                platform: "c3750".into(),
                chassis: "WS-C3750G-24TS".into(),
            },
            vlans,
            interfaces,
            neighbors: vec![NeighborFacts {
                device_id: "SW2".into(),
                capabilities: "Switch IGMP".into(),
                platform: "cisco WS-C3750G-24TS".into(),
                software_version: "Cisco IOS Software, Version 12.2(55)SE".into(),
                local_interface: "GigabitEthernet1/0/1".into(),
                port_id: "GigabitEthernet1/0/24".into(),
                management_addresses: vec!["10.0.0.2".into()],
                native_vlan: None,
            }],
            inventory: Some(HardwareReport::FlatModule {
                modules: vec![ModuleEntry {
                    name: "FAN 1".into(),
                    description: "Fan tray".into(),
                    part_id: "FAN-T1".into(),
                    serial: "FAN-SER-1".into(),
                }],
            }),
            stack: None,
            management_address: Some("10.0.0.1".into()),
        }
    }

    fn engine_with(facts: Vec<DeviceFacts>) -> Engine<CannedCollector, MemoryStore> {
        let facts = facts
            .into_iter()
            .map(|f| (f.version.hostname.clone(), f))
            .collect();
        Engine::new(CannedCollector { facts }, MemoryStore::new())
    }

    #[tokio::test]
    async fn end_to_end_first_discovery() {
        let engine = engine_with(vec![sw1_facts()]);
        let report = engine.run(&["SW1".into()]).await;
        assert_eq!(report.synced(), 1);
        assert_eq!(report.failed(), 0);

        let store = engine.store();

        // Both devices created.
        let sw1 = store.device_by_name("SW1").await.unwrap().unwrap();
        let sw2 = store.device_by_name("SW2").await.unwrap().unwrap();

        // Both ends of the link exist and exactly one cable joins them.
        let local = store
            .interface(sw1.id, "GigabitEthernet1/0/1")
            .await
            .unwrap()
            .unwrap();
        let remote = store
            .interface(sw2.id, "GigabitEthernet1/0/24")
            .await
            .unwrap()
            .unwrap();
        assert!(store.cable_between(local.id, remote.id).await.unwrap().is_some());
        assert_eq!(store.cables().unwrap().len(), 1);

        // SW2's management address assigned to its port and primary.
        let ip = store.ip_by_address("10.0.0.2/24").await.unwrap().unwrap();
        assert_eq!(ip.assigned_object.as_ref().unwrap().object_id, remote.id);
        assert_eq!(sw2.primary_ip4, Some(ip.id));

        // SW2 carries the canonical switch role.
        let role = store.role_by_slug("switch").await.unwrap().unwrap();
        assert_eq!(sw2.role, Some(role.id));
    }

    #[tokio::test]
    async fn full_run_is_idempotent() {
        let engine = engine_with(vec![sw1_facts()]);
        let devices = vec!["SW1".to_owned()];

        engine.run(&devices).await;
        let store = engine.store();
        let count = store.entity_count().unwrap();
        let devices_before = store.devices().unwrap();
        let interfaces_before = store.interfaces().unwrap();
        let ips_before = store.ips().unwrap();
        let cables_before = store.cables().unwrap();
        let vlans_before = store.vlans().unwrap();
        let items_before = store.items().unwrap();

        engine.run(&devices).await;

        assert_eq!(store.entity_count().unwrap(), count);
        assert_eq!(store.devices().unwrap(), devices_before);
        assert_eq!(store.interfaces().unwrap(), interfaces_before);
        assert_eq!(store.ips().unwrap(), ips_before);
        assert_eq!(store.cables().unwrap(), cables_before);
        assert_eq!(store.vlans().unwrap(), vlans_before);
        assert_eq!(store.items().unwrap(), items_before);
    }

    #[tokio::test]
    async fn missing_optional_facts_do_not_skip_the_device() {
        let mut facts = sw1_facts();
        facts.inventory = None;
        facts.stack = None;

        let engine = engine_with(vec![facts]);
        let report = engine.run(&["SW1".into()]).await;

        assert!(matches!(report.outcomes[0].1, DeviceOutcome::Synced));
        assert!(engine.store().device_by_name("SW1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unreachable_device_is_skipped_not_fatal() {
        let engine = engine_with(vec![sw1_facts()]);
        let report = engine
            .run(&["GHOST".to_owned(), "SW1".to_owned()])
            .await;

        assert_eq!(report.outcomes.len(), 2);
        assert!(matches!(
            report.outcomes[0].1,
            DeviceOutcome::Skipped { .. }
        ));
        assert!(matches!(report.outcomes[1].1, DeviceOutcome::Synced));
        // The skipped device mutated nothing.
        assert!(engine.store().device_by_name("GHOST").await.unwrap().is_none());
    }
}
