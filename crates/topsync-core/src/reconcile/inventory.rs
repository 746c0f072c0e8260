// ── Hardware inventory reconciliation ──
//
// Unlike every other pass, this one deletes: the observed serial set is
// authoritative and a serial that vanished means the part was pulled.
// Pluggable optics get the bay/type/module triple; everything else is a
// discrete inventory item keyed by serial.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::error::Error;
use crate::facts::{HardwareReport, ModuleEntry};
use crate::model::Device;
use crate::store::{NewInventoryItem, NewModule, Store};

/// Part-id prefixes that denote a pluggable optical module.
const OPTIC_PREFIXES: [&str; 5] = ["GLC-", "SFP-", "X2-", "XENPAK-", "QSFP-"];

const MODULE_MANUFACTURER: &str = "Cisco";

pub fn is_pluggable_optic(part_id: &str) -> bool {
    OPTIC_PREFIXES
        .iter()
        .any(|prefix| part_id.starts_with(prefix))
}

/// Flatten the shape-tagged hardware report into module entries.
///
/// The chassis's own base unit (`Slot 1` on a non-stacked device) is
/// represented by the Device entity itself, not an inventory item, so
/// it is skipped.
fn observed_entries(report: &HardwareReport, stacked: bool) -> Vec<&ModuleEntry> {
    match report {
        HardwareReport::RouteProcessor { slots } => slots
            .iter()
            .filter(|slot| stacked || slot.slot != "1")
            .flat_map(|slot| &slot.modules)
            .collect(),
        HardwareReport::FlatModule { modules } => modules.iter().collect(),
    }
}

/// Diff the device's hardware report against the store.
pub async fn reconcile_inventory<S: Store>(
    store: &S,
    device: &Device,
    report: &HardwareReport,
    stacked: bool,
) -> Result<(), Error> {
    let entries = observed_entries(report, stacked);

    let mut observed_serials: BTreeSet<&str> = BTreeSet::new();
    let mut observed_optic_serials: BTreeSet<&str> = BTreeSet::new();
    for entry in entries {
        if entry.serial.is_empty() {
            debug!(device = device.name, module = entry.name, "no serial, skipping entry");
            continue;
        }
        if is_pluggable_optic(&entry.part_id) {
            observed_optic_serials.insert(&entry.serial);
            reconcile_module(store, device, entry).await?;
        } else {
            observed_serials.insert(&entry.serial);
            reconcile_item(store, device, entry).await?;
        }
    }

    // Prune: stored serials the device no longer reports.
    for item in store.inventory_items(device.id).await? {
        if !observed_serials.contains(item.serial.as_str()) {
            info!(
                device = device.name,
                item = item.name,
                serial = item.serial,
                "serial no longer observed, deleting inventory item"
            );
            store.delete_inventory_item(item.id).await?;
        }
    }

    // Same rule for seated optics: a module whose serial vanished from
    // the report was pulled from its bay.
    for module in store.device_modules(device.id).await? {
        if !observed_optic_serials.contains(module.serial.as_str()) {
            info!(
                device = device.name,
                serial = module.serial,
                "serial no longer observed, deleting module"
            );
            store.delete_module(module.id).await?;
        }
    }
    Ok(())
}

/// Upsert bay + type + module for a pluggable optic.
async fn reconcile_module<S: Store>(
    store: &S,
    device: &Device,
    entry: &ModuleEntry,
) -> Result<(), Error> {
    let bay = match store.module_bay(device.id, &entry.name).await? {
        Some(bay) => bay,
        None => {
            info!(device = device.name, bay = entry.name, "creating module bay");
            store.create_module_bay(device.id, &entry.name).await?
        }
    };

    let module_type = match store.module_type_by_model(&entry.part_id).await? {
        Some(existing) => existing,
        None => {
            info!(model = entry.part_id, "creating module type");
            store
                .create_module_type(&entry.part_id, MODULE_MANUFACTURER)
                .await?
        }
    };

    match store.module_in_bay(device.id, bay.id).await? {
        Some(mut seated) => {
            if seated.serial != entry.serial || seated.module_type != module_type.id {
                info!(
                    device = device.name,
                    bay = entry.name,
                    serial = entry.serial,
                    "module changed, updating in place"
                );
                seated.serial.clone_from(&entry.serial);
                seated.module_type = module_type.id;
                store.update_module(&seated).await?;
            }
        }
        None => {
            info!(device = device.name, bay = entry.name, serial = entry.serial, "seating module");
            store
                .create_module(NewModule {
                    device: device.id,
                    module_bay: bay.id,
                    module_type: module_type.id,
                    serial: entry.serial.clone(),
                })
                .await?;
        }
    }
    Ok(())
}

/// Create a discrete inventory item unless its serial is already stored.
async fn reconcile_item<S: Store>(
    store: &S,
    device: &Device,
    entry: &ModuleEntry,
) -> Result<(), Error> {
    let known = store
        .inventory_items(device.id)
        .await?
        .into_iter()
        .any(|item| item.serial == entry.serial);
    if known {
        debug!(device = device.name, serial = entry.serial, "item already stored");
        return Ok(());
    }
    info!(device = device.name, item = entry.name, serial = entry.serial, "creating inventory item");
    store
        .create_inventory_item(NewInventoryItem {
            device: device.id,
            name: entry.name.clone(),
            serial: entry.serial.clone(),
            manufacturer: Some(MODULE_MANUFACTURER.to_owned()),
            part_id: entry.part_id.clone(),
        })
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::facts::SlotEntry;
    use crate::model::{CustomFields, DeviceStatus};
    use crate::store::memory::MemoryStore;
    use crate::store::NewDevice;

    fn entry(name: &str, part_id: &str, serial: &str) -> ModuleEntry {
        ModuleEntry {
            name: name.to_owned(),
            description: String::new(),
            part_id: part_id.to_owned(),
            serial: serial.to_owned(),
        }
    }

    async fn seed_device(store: &MemoryStore) -> Device {
        let site = store.create_site("Unknown", "unknown").await.unwrap();
        let dt = store.create_device_type("C9300", "c9300").await.unwrap();
        store
            .create_device(NewDevice {
                name: "SW1".into(),
                device_type: dt.id,
                platform: None,
                role: None,
                serial: "AAA".into(),
                site: site.id,
                status: DeviceStatus::Active,
                custom_fields: CustomFields::default(),
            })
            .await
            .unwrap()
    }

    #[test]
    fn optic_detection_by_part_prefix() {
        assert!(is_pluggable_optic("GLC-SX-MMD"));
        assert!(is_pluggable_optic("SFP-10G-SR"));
        assert!(!is_pluggable_optic("PWR-C1-715WAC"));
        assert!(!is_pluggable_optic(""));
    }

    #[tokio::test]
    async fn converges_to_the_observed_serial_set() {
        let store = MemoryStore::new();
        let device = seed_device(&store).await;

        // Store holds {A, C}.
        for (name, serial) in [("Fan A", "SER-A"), ("Fan C", "SER-C")] {
            store
                .create_inventory_item(NewInventoryItem {
                    device: device.id,
                    name: name.into(),
                    serial: serial.into(),
                    manufacturer: None,
                    part_id: "FAN-T1".into(),
                })
                .await
                .unwrap();
        }

        // Device reports {A, B}.
        let report = HardwareReport::FlatModule {
            modules: vec![
                entry("Fan A", "FAN-T1", "SER-A"),
                entry("Fan B", "FAN-T1", "SER-B"),
            ],
        };
        reconcile_inventory(&store, &device, &report, false).await.unwrap();

        let serials: Vec<_> = store
            .items()
            .unwrap()
            .into_iter()
            .map(|i| i.serial)
            .collect();
        assert_eq!(serials, vec!["SER-A", "SER-B"]);
    }

    #[tokio::test]
    async fn optics_become_bay_type_module() {
        let store = MemoryStore::new();
        let device = seed_device(&store).await;

        let report = HardwareReport::FlatModule {
            modules: vec![entry("GigabitEthernet1/1/1", "GLC-SX-MMD", "OPT-1")],
        };
        reconcile_inventory(&store, &device, &report, false).await.unwrap();

        assert!(store.items().unwrap().is_empty());
        let modules = store.modules().unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].serial, "OPT-1");

        // Optic swapped for a different serial: updated in place.
        let report = HardwareReport::FlatModule {
            modules: vec![entry("GigabitEthernet1/1/1", "GLC-SX-MMD", "OPT-2")],
        };
        reconcile_inventory(&store, &device, &report, false).await.unwrap();
        let modules = store.modules().unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].serial, "OPT-2");
    }

    #[tokio::test]
    async fn removed_optic_unseats_its_module() {
        let store = MemoryStore::new();
        let device = seed_device(&store).await;

        let report = HardwareReport::FlatModule {
            modules: vec![entry("Te1/1/1", "SFP-10G-SR", "OPT-1")],
        };
        reconcile_inventory(&store, &device, &report, false).await.unwrap();
        assert_eq!(store.modules().unwrap().len(), 1);

        // Optic pulled: the report no longer mentions it, the module
        // record goes too.
        let report = HardwareReport::FlatModule { modules: vec![] };
        reconcile_inventory(&store, &device, &report, false).await.unwrap();
        assert!(store.modules().unwrap().is_empty());
    }

    #[tokio::test]
    async fn chassis_slot_skipped_unless_stacked() {
        let store = MemoryStore::new();
        let device = seed_device(&store).await;

        let report = HardwareReport::RouteProcessor {
            slots: vec![
                SlotEntry {
                    slot: "1".into(),
                    modules: vec![entry("Switch 1", "C9300-48P", "CHASSIS-1")],
                },
                SlotEntry {
                    slot: "2".into(),
                    modules: vec![entry("Supervisor", "SUP-X", "SUP-1")],
                },
            ],
        };

        reconcile_inventory(&store, &device, &report, false).await.unwrap();
        let serials: Vec<_> = store
            .items()
            .unwrap()
            .into_iter()
            .map(|i| i.serial)
            .collect();
        assert_eq!(serials, vec!["SUP-1"]);

        // Stacked: every member chassis is a real inventory entry.
        reconcile_inventory(&store, &device, &report, true).await.unwrap();
        let serials: Vec<_> = store
            .items()
            .unwrap()
            .into_iter()
            .map(|i| i.serial)
            .collect();
        assert_eq!(serials, vec!["SUP-1", "CHASSIS-1"]);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let store = MemoryStore::new();
        let device = seed_device(&store).await;
        let report = HardwareReport::FlatModule {
            modules: vec![
                entry("Fan", "FAN-T1", "SER-F"),
                entry("Te1/1/3", "SFP-10G-SR", "OPT-9"),
            ],
        };

        reconcile_inventory(&store, &device, &report, false).await.unwrap();
        let before = store.entity_count().unwrap();
        reconcile_inventory(&store, &device, &report, false).await.unwrap();
        assert_eq!(store.entity_count().unwrap(), before);
    }
}
