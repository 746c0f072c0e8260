// ── In-memory store ──
//
// Process-local Store implementation backing the test suites and the
// CLI's dry-run mode. Mirrors the remote service's observable behavior:
// exact-match lookups, non-deduplicating creates, store-generated ids,
// and rejection of cable terminations on virtual interfaces.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::Error;
use crate::model::{
    Cable, CableEnd, CableStatus, Device, DeviceRole, DeviceType, Interface, InterfaceType,
    InventoryItem, IpAddress, Module, ModuleBay, ModuleType, ObjectId, Platform, Prefix, Site,
    Vlan,
};

use super::{NewDevice, NewInterface, NewInventoryItem, NewIpAddress, NewModule, Store};

#[derive(Default)]
struct Inner {
    next_id: u64,
    sites: HashMap<ObjectId, Site>,
    platforms: HashMap<ObjectId, Platform>,
    device_types: HashMap<ObjectId, DeviceType>,
    roles: HashMap<ObjectId, DeviceRole>,
    prefixes: HashMap<ObjectId, Prefix>,
    devices: HashMap<ObjectId, Device>,
    interfaces: HashMap<ObjectId, Interface>,
    ips: HashMap<ObjectId, IpAddress>,
    vlans: HashMap<ObjectId, Vlan>,
    cables: HashMap<ObjectId, Cable>,
    items: HashMap<ObjectId, InventoryItem>,
    bays: HashMap<ObjectId, ModuleBay>,
    module_types: HashMap<ObjectId, ModuleType>,
    modules: HashMap<ObjectId, Module>,
}

impl Inner {
    fn next(&mut self) -> ObjectId {
        self.next_id += 1;
        ObjectId(self.next_id)
    }
}

/// In-process [`Store`] with the same contract as the remote service.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, Error> {
        self.inner
            .lock()
            .map_err(|_| Error::store("memory store lock poisoned"))
    }

    // ── Seeding / inspection (tests and dry-run reporting) ───────────

    /// Seed a read-only prefix record, optionally bound to a site.
    pub fn seed_prefix(&self, cidr: &str, site: Option<ObjectId>) -> Result<Prefix, Error> {
        let mut inner = self.lock()?;
        let id = inner.next();
        let prefix = Prefix {
            id,
            prefix: cidr.to_owned(),
            site,
        };
        inner.prefixes.insert(id, prefix.clone());
        Ok(prefix)
    }

    pub fn devices(&self) -> Result<Vec<Device>, Error> {
        let mut all: Vec<_> = self.lock()?.devices.values().cloned().collect();
        all.sort_by_key(|d| d.id);
        Ok(all)
    }

    pub fn interfaces(&self) -> Result<Vec<Interface>, Error> {
        let mut all: Vec<_> = self.lock()?.interfaces.values().cloned().collect();
        all.sort_by_key(|i| i.id);
        Ok(all)
    }

    pub fn ips(&self) -> Result<Vec<IpAddress>, Error> {
        let mut all: Vec<_> = self.lock()?.ips.values().cloned().collect();
        all.sort_by_key(|ip| ip.id);
        Ok(all)
    }

    pub fn vlans(&self) -> Result<Vec<Vlan>, Error> {
        let mut all: Vec<_> = self.lock()?.vlans.values().cloned().collect();
        all.sort_by_key(|v| v.id);
        Ok(all)
    }

    pub fn cables(&self) -> Result<Vec<Cable>, Error> {
        let mut all: Vec<_> = self.lock()?.cables.values().cloned().collect();
        all.sort_by_key(|c| c.id);
        Ok(all)
    }

    pub fn items(&self) -> Result<Vec<InventoryItem>, Error> {
        let mut all: Vec<_> = self.lock()?.items.values().cloned().collect();
        all.sort_by_key(|i| i.id);
        Ok(all)
    }

    pub fn modules(&self) -> Result<Vec<Module>, Error> {
        let mut all: Vec<_> = self.lock()?.modules.values().cloned().collect();
        all.sort_by_key(|m| m.id);
        Ok(all)
    }

    pub fn roles(&self) -> Result<Vec<DeviceRole>, Error> {
        let mut all: Vec<_> = self.lock()?.roles.values().cloned().collect();
        all.sort_by_key(|r| r.id);
        Ok(all)
    }

    /// Total entity count across every collection. Idempotence checks
    /// compare this before and after a second pass.
    pub fn entity_count(&self) -> Result<usize, Error> {
        let inner = self.lock()?;
        Ok(inner.sites.len()
            + inner.platforms.len()
            + inner.device_types.len()
            + inner.roles.len()
            + inner.prefixes.len()
            + inner.devices.len()
            + inner.interfaces.len()
            + inner.ips.len()
            + inner.vlans.len()
            + inner.cables.len()
            + inner.items.len()
            + inner.bays.len()
            + inner.module_types.len()
            + inner.modules.len())
    }
}

/// Canonical unordered pair key for cable lookups.
fn pair_key(a: ObjectId, b: ObjectId) -> (ObjectId, ObjectId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Store for MemoryStore {
    // ── Taxonomy ─────────────────────────────────────────────────────

    async fn site_by_slug(&self, slug: &str) -> Result<Option<Site>, Error> {
        Ok(self.lock()?.sites.values().find(|s| s.slug == slug).cloned())
    }

    async fn create_site(&self, name: &str, slug: &str) -> Result<Site, Error> {
        let mut inner = self.lock()?;
        let id = inner.next();
        let site = Site {
            id,
            name: name.to_owned(),
            slug: slug.to_owned(),
        };
        inner.sites.insert(id, site.clone());
        Ok(site)
    }

    async fn platform_by_slug(&self, slug: &str) -> Result<Option<Platform>, Error> {
        Ok(self
            .lock()?
            .platforms
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn create_platform(&self, name: &str, slug: &str) -> Result<Platform, Error> {
        let mut inner = self.lock()?;
        let id = inner.next();
        let platform = Platform {
            id,
            name: name.to_owned(),
            slug: slug.to_owned(),
        };
        inner.platforms.insert(id, platform.clone());
        Ok(platform)
    }

    async fn device_type_by_slug(&self, slug: &str) -> Result<Option<DeviceType>, Error> {
        Ok(self
            .lock()?
            .device_types
            .values()
            .find(|t| t.slug == slug)
            .cloned())
    }

    async fn create_device_type(&self, model: &str, slug: &str) -> Result<DeviceType, Error> {
        let mut inner = self.lock()?;
        let id = inner.next();
        let device_type = DeviceType {
            id,
            model: model.to_owned(),
            slug: slug.to_owned(),
            manufacturer: ObjectId(1),
        };
        inner.device_types.insert(id, device_type.clone());
        Ok(device_type)
    }

    async fn role_by_slug(&self, slug: &str) -> Result<Option<DeviceRole>, Error> {
        Ok(self.lock()?.roles.values().find(|r| r.slug == slug).cloned())
    }

    async fn create_role(
        &self,
        name: &str,
        slug: &str,
        color: &str,
    ) -> Result<DeviceRole, Error> {
        let mut inner = self.lock()?;
        let id = inner.next();
        let role = DeviceRole {
            id,
            name: name.to_owned(),
            slug: slug.to_owned(),
            color: color.to_owned(),
        };
        inner.roles.insert(id, role.clone());
        Ok(role)
    }

    async fn prefix_by_cidr(&self, cidr: &str) -> Result<Option<Prefix>, Error> {
        Ok(self
            .lock()?
            .prefixes
            .values()
            .find(|p| p.prefix == cidr)
            .cloned())
    }

    // ── Devices ──────────────────────────────────────────────────────

    async fn device_by_name(&self, name: &str) -> Result<Option<Device>, Error> {
        Ok(self
            .lock()?
            .devices
            .values()
            .find(|d| d.name == name)
            .cloned())
    }

    async fn create_device(&self, new: NewDevice) -> Result<Device, Error> {
        let mut inner = self.lock()?;
        let id = inner.next();
        let device = Device {
            id,
            name: new.name,
            device_type: new.device_type,
            platform: new.platform,
            role: new.role,
            serial: new.serial,
            site: new.site,
            status: new.status,
            primary_ip4: None,
            custom_fields: new.custom_fields,
        };
        inner.devices.insert(id, device.clone());
        Ok(device)
    }

    async fn update_device(&self, device: &Device) -> Result<(), Error> {
        let mut inner = self.lock()?;
        if !inner.devices.contains_key(&device.id) {
            return Err(Error::store(format!("no device with id {}", device.id)));
        }
        inner.devices.insert(device.id, device.clone());
        Ok(())
    }

    // ── Interfaces ───────────────────────────────────────────────────

    async fn interface(&self, device: ObjectId, name: &str) -> Result<Option<Interface>, Error> {
        Ok(self
            .lock()?
            .interfaces
            .values()
            .find(|i| i.device == device && i.name == name)
            .cloned())
    }

    async fn create_interface(&self, new: NewInterface) -> Result<Interface, Error> {
        let mut inner = self.lock()?;
        let id = inner.next();
        let iface = Interface {
            id,
            device: new.device,
            name: new.name,
            if_type: new.if_type,
            enabled: new.enabled,
            mtu: new.mtu,
            label: String::new(),
            description: new.description,
        };
        inner.interfaces.insert(id, iface.clone());
        Ok(iface)
    }

    async fn update_interface(&self, iface: &Interface) -> Result<(), Error> {
        let mut inner = self.lock()?;
        if !inner.interfaces.contains_key(&iface.id) {
            return Err(Error::store(format!("no interface with id {}", iface.id)));
        }
        inner.interfaces.insert(iface.id, iface.clone());
        Ok(())
    }

    // ── Addresses ────────────────────────────────────────────────────

    async fn ip_by_address(&self, address: &str) -> Result<Option<IpAddress>, Error> {
        Ok(self
            .lock()?
            .ips
            .values()
            .find(|ip| ip.address == address)
            .cloned())
    }

    async fn create_ip(&self, new: NewIpAddress) -> Result<IpAddress, Error> {
        let mut inner = self.lock()?;
        let id = inner.next();
        let ip = IpAddress {
            id,
            address: new.address,
            status: new.status,
            description: new.description,
            assigned_object: None,
        };
        inner.ips.insert(id, ip.clone());
        Ok(ip)
    }

    async fn update_ip(&self, ip: &IpAddress) -> Result<(), Error> {
        let mut inner = self.lock()?;
        if !inner.ips.contains_key(&ip.id) {
            return Err(Error::store(format!("no address with id {}", ip.id)));
        }
        inner.ips.insert(ip.id, ip.clone());
        Ok(())
    }

    // ── VLANs ────────────────────────────────────────────────────────

    async fn vlan_by_vid(&self, vid: u16) -> Result<Option<Vlan>, Error> {
        Ok(self.lock()?.vlans.values().find(|v| v.vid == vid).cloned())
    }

    async fn create_vlan(&self, vid: u16, name: &str) -> Result<Vlan, Error> {
        let mut inner = self.lock()?;
        let id = inner.next();
        let vlan = Vlan {
            id,
            vid,
            name: name.to_owned(),
        };
        inner.vlans.insert(id, vlan.clone());
        Ok(vlan)
    }

    async fn update_vlan(&self, vlan: &Vlan) -> Result<(), Error> {
        let mut inner = self.lock()?;
        if !inner.vlans.contains_key(&vlan.id) {
            return Err(Error::store(format!("no vlan with id {}", vlan.id)));
        }
        inner.vlans.insert(vlan.id, vlan.clone());
        Ok(())
    }

    // ── Cables ───────────────────────────────────────────────────────

    async fn cable_between(&self, a: ObjectId, b: ObjectId) -> Result<Option<Cable>, Error> {
        let wanted = pair_key(a, b);
        Ok(self
            .lock()?
            .cables
            .values()
            .find(|c| c.endpoints().map(|(x, y)| pair_key(x, y)) == Some(wanted))
            .cloned())
    }

    async fn cables_terminating_at(&self, iface: ObjectId) -> Result<Vec<Cable>, Error> {
        let mut all: Vec<_> = self
            .lock()?
            .cables
            .values()
            .filter(|c| c.terminates_at(iface))
            .cloned()
            .collect();
        all.sort_by_key(|c| c.id);
        Ok(all)
    }

    async fn all_cables(&self) -> Result<Vec<Cable>, Error> {
        self.cables()
    }

    async fn create_cable(
        &self,
        a: ObjectId,
        b: ObjectId,
        status: CableStatus,
    ) -> Result<Cable, Error> {
        let mut inner = self.lock()?;
        // Same rule the remote service enforces: no cable terminations
        // on media-less interfaces.
        for end in [a, b] {
            if let Some(iface) = inner.interfaces.get(&end) {
                if iface.if_type == InterfaceType::Virtual {
                    return Err(Error::conflict(format!(
                        "interface '{}' is virtual and cannot terminate a cable",
                        iface.name
                    )));
                }
            }
        }
        let id = inner.next();
        let cable = Cable {
            id,
            a_terminations: vec![CableEnd::interface(a)],
            b_terminations: vec![CableEnd::interface(b)],
            status,
        };
        inner.cables.insert(id, cable.clone());
        Ok(cable)
    }

    async fn update_cable(&self, cable: &Cable) -> Result<(), Error> {
        let mut inner = self.lock()?;
        if !inner.cables.contains_key(&cable.id) {
            return Err(Error::store(format!("no cable with id {}", cable.id)));
        }
        inner.cables.insert(cable.id, cable.clone());
        Ok(())
    }

    async fn delete_cable(&self, id: ObjectId) -> Result<(), Error> {
        self.lock()?.cables.remove(&id);
        Ok(())
    }

    // ── Hardware inventory ───────────────────────────────────────────

    async fn inventory_items(&self, device: ObjectId) -> Result<Vec<InventoryItem>, Error> {
        let mut all: Vec<_> = self
            .lock()?
            .items
            .values()
            .filter(|i| i.device == device)
            .cloned()
            .collect();
        all.sort_by_key(|i| i.id);
        Ok(all)
    }

    async fn create_inventory_item(
        &self,
        new: NewInventoryItem,
    ) -> Result<InventoryItem, Error> {
        let mut inner = self.lock()?;
        let id = inner.next();
        let item = InventoryItem {
            id,
            device: new.device,
            name: new.name,
            serial: new.serial,
            manufacturer: new.manufacturer,
            part_id: new.part_id,
        };
        inner.items.insert(id, item.clone());
        Ok(item)
    }

    async fn delete_inventory_item(&self, id: ObjectId) -> Result<(), Error> {
        self.lock()?.items.remove(&id);
        Ok(())
    }

    async fn module_bay(&self, device: ObjectId, name: &str) -> Result<Option<ModuleBay>, Error> {
        Ok(self
            .lock()?
            .bays
            .values()
            .find(|b| b.device == device && b.name == name)
            .cloned())
    }

    async fn create_module_bay(&self, device: ObjectId, name: &str) -> Result<ModuleBay, Error> {
        let mut inner = self.lock()?;
        let id = inner.next();
        let bay = ModuleBay {
            id,
            device,
            name: name.to_owned(),
        };
        inner.bays.insert(id, bay.clone());
        Ok(bay)
    }

    async fn module_type_by_model(&self, model: &str) -> Result<Option<ModuleType>, Error> {
        Ok(self
            .lock()?
            .module_types
            .values()
            .find(|t| t.model == model)
            .cloned())
    }

    async fn create_module_type(
        &self,
        model: &str,
        manufacturer: &str,
    ) -> Result<ModuleType, Error> {
        let mut inner = self.lock()?;
        let id = inner.next();
        let module_type = ModuleType {
            id,
            model: model.to_owned(),
            manufacturer: manufacturer.to_owned(),
        };
        inner.module_types.insert(id, module_type.clone());
        Ok(module_type)
    }

    async fn module_in_bay(
        &self,
        device: ObjectId,
        bay: ObjectId,
    ) -> Result<Option<Module>, Error> {
        Ok(self
            .lock()?
            .modules
            .values()
            .find(|m| m.device == device && m.module_bay == bay)
            .cloned())
    }

    async fn device_modules(&self, device: ObjectId) -> Result<Vec<Module>, Error> {
        let mut all: Vec<_> = self
            .lock()?
            .modules
            .values()
            .filter(|m| m.device == device)
            .cloned()
            .collect();
        all.sort_by_key(|m| m.id);
        Ok(all)
    }

    async fn create_module(&self, new: NewModule) -> Result<Module, Error> {
        let mut inner = self.lock()?;
        let id = inner.next();
        let module = Module {
            id,
            device: new.device,
            module_bay: new.module_bay,
            module_type: new.module_type,
            serial: new.serial,
        };
        inner.modules.insert(id, module.clone());
        Ok(module)
    }

    async fn update_module(&self, module: &Module) -> Result<(), Error> {
        let mut inner = self.lock()?;
        if !inner.modules.contains_key(&module.id) {
            return Err(Error::store(format!("no module with id {}", module.id)));
        }
        inner.modules.insert(module.id, module.clone());
        Ok(())
    }

    async fn delete_module(&self, id: ObjectId) -> Result<(), Error> {
        self.lock()?.modules.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cable_between_is_unordered() {
        let store = MemoryStore::new();
        let a = ObjectId(10);
        let b = ObjectId(20);
        store.create_cable(a, b, CableStatus::Connected).await.unwrap();

        assert!(store.cable_between(a, b).await.unwrap().is_some());
        assert!(store.cable_between(b, a).await.unwrap().is_some());
        assert!(store.cable_between(a, ObjectId(30)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_cable_rejects_virtual_endpoint() {
        let store = MemoryStore::new();
        let iface = store
            .create_interface(NewInterface {
                device: ObjectId(1),
                name: "Vlan10".into(),
                if_type: InterfaceType::Virtual,
                enabled: true,
                mtu: None,
                description: String::new(),
            })
            .await
            .unwrap();

        let err = store
            .create_cable(iface.id, ObjectId(99), CableStatus::Connected)
            .await
            .unwrap_err();
        assert!(err.is_conflict(), "expected Conflict, got: {err:?}");
    }

    #[tokio::test]
    async fn creates_do_not_deduplicate() {
        let store = MemoryStore::new();
        store.create_vlan(10, "USERS").await.unwrap();
        store.create_vlan(10, "USERS").await.unwrap();
        assert_eq!(store.vlans().unwrap().len(), 2);
    }
}
