// ── Store seam ──
//
// The asynchronous CRUD surface of the topology inventory service.
// Lookups are exact-match; creates do not deduplicate — reconcilers own
// dedup via lookup-then-write. Lookup-then-create is not atomic: a
// concurrent external writer can slip between the read and the write.
// That residual race is a documented property of this seam, not hidden
// behind it.

use crate::error::Error;
use crate::model::{
    Cable, CableStatus, CustomFields, Device, DeviceRole, DeviceStatus, DeviceType, Interface,
    InterfaceType, InventoryItem, IpAddress, IpStatus, Module, ModuleBay, ModuleType, ObjectId,
    Platform, Prefix, Site, Vlan,
};

pub mod memory;

/// Creation fields for a device. The store generates the id.
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub name: String,
    pub device_type: ObjectId,
    pub platform: Option<ObjectId>,
    pub role: Option<ObjectId>,
    pub serial: String,
    pub site: ObjectId,
    pub status: DeviceStatus,
    pub custom_fields: CustomFields,
}

/// Creation fields for an interface.
#[derive(Debug, Clone)]
pub struct NewInterface {
    pub device: ObjectId,
    pub name: String,
    pub if_type: InterfaceType,
    pub enabled: bool,
    pub mtu: Option<u32>,
    pub description: String,
}

/// Creation fields for an IP address.
#[derive(Debug, Clone)]
pub struct NewIpAddress {
    pub address: String,
    pub status: IpStatus,
    pub description: String,
}

/// Creation fields for an inventory item.
#[derive(Debug, Clone)]
pub struct NewInventoryItem {
    pub device: ObjectId,
    pub name: String,
    pub serial: String,
    pub manufacturer: Option<String>,
    pub part_id: String,
}

/// Creation fields for a seated module.
#[derive(Debug, Clone)]
pub struct NewModule {
    pub device: ObjectId,
    pub module_bay: ObjectId,
    pub module_type: ObjectId,
    pub serial: String,
}

/// CRUD access to the topology inventory, one method per lookup or
/// mutation the reconcilers need.
///
/// Implementations: [`memory::MemoryStore`] (in-process, tests and dry
/// runs) and `topsync_api::NetBoxStore` (REST).
#[allow(async_fn_in_trait)]
pub trait Store {
    // ── Taxonomy ─────────────────────────────────────────────────────

    async fn site_by_slug(&self, slug: &str) -> Result<Option<Site>, Error>;
    async fn create_site(&self, name: &str, slug: &str) -> Result<Site, Error>;

    async fn platform_by_slug(&self, slug: &str) -> Result<Option<Platform>, Error>;
    async fn create_platform(&self, name: &str, slug: &str) -> Result<Platform, Error>;

    async fn device_type_by_slug(&self, slug: &str) -> Result<Option<DeviceType>, Error>;
    async fn create_device_type(&self, model: &str, slug: &str) -> Result<DeviceType, Error>;

    async fn role_by_slug(&self, slug: &str) -> Result<Option<DeviceRole>, Error>;
    async fn create_role(&self, name: &str, slug: &str, color: &str)
    -> Result<DeviceRole, Error>;

    /// Exact-match prefix lookup by CIDR. The engine never creates
    /// prefixes.
    async fn prefix_by_cidr(&self, cidr: &str) -> Result<Option<Prefix>, Error>;

    // ── Devices ──────────────────────────────────────────────────────

    async fn device_by_name(&self, name: &str) -> Result<Option<Device>, Error>;
    async fn create_device(&self, new: NewDevice) -> Result<Device, Error>;
    async fn update_device(&self, device: &Device) -> Result<(), Error>;

    // ── Interfaces ───────────────────────────────────────────────────

    async fn interface(&self, device: ObjectId, name: &str) -> Result<Option<Interface>, Error>;
    async fn create_interface(&self, new: NewInterface) -> Result<Interface, Error>;
    async fn update_interface(&self, iface: &Interface) -> Result<(), Error>;

    // ── Addresses ────────────────────────────────────────────────────

    async fn ip_by_address(&self, address: &str) -> Result<Option<IpAddress>, Error>;
    async fn create_ip(&self, new: NewIpAddress) -> Result<IpAddress, Error>;
    async fn update_ip(&self, ip: &IpAddress) -> Result<(), Error>;

    // ── VLANs ────────────────────────────────────────────────────────

    async fn vlan_by_vid(&self, vid: u16) -> Result<Option<Vlan>, Error>;
    async fn create_vlan(&self, vid: u16, name: &str) -> Result<Vlan, Error>;
    async fn update_vlan(&self, vlan: &Vlan) -> Result<(), Error>;

    // ── Cables ───────────────────────────────────────────────────────

    /// Lookup by unordered endpoint pair: `cable_between(a, b)` and
    /// `cable_between(b, a)` must return the same record.
    async fn cable_between(&self, a: ObjectId, b: ObjectId) -> Result<Option<Cable>, Error>;
    /// All cables with a termination at the given interface.
    async fn cables_terminating_at(&self, iface: ObjectId) -> Result<Vec<Cable>, Error>;
    async fn all_cables(&self) -> Result<Vec<Cable>, Error>;
    /// May fail with [`Error::Conflict`] when an endpoint's media type
    /// cannot terminate a cable.
    async fn create_cable(
        &self,
        a: ObjectId,
        b: ObjectId,
        status: CableStatus,
    ) -> Result<Cable, Error>;
    async fn update_cable(&self, cable: &Cable) -> Result<(), Error>;
    async fn delete_cable(&self, id: ObjectId) -> Result<(), Error>;

    // ── Hardware inventory ───────────────────────────────────────────

    async fn inventory_items(&self, device: ObjectId) -> Result<Vec<InventoryItem>, Error>;
    async fn create_inventory_item(&self, new: NewInventoryItem)
    -> Result<InventoryItem, Error>;
    async fn delete_inventory_item(&self, id: ObjectId) -> Result<(), Error>;

    async fn module_bay(&self, device: ObjectId, name: &str) -> Result<Option<ModuleBay>, Error>;
    async fn create_module_bay(&self, device: ObjectId, name: &str) -> Result<ModuleBay, Error>;

    async fn module_type_by_model(&self, model: &str) -> Result<Option<ModuleType>, Error>;
    async fn create_module_type(
        &self,
        model: &str,
        manufacturer: &str,
    ) -> Result<ModuleType, Error>;

    async fn module_in_bay(&self, device: ObjectId, bay: ObjectId)
    -> Result<Option<Module>, Error>;
    async fn device_modules(&self, device: ObjectId) -> Result<Vec<Module>, Error>;
    async fn create_module(&self, new: NewModule) -> Result<Module, Error>;
    async fn update_module(&self, module: &Module) -> Result<(), Error>;
    async fn delete_module(&self, id: ObjectId) -> Result<(), Error>;
}
