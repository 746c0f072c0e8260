// ── NetBox-backed Store ──
//
// Thin endpoint map from the `Store` seam onto the NetBox REST API.
// Every lookup is an exact-match filter; every mutation targets one
// record. Manufacturer records exist only on the wire, so resolving
// them by name happens here rather than in the core model.

use serde::Serialize;

use topsync_core::store::{
    NewDevice, NewInterface, NewInventoryItem, NewIpAddress, NewModule, Store,
};
use topsync_core::{
    Cable, CableStatus, Device, DeviceRole, DeviceType, Error, Interface, InventoryItem,
    IpAddress, Module, ModuleBay, ModuleType, ObjectId, Platform, Prefix, Site, Vlan,
    reconcile::taxonomy::slugify,
};

use crate::NetBoxClient;
use crate::dto;

/// Manufacturer assigned to auto-created device types. Discovery only
/// runs against one vendor's gear.
const DEFAULT_MANUFACTURER: &str = "Cisco";

/// [`Store`] implementation backed by a NetBox instance.
pub struct NetBoxStore {
    client: NetBoxClient,
}

impl NetBoxStore {
    pub fn new(client: NetBoxClient) -> Self {
        Self { client }
    }

    /// Resolve a manufacturer id by name, creating the record on first
    /// reference.
    async fn manufacturer_id(&self, name: &str) -> Result<ObjectId, Error> {
        let slug = slugify(name);
        let found: Option<dto::ManufacturerDto> = self
            .client
            .find_one("dcim/manufacturers/", &[("slug", slug.clone())])
            .await?;
        if let Some(m) = found {
            return Ok(m.id);
        }
        let created: dto::ManufacturerDto = self
            .client
            .post(
                "dcim/manufacturers/",
                &dto::SlugWrite {
                    name,
                    slug: &slug,
                },
            )
            .await?;
        Ok(created.id)
    }
}

impl Store for NetBoxStore {
    // ── Taxonomy ─────────────────────────────────────────────────────

    async fn site_by_slug(&self, slug: &str) -> Result<Option<Site>, Error> {
        Ok(self
            .client
            .find_one("dcim/sites/", &[("slug", slug.to_owned())])
            .await?)
    }

    async fn create_site(&self, name: &str, slug: &str) -> Result<Site, Error> {
        Ok(self
            .client
            .post("dcim/sites/", &dto::SlugWrite { name, slug })
            .await?)
    }

    async fn platform_by_slug(&self, slug: &str) -> Result<Option<Platform>, Error> {
        Ok(self
            .client
            .find_one("dcim/platforms/", &[("slug", slug.to_owned())])
            .await?)
    }

    async fn create_platform(&self, name: &str, slug: &str) -> Result<Platform, Error> {
        Ok(self
            .client
            .post("dcim/platforms/", &dto::SlugWrite { name, slug })
            .await?)
    }

    async fn device_type_by_slug(&self, slug: &str) -> Result<Option<DeviceType>, Error> {
        let found: Option<dto::DeviceTypeDto> = self
            .client
            .find_one("dcim/device-types/", &[("slug", slug.to_owned())])
            .await?;
        Ok(found.map(DeviceType::from))
    }

    async fn create_device_type(&self, model: &str, slug: &str) -> Result<DeviceType, Error> {
        let manufacturer = self.manufacturer_id(DEFAULT_MANUFACTURER).await?;
        let created: dto::DeviceTypeDto = self
            .client
            .post(
                "dcim/device-types/",
                &dto::DeviceTypeWrite {
                    manufacturer,
                    model,
                    slug,
                },
            )
            .await?;
        Ok(created.into())
    }

    async fn role_by_slug(&self, slug: &str) -> Result<Option<DeviceRole>, Error> {
        Ok(self
            .client
            .find_one("dcim/device-roles/", &[("slug", slug.to_owned())])
            .await?)
    }

    async fn create_role(
        &self,
        name: &str,
        slug: &str,
        color: &str,
    ) -> Result<DeviceRole, Error> {
        Ok(self
            .client
            .post("dcim/device-roles/", &dto::RoleWrite { name, slug, color })
            .await?)
    }

    async fn prefix_by_cidr(&self, cidr: &str) -> Result<Option<Prefix>, Error> {
        let found: Option<dto::PrefixDto> = self
            .client
            .find_one("ipam/prefixes/", &[("prefix", cidr.to_owned())])
            .await?;
        Ok(found.map(Prefix::from))
    }

    // ── Devices ──────────────────────────────────────────────────────

    async fn device_by_name(&self, name: &str) -> Result<Option<Device>, Error> {
        let found: Option<dto::DeviceDto> = self
            .client
            .find_one("dcim/devices/", &[("name", name.to_owned())])
            .await?;
        Ok(found.map(Device::from))
    }

    async fn create_device(&self, new: NewDevice) -> Result<Device, Error> {
        let created: dto::DeviceDto = self
            .client
            .post(
                "dcim/devices/",
                &dto::DeviceWrite {
                    name: &new.name,
                    device_type: new.device_type,
                    platform: new.platform,
                    role: new.role,
                    serial: &new.serial,
                    site: new.site,
                    status: new.status,
                    primary_ip4: None,
                    custom_fields: &new.custom_fields,
                },
            )
            .await?;
        Ok(created.into())
    }

    async fn update_device(&self, device: &Device) -> Result<(), Error> {
        let _: dto::DeviceDto = self
            .client
            .patch(
                &format!("dcim/devices/{}/", device.id),
                &dto::DeviceWrite {
                    name: &device.name,
                    device_type: device.device_type,
                    platform: device.platform,
                    role: device.role,
                    serial: &device.serial,
                    site: device.site,
                    status: device.status,
                    primary_ip4: device.primary_ip4,
                    custom_fields: &device.custom_fields,
                },
            )
            .await?;
        Ok(())
    }

    // ── Interfaces ───────────────────────────────────────────────────

    async fn interface(&self, device: ObjectId, name: &str) -> Result<Option<Interface>, Error> {
        let found: Option<dto::InterfaceDto> = self
            .client
            .find_one(
                "dcim/interfaces/",
                &[("device_id", device.to_string()), ("name", name.to_owned())],
            )
            .await?;
        Ok(found.map(Interface::from))
    }

    async fn create_interface(&self, new: NewInterface) -> Result<Interface, Error> {
        let created: dto::InterfaceDto = self
            .client
            .post(
                "dcim/interfaces/",
                &dto::InterfaceWrite {
                    device: new.device,
                    name: &new.name,
                    if_type: new.if_type,
                    enabled: new.enabled,
                    mtu: new.mtu,
                    description: &new.description,
                },
            )
            .await?;
        Ok(created.into())
    }

    async fn update_interface(&self, iface: &Interface) -> Result<(), Error> {
        let _: dto::InterfaceDto = self
            .client
            .patch(
                &format!("dcim/interfaces/{}/", iface.id),
                &dto::InterfaceWrite {
                    device: iface.device,
                    name: &iface.name,
                    if_type: iface.if_type,
                    enabled: iface.enabled,
                    mtu: iface.mtu,
                    description: &iface.description,
                },
            )
            .await?;
        Ok(())
    }

    // ── Addresses ────────────────────────────────────────────────────

    async fn ip_by_address(&self, address: &str) -> Result<Option<IpAddress>, Error> {
        let found: Option<dto::IpAddressDto> = self
            .client
            .find_one("ipam/ip-addresses/", &[("address", address.to_owned())])
            .await?;
        Ok(found.map(IpAddress::from))
    }

    async fn create_ip(&self, new: NewIpAddress) -> Result<IpAddress, Error> {
        let created: dto::IpAddressDto = self
            .client
            .post(
                "ipam/ip-addresses/",
                &dto::IpAddressWrite {
                    address: &new.address,
                    status: new.status,
                    description: &new.description,
                    assigned_object_type: None,
                    assigned_object_id: None,
                },
            )
            .await?;
        Ok(created.into())
    }

    async fn update_ip(&self, ip: &IpAddress) -> Result<(), Error> {
        let _: dto::IpAddressDto = self
            .client
            .patch(
                &format!("ipam/ip-addresses/{}/", ip.id),
                &dto::IpAddressWrite {
                    address: &ip.address,
                    status: ip.status,
                    description: &ip.description,
                    assigned_object_type: ip
                        .assigned_object
                        .as_ref()
                        .map(|a| a.object_type.as_str()),
                    assigned_object_id: ip.assigned_object.as_ref().map(|a| a.object_id),
                },
            )
            .await?;
        Ok(())
    }

    // ── VLANs ────────────────────────────────────────────────────────

    async fn vlan_by_vid(&self, vid: u16) -> Result<Option<Vlan>, Error> {
        Ok(self
            .client
            .find_one("ipam/vlans/", &[("vid", vid.to_string())])
            .await?)
    }

    async fn create_vlan(&self, vid: u16, name: &str) -> Result<Vlan, Error> {
        Ok(self
            .client
            .post("ipam/vlans/", &dto::VlanWrite { vid, name })
            .await?)
    }

    async fn update_vlan(&self, vlan: &Vlan) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
        }

        let _: Vlan = self
            .client
            .patch(
                &format!("ipam/vlans/{}/", vlan.id),
                &Body { name: &vlan.name },
            )
            .await?;
        Ok(())
    }

    // ── Cables ───────────────────────────────────────────────────────

    async fn cable_between(&self, a: ObjectId, b: ObjectId) -> Result<Option<Cable>, Error> {
        // NetBox has no unordered-pair filter, so fetch everything
        // touching one end and match the other locally.
        let candidates = self.cables_terminating_at(a).await?;
        Ok(candidates.into_iter().find(|cable| {
            cable
                .endpoints()
                .is_some_and(|(x, y)| (x, y) == (a, b) || (x, y) == (b, a))
        }))
    }

    async fn cables_terminating_at(&self, iface: ObjectId) -> Result<Vec<Cable>, Error> {
        let mut cables: Vec<Cable> = Vec::new();
        for side in ["termination_a_id", "termination_b_id"] {
            let type_param = side.replace("_id", "_type");
            let found: Vec<dto::CableDto> = self
                .client
                .list_all(
                    "dcim/cables/",
                    &[
                        (side, iface.to_string()),
                        (type_param.as_str(), "dcim.interface".to_owned()),
                    ],
                )
                .await?;
            for record in found {
                let cable = Cable::from(record);
                if !cables.iter().any(|c| c.id == cable.id) {
                    cables.push(cable);
                }
            }
        }
        Ok(cables)
    }

    async fn all_cables(&self) -> Result<Vec<Cable>, Error> {
        let found: Vec<dto::CableDto> = self.client.list_all("dcim/cables/", &[]).await?;
        Ok(found.into_iter().map(Cable::from).collect())
    }

    async fn create_cable(
        &self,
        a: ObjectId,
        b: ObjectId,
        status: CableStatus,
    ) -> Result<Cable, Error> {
        let created: dto::CableDto = self
            .client
            .post(
                "dcim/cables/",
                &dto::CableWrite {
                    a_terminations: vec![dto::TerminationWrite::interface(a)],
                    b_terminations: vec![dto::TerminationWrite::interface(b)],
                    status,
                },
            )
            .await?;
        Ok(created.into())
    }

    async fn update_cable(&self, cable: &Cable) -> Result<(), Error> {
        let _: dto::CableDto = self
            .client
            .patch(
                &format!("dcim/cables/{}/", cable.id),
                &dto::CableWrite {
                    a_terminations: cable
                        .a_terminations
                        .iter()
                        .map(|end| dto::TerminationWrite::interface(end.object_id))
                        .collect(),
                    b_terminations: cable
                        .b_terminations
                        .iter()
                        .map(|end| dto::TerminationWrite::interface(end.object_id))
                        .collect(),
                    status: cable.status,
                },
            )
            .await?;
        Ok(())
    }

    async fn delete_cable(&self, id: ObjectId) -> Result<(), Error> {
        Ok(self.client.delete(&format!("dcim/cables/{id}/")).await?)
    }

    // ── Hardware inventory ───────────────────────────────────────────

    async fn inventory_items(&self, device: ObjectId) -> Result<Vec<InventoryItem>, Error> {
        let found: Vec<dto::InventoryItemDto> = self
            .client
            .list_all("dcim/inventory-items/", &[("device_id", device.to_string())])
            .await?;
        Ok(found.into_iter().map(InventoryItem::from).collect())
    }

    async fn create_inventory_item(
        &self,
        new: NewInventoryItem,
    ) -> Result<InventoryItem, Error> {
        let manufacturer = match &new.manufacturer {
            Some(name) => Some(self.manufacturer_id(name).await?),
            None => None,
        };
        let created: dto::InventoryItemDto = self
            .client
            .post(
                "dcim/inventory-items/",
                &dto::InventoryItemWrite {
                    device: new.device,
                    name: &new.name,
                    serial: &new.serial,
                    manufacturer,
                    part_id: &new.part_id,
                },
            )
            .await?;
        Ok(created.into())
    }

    async fn delete_inventory_item(&self, id: ObjectId) -> Result<(), Error> {
        Ok(self
            .client
            .delete(&format!("dcim/inventory-items/{id}/"))
            .await?)
    }

    async fn module_bay(&self, device: ObjectId, name: &str) -> Result<Option<ModuleBay>, Error> {
        let found: Option<dto::ModuleBayDto> = self
            .client
            .find_one(
                "dcim/module-bays/",
                &[("device_id", device.to_string()), ("name", name.to_owned())],
            )
            .await?;
        Ok(found.map(ModuleBay::from))
    }

    async fn create_module_bay(&self, device: ObjectId, name: &str) -> Result<ModuleBay, Error> {
        let created: dto::ModuleBayDto = self
            .client
            .post("dcim/module-bays/", &dto::ModuleBayWrite { device, name })
            .await?;
        Ok(created.into())
    }

    async fn module_type_by_model(&self, model: &str) -> Result<Option<ModuleType>, Error> {
        let found: Option<dto::ModuleTypeDto> = self
            .client
            .find_one("dcim/module-types/", &[("model", model.to_owned())])
            .await?;
        Ok(found.map(ModuleType::from))
    }

    async fn create_module_type(
        &self,
        model: &str,
        manufacturer: &str,
    ) -> Result<ModuleType, Error> {
        let manufacturer = self.manufacturer_id(manufacturer).await?;
        let created: dto::ModuleTypeDto = self
            .client
            .post(
                "dcim/module-types/",
                &dto::ModuleTypeWrite {
                    manufacturer,
                    model,
                },
            )
            .await?;
        Ok(created.into())
    }

    async fn module_in_bay(
        &self,
        device: ObjectId,
        bay: ObjectId,
    ) -> Result<Option<Module>, Error> {
        let found: Option<dto::ModuleDto> = self
            .client
            .find_one(
                "dcim/modules/",
                &[
                    ("device_id", device.to_string()),
                    ("module_bay_id", bay.to_string()),
                ],
            )
            .await?;
        Ok(found.map(Module::from))
    }

    async fn device_modules(&self, device: ObjectId) -> Result<Vec<Module>, Error> {
        let found: Vec<dto::ModuleDto> = self
            .client
            .list_all("dcim/modules/", &[("device_id", device.to_string())])
            .await?;
        Ok(found.into_iter().map(Module::from).collect())
    }

    async fn create_module(&self, new: NewModule) -> Result<Module, Error> {
        let created: dto::ModuleDto = self
            .client
            .post(
                "dcim/modules/",
                &dto::ModuleWrite {
                    device: new.device,
                    module_bay: new.module_bay,
                    module_type: new.module_type,
                    serial: &new.serial,
                },
            )
            .await?;
        Ok(created.into())
    }

    async fn update_module(&self, module: &Module) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            module_type: ObjectId,
            serial: &'a str,
        }

        let _: dto::ModuleDto = self
            .client
            .patch(
                &format!("dcim/modules/{}/", module.id),
                &Body {
                    module_type: module.module_type,
                    serial: &module.serial,
                },
            )
            .await?;
        Ok(())
    }

    async fn delete_module(&self, id: ObjectId) -> Result<(), Error> {
        Ok(self.client.delete(&format!("dcim/modules/{id}/")).await?)
    }
}
