// ── Wire shapes for the NetBox REST API ──
//
// Read responses nest foreign keys as objects and wrap choice fields in
// `{"value": ..., "label": ...}`; write payloads send bare ids and raw
// choice values. Conversions into the core model live here so the store
// stays a thin endpoint map.

use serde::{Deserialize, Serialize};

use topsync_core::{
    AssignedObject, Cable, CableEnd, CableStatus, CustomFields, Device, DeviceStatus, DeviceType,
    Interface, InterfaceType, InventoryItem, IpAddress, IpStatus, Module, ModuleBay, ModuleType,
    ObjectId, Prefix,
};

// ── Envelopes ─────────────────────────────────────────────────────────

/// Standard NetBox list envelope.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub results: Vec<T>,
}

/// A nested foreign-key reference.
#[derive(Debug, Clone, Deserialize)]
pub struct Ref {
    pub id: ObjectId,
}

/// A foreign-key reference that also carries the record name.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub id: ObjectId,
    pub name: String,
}

/// Choice fields come back as `{"value": ..., "label": ...}`; only the
/// value matters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Choice<T> {
    pub value: T,
}

// ── Read shapes ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeviceDto {
    pub id: ObjectId,
    pub name: String,
    pub device_type: Ref,
    #[serde(default)]
    pub platform: Option<Ref>,
    #[serde(default)]
    pub role: Option<Ref>,
    #[serde(default)]
    pub serial: String,
    pub site: Ref,
    pub status: Choice<DeviceStatus>,
    #[serde(default)]
    pub primary_ip4: Option<Ref>,
    #[serde(default)]
    pub custom_fields: CustomFields,
}

impl From<DeviceDto> for Device {
    fn from(dto: DeviceDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            device_type: dto.device_type.id,
            platform: dto.platform.map(|r| r.id),
            role: dto.role.map(|r| r.id),
            serial: dto.serial,
            site: dto.site.id,
            status: dto.status.value,
            primary_ip4: dto.primary_ip4.map(|r| r.id),
            custom_fields: dto.custom_fields,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InterfaceDto {
    pub id: ObjectId,
    pub device: Ref,
    pub name: String,
    #[serde(rename = "type")]
    pub if_type: Choice<InterfaceType>,
    pub enabled: bool,
    #[serde(default)]
    pub mtu: Option<u32>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
}

impl From<InterfaceDto> for Interface {
    fn from(dto: InterfaceDto) -> Self {
        Self {
            id: dto.id,
            device: dto.device.id,
            name: dto.name,
            if_type: dto.if_type.value,
            enabled: dto.enabled,
            mtu: dto.mtu,
            label: dto.label,
            description: dto.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IpAddressDto {
    pub id: ObjectId,
    pub address: String,
    pub status: Choice<IpStatus>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assigned_object_type: Option<String>,
    #[serde(default)]
    pub assigned_object_id: Option<ObjectId>,
}

impl From<IpAddressDto> for IpAddress {
    fn from(dto: IpAddressDto) -> Self {
        let assigned_object = match (dto.assigned_object_type, dto.assigned_object_id) {
            (Some(object_type), Some(object_id)) => Some(AssignedObject {
                object_type,
                object_id,
            }),
            _ => None,
        };
        Self {
            id: dto.id,
            address: dto.address,
            status: dto.status.value,
            description: dto.description,
            assigned_object,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PrefixDto {
    pub id: ObjectId,
    pub prefix: String,
    #[serde(default)]
    pub site: Option<Ref>,
}

impl From<PrefixDto> for Prefix {
    fn from(dto: PrefixDto) -> Self {
        Self {
            id: dto.id,
            prefix: dto.prefix,
            site: dto.site.map(|r| r.id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeviceTypeDto {
    pub id: ObjectId,
    pub model: String,
    pub slug: String,
    pub manufacturer: Ref,
}

impl From<DeviceTypeDto> for DeviceType {
    fn from(dto: DeviceTypeDto) -> Self {
        Self {
            id: dto.id,
            model: dto.model,
            slug: dto.slug,
            manufacturer: dto.manufacturer.id,
        }
    }
}

// Termination entries carry extra link fields we ignore; `CableEnd`
// deserializes the two we keep.
#[derive(Debug, Deserialize)]
pub struct CableDto {
    pub id: ObjectId,
    #[serde(default)]
    pub a_terminations: Vec<CableEnd>,
    #[serde(default)]
    pub b_terminations: Vec<CableEnd>,
    pub status: Choice<CableStatus>,
}

impl From<CableDto> for Cable {
    fn from(dto: CableDto) -> Self {
        Self {
            id: dto.id,
            a_terminations: dto.a_terminations,
            b_terminations: dto.b_terminations,
            status: dto.status.value,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InventoryItemDto {
    pub id: ObjectId,
    pub device: Ref,
    pub name: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub manufacturer: Option<NamedRef>,
    #[serde(default)]
    pub part_id: String,
}

impl From<InventoryItemDto> for InventoryItem {
    fn from(dto: InventoryItemDto) -> Self {
        Self {
            id: dto.id,
            device: dto.device.id,
            name: dto.name,
            serial: dto.serial,
            manufacturer: dto.manufacturer.map(|r| r.name),
            part_id: dto.part_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ModuleBayDto {
    pub id: ObjectId,
    pub device: Ref,
    pub name: String,
}

impl From<ModuleBayDto> for ModuleBay {
    fn from(dto: ModuleBayDto) -> Self {
        Self {
            id: dto.id,
            device: dto.device.id,
            name: dto.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ModuleTypeDto {
    pub id: ObjectId,
    pub model: String,
    pub manufacturer: NamedRef,
}

impl From<ModuleTypeDto> for ModuleType {
    fn from(dto: ModuleTypeDto) -> Self {
        Self {
            id: dto.id,
            model: dto.model,
            manufacturer: dto.manufacturer.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ModuleDto {
    pub id: ObjectId,
    pub device: Ref,
    pub module_bay: Ref,
    pub module_type: Ref,
    #[serde(default)]
    pub serial: String,
}

impl From<ModuleDto> for Module {
    fn from(dto: ModuleDto) -> Self {
        Self {
            id: dto.id,
            device: dto.device.id,
            module_bay: dto.module_bay.id,
            module_type: dto.module_type.id,
            serial: dto.serial,
        }
    }
}

/// Manufacturer records are internal to the store; the core model never
/// references them directly.
#[derive(Debug, Deserialize)]
pub struct ManufacturerDto {
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
}

// ── Write shapes ──────────────────────────────────────────────────────

/// Name-and-slug payload shared by sites, platforms, and manufacturers.
#[derive(Debug, Serialize)]
pub struct SlugWrite<'a> {
    pub name: &'a str,
    pub slug: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DeviceTypeWrite<'a> {
    pub manufacturer: ObjectId,
    pub model: &'a str,
    pub slug: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RoleWrite<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub color: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DeviceWrite<'a> {
    pub name: &'a str,
    pub device_type: ObjectId,
    pub platform: Option<ObjectId>,
    pub role: Option<ObjectId>,
    pub serial: &'a str,
    pub site: ObjectId,
    pub status: DeviceStatus,
    pub primary_ip4: Option<ObjectId>,
    pub custom_fields: &'a CustomFields,
}

#[derive(Debug, Serialize)]
pub struct InterfaceWrite<'a> {
    pub device: ObjectId,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub if_type: InterfaceType,
    pub enabled: bool,
    pub mtu: Option<u32>,
    pub description: &'a str,
}

#[derive(Debug, Serialize)]
pub struct IpAddressWrite<'a> {
    pub address: &'a str,
    pub status: IpStatus,
    pub description: &'a str,
    pub assigned_object_type: Option<&'a str>,
    pub assigned_object_id: Option<ObjectId>,
}

#[derive(Debug, Serialize)]
pub struct VlanWrite<'a> {
    pub vid: u16,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TerminationWrite {
    pub object_type: &'static str,
    pub object_id: ObjectId,
}

impl TerminationWrite {
    pub fn interface(id: ObjectId) -> Self {
        Self {
            object_type: "dcim.interface",
            object_id: id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CableWrite {
    pub a_terminations: Vec<TerminationWrite>,
    pub b_terminations: Vec<TerminationWrite>,
    pub status: CableStatus,
}

#[derive(Debug, Serialize)]
pub struct InventoryItemWrite<'a> {
    pub device: ObjectId,
    pub name: &'a str,
    pub serial: &'a str,
    pub manufacturer: Option<ObjectId>,
    pub part_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ModuleBayWrite<'a> {
    pub device: ObjectId,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ModuleTypeWrite<'a> {
    pub manufacturer: ObjectId,
    pub model: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ModuleWrite<'a> {
    pub device: ObjectId,
    pub module_bay: ObjectId,
    pub module_type: ObjectId,
    pub serial: &'a str,
}
