//! Canonical entity types stored in the topology inventory.
//!
//! Every entity carries the store-generated [`ObjectId`] plus the natural
//! key the reconcilers use for lookup (device name, `(device, name)` for
//! interfaces, CIDR for addresses, numeric id for VLANs, slug for taxonomy
//! records). The core never caches these across reconciliation passes; it
//! re-reads before every write.

mod cable;
mod device;
mod entity_id;
mod interface;
mod inventory;
mod ipam;
mod taxonomy;

pub use cable::{Cable, CableEnd, CableStatus};
pub use device::{CustomFields, Device, DeviceStatus};
pub use entity_id::ObjectId;
pub use interface::{Interface, InterfaceType};
pub use inventory::{InventoryItem, Module, ModuleBay, ModuleType};
pub use ipam::{AssignedObject, IpAddress, IpStatus, Prefix, Vlan};
pub use taxonomy::{DeviceRole, DeviceType, Platform, Site};
