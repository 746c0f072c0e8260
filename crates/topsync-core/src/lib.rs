//! Reconciliation engine between observed network state and a topology
//! inventory store.
//!
//! This crate owns the domain model and the synchronization logic for the
//! topsync workspace:
//!
//! - **[`Engine`]** — Per-device orchestrator. Collects a [`DeviceFacts`]
//!   snapshot through a [`Collector`], then runs every reconciler against a
//!   [`Store`] in a fixed order: VLANs → device → interfaces → neighbors →
//!   inventory. Strictly sequential; one device is fully reconciled before
//!   the next begins.
//!
//! - **[`Store`]** — The seam to the inventory service. Exact-match lookups
//!   and non-deduplicating creates; every reconciler is responsible for its
//!   own dedup via lookup-then-write. [`MemoryStore`] is the in-process
//!   implementation used for tests and dry runs; `topsync-api` provides the
//!   REST-backed one.
//!
//! - **Reconcilers** ([`reconcile`]) — Idempotent upsert passes per entity
//!   kind. Safe to re-run indefinitely: a second run against the same facts
//!   creates nothing and changes nothing.
//!
//! - **Fact model** ([`facts`]) — The typed snapshot of one device's
//!   observed state (version block, VLAN table, interface table, neighbor
//!   table, hardware report, stack membership).

pub mod collect;
pub mod error;
pub mod facts;
pub mod model;
pub mod reconcile;
pub mod store;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use collect::{Collector, FileCollector};
pub use error::Error;
pub use facts::{
    DeviceFacts, HardwareReport, InterfaceFacts, ModuleEntry, NeighborFacts, OsFamily, SlotEntry,
    StackFacts, StackMember, VersionFacts,
};
pub use store::memory::MemoryStore;
pub use store::{
    NewDevice, NewInterface, NewIpAddress, NewInventoryItem, NewModule, Store,
};
pub use sync::{DeviceOutcome, Engine, SyncReport};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AssignedObject,
    Cable,
    CableEnd,
    CableStatus,
    CustomFields,
    Device,
    DeviceRole,
    DeviceStatus,
    DeviceType,
    Interface,
    InterfaceType,
    InventoryItem,
    IpAddress,
    IpStatus,
    Module,
    ModuleBay,
    ModuleType,
    ObjectId,
    Platform,
    Prefix,
    Site,
    Vlan,
};
