//! Idempotent reconciliation passes, one module per entity family.
//!
//! Every pass follows the same discipline: look the entity up by its
//! natural key, update in place when the observed facts differ, create
//! when absent. Nothing valid is ever destroyed; the only deletions are
//! inventory items whose serial vanished from the device and cables left
//! half-terminated.

pub mod cables;
pub mod device;
pub mod interface;
pub mod inventory;
pub mod neighbor;
pub mod site;
pub mod taxonomy;
pub mod vlan;
