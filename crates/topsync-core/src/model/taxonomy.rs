// ── Taxonomy entities ──
//
// Auxiliary classification records referenced by devices and interfaces.
// All are keyed by a normalized slug and auto-created on first reference
// with placeholder values.

use serde::{Deserialize, Serialize};

use super::entity_id::ObjectId;

/// A physical location. Devices inherit their site from the subnet of
/// their management address, falling back to the `unknown` site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
}

/// An operating-system platform (e.g. `c3750`, `c9300`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
}

/// A hardware model (chassis).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceType {
    pub id: ObjectId,
    pub model: String,
    pub slug: String,
    pub manufacturer: ObjectId,
}

/// A functional role, auto-created from advertised neighbor
/// capabilities with a palette color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRole {
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
    /// Lowercase hex without `#`, e.g. `ff6f61`.
    pub color: String,
}
