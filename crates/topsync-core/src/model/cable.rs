// ── Cable entity ──

use serde::{Deserialize, Serialize};

use super::entity_id::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum CableStatus {
    Connected,
    Planned,
    Decommissioning,
}

/// One termination of a cable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CableEnd {
    pub object_type: String,
    pub object_id: ObjectId,
}

impl CableEnd {
    pub fn interface(id: ObjectId) -> Self {
        Self {
            object_type: "dcim.interface".to_owned(),
            object_id: id,
        }
    }
}

/// A physical link between two interface endpoints.
///
/// The pair is unordered: at most one cable may exist between any two
/// endpoints regardless of which side was observed as "local" first.
/// Termination lists may be empty on records left half-connected by
/// interrupted operations; the cable GC removes those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cable {
    pub id: ObjectId,
    pub a_terminations: Vec<CableEnd>,
    pub b_terminations: Vec<CableEnd>,
    pub status: CableStatus,
}

impl Cable {
    /// Whether either termination list is empty.
    pub fn is_loose(&self) -> bool {
        self.a_terminations.is_empty() || self.b_terminations.is_empty()
    }

    /// Whether the cable terminates at the given interface on either end.
    pub fn terminates_at(&self, iface: ObjectId) -> bool {
        self.a_terminations
            .iter()
            .chain(&self.b_terminations)
            .any(|end| end.object_id == iface)
    }

    /// The unordered endpoint pair, if both ends carry exactly one
    /// interface termination.
    pub fn endpoints(&self) -> Option<(ObjectId, ObjectId)> {
        match (self.a_terminations.as_slice(), self.b_terminations.as_slice()) {
            ([a], [b]) => Some((a.object_id, b.object_id)),
            _ => None,
        }
    }
}
