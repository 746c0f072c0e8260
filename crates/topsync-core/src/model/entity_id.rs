// ── Core identity type ──
//
// Every stored entity is addressed by a store-generated integral id.
// The newtype keeps device ids, interface ids, and address ids from
// being swapped silently at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-generated identifier for any inventory entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}
