// ── Error taxonomy ──
//
// Four classes with distinct handling policies:
//   Connectivity       — device skipped, no mutation attempted
//   UnsupportedCommand — degraded facts, device processing continues
//   Conflict           — caught at the offending step, pass continues
//   Store / Facts      — abort the current device's pass (fail-fast)

use thiserror::Error;

/// Errors surfaced by collectors, stores, and the reconciliation engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The device could not be reached or rejected our credentials.
    /// The whole device is skipped; nothing is mutated.
    #[error("cannot reach device '{device}': {message}")]
    Connectivity { device: String, message: String },

    /// The device does not support an optional command (e.g. the stack
    /// membership query on a non-stackable platform).
    #[error("device '{device}' does not support '{command}'")]
    UnsupportedCommand { device: String, command: String },

    /// The store rejected a write that violates one of its own rules,
    /// e.g. terminating a cable on a virtual interface. Logged with the
    /// store's message; does not abort the device's remaining steps.
    #[error("store rejected write: {message}")]
    Conflict { message: String },

    /// Collected facts could not be decoded into the fact model.
    #[error("invalid facts for device '{device}': {message}")]
    Facts { device: String, message: String },

    /// Any other store failure. Aborts the current device's pass.
    #[error("store error: {message}")]
    Store { message: String },
}

impl Error {
    pub fn connectivity(device: impl Into<String>, message: impl ToString) -> Self {
        Self::Connectivity {
            device: device.into(),
            message: message.to_string(),
        }
    }

    pub fn conflict(message: impl ToString) -> Self {
        Self::Conflict {
            message: message.to_string(),
        }
    }

    pub fn store(message: impl ToString) -> Self {
        Self::Store {
            message: message.to_string(),
        }
    }

    /// Conflicts are handled locally and never abort a device's pass.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
