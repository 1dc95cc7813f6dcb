//! Capability kinds a reference can resolve.

use super::ParseCapabilityKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four capability kinds held by a reference.
///
/// Declaration order is also the classification order used when a component
/// is subscribed without naming its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Maps application records to external identifiers.
    Binder,
    /// Runs a synchronization workflow.
    Synchronizer,
    /// Transforms record fields between representations.
    Mapper,
    /// Talks to the remote API.
    BackendAdapter,
}

impl CapabilityKind {
    /// All kinds in classification order.
    pub const ALL: [Self; 4] = [
        Self::Binder,
        Self::Synchronizer,
        Self::Mapper,
        Self::BackendAdapter,
    ];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binder => "binder",
            Self::Synchronizer => "synchronizer",
            Self::Mapper => "mapper",
            Self::BackendAdapter => "backend_adapter",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CapabilityKind {
    type Error = ParseCapabilityKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "binder" => Ok(Self::Binder),
            "synchronizer" => Ok(Self::Synchronizer),
            "mapper" => Ok(Self::Mapper),
            "backend_adapter" => Ok(Self::BackendAdapter),
            _ => Err(ParseCapabilityKindError(value.to_owned())),
        }
    }
}
