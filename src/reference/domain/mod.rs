//! Domain model for service references.
//!
//! Value types naming an external service, the version of it a reference
//! targets, and the criteria (model, direction, synchronization type) used
//! when a reference resolves a capability. Everything here is plain data;
//! resolution behaviour lives in the services layer.

mod error;
mod ids;
mod kind;
mod model;
mod service;

pub use error::{ParseCapabilityKindError, ParseMappingDirectionError, ReferenceDomainError};
pub use ids::ReferenceId;
pub use kind::CapabilityKind;
pub use model::{MappingDirection, ModelName, SynchronizationType};
pub use service::{ReferenceKey, ServiceName, ServiceVersion};
