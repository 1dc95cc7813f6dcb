//! Error types for reference declaration, registration and resolution.
//!
//! Uses `thiserror` for typed variants that callers can match on. Every
//! failure is returned synchronously; nothing here is retried.

use super::domain::{CapabilityKind, ReferenceDomainError};
use std::sync::Arc;
use thiserror::Error;

/// Result type for reference operations.
pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Errors returned by references and the reference registry.
#[derive(Debug, Clone, Error)]
pub enum ReferenceError {
    /// A reference was declared with neither a service nor a parent.
    #[error("a reference requires a service or a parent reference")]
    MissingService,

    /// No reference is registered for the requested service and version.
    #[error("no reference found for {key}")]
    ReferenceNotFound {
        /// Requested key in `service` or `service@version` form.
        key: String,
    },

    /// The parent chain was exhausted without a matching capability.
    #[error("no matching {kind} found for {reference} with {criteria}")]
    CapabilityNotFound {
        /// Capability kind that was requested.
        kind: CapabilityKind,
        /// Reference the lookup started from.
        reference: String,
        /// Lookup criteria, for diagnostics.
        criteria: String,
    },

    /// The component declares none of the four capabilities.
    #[error(
        "{component} is not a valid component for {reference}: expected a binder, synchronizer, mapper or backend adapter"
    )]
    UnsupportedComponent {
        /// Component name.
        component: String,
        /// Reference the component was subscribed to.
        reference: String,
    },

    /// The component to unregister is not registered on this reference.
    #[error("{kind} {component} is not registered on {reference}")]
    NotRegistered {
        /// Capability kind of the component.
        kind: CapabilityKind,
        /// Component name.
        component: String,
        /// Reference the removal was attempted on.
        reference: String,
    },

    /// The parent reference has been dropped.
    #[error("parent of {reference} is no longer available")]
    ParentReleased {
        /// Reference whose parent could not be reached.
        reference: String,
    },

    /// A reference catalog could not be parsed.
    #[error("invalid reference catalog: {0}")]
    InvalidCatalog(Arc<dyn std::error::Error + Send + Sync>),

    /// A lock guarding registry state was poisoned.
    #[error("reference state lock poisoned: {0}")]
    LockPoisoned(String),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ReferenceDomainError),
}

impl ReferenceError {
    /// Wraps a catalog parsing error.
    pub fn invalid_catalog(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidCatalog(Arc::new(err))
    }

    /// Wraps a lock poisoning error.
    pub fn lock_poisoned(err: &impl std::fmt::Display) -> Self {
        Self::LockPoisoned(err.to_string())
    }
}
