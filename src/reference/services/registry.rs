//! Registry of declared references.
//!
//! Provides [`ReferenceRegistry`], which owns every declared [`Reference`]
//! and finds one by service and version. Registration is expected to happen
//! during start-up; lookups afterwards only take read locks.

use crate::reference::{
    domain::{ReferenceId, ReferenceKey},
    error::{ReferenceError, ReferenceResult},
    services::Reference,
};
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, LazyLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

/// Process-wide registry, created on first use and never torn down.
static GLOBAL_REGISTRY: LazyLock<ReferenceRegistry> = LazyLock::new(ReferenceRegistry::new);

/// Serializable snapshot of a reference and its own registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSummary {
    /// Reference identifier.
    pub id: ReferenceId,
    /// Lookup key.
    pub key: ReferenceKey,
    /// Parent lookup key, if the reference has a parent.
    pub parent: Option<ReferenceKey>,
    /// Declaration timestamp.
    pub declared_at: DateTime<Utc>,
    /// Name of the binder registered on this reference.
    pub binder: Option<String>,
    /// Names of synchronizers registered on this reference.
    pub synchronizers: Vec<String>,
    /// Names of mappers registered on this reference.
    pub mappers: Vec<String>,
    /// Names of backend adapters registered on this reference.
    pub backend_adapters: Vec<String>,
}

/// Owner and lookup index of declared references.
///
/// Keys are not required to be unique. When two references share a key, the
/// one declared first wins every lookup and a warning is logged.
pub struct ReferenceRegistry {
    references: RwLock<Vec<Arc<Reference>>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl ReferenceRegistry {
    /// Creates an empty registry using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Creates an empty registry stamping declarations with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            references: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Returns the process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL_REGISTRY
    }

    /// Current time according to the registry clock.
    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Adds `reference` to the registry.
    ///
    /// Adding the same instance again has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::LockPoisoned`] when the registry lock is
    /// poisoned.
    pub fn register_reference(&self, reference: Arc<Reference>) -> ReferenceResult<()> {
        let mut references = self.write_references()?;
        if references
            .iter()
            .any(|existing| Arc::ptr_eq(existing, &reference))
        {
            return Ok(());
        }
        if references
            .iter()
            .any(|existing| existing.key() == reference.key())
        {
            warn!(
                key = %reference.key(),
                "duplicate reference key; lookups keep returning the earliest declaration"
            );
        }
        references.push(reference);
        Ok(())
    }

    /// Returns the earliest declared reference matching `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::LockPoisoned`] when the registry lock is
    /// poisoned.
    pub fn find(&self, key: &ReferenceKey) -> ReferenceResult<Option<Arc<Reference>>> {
        let references = self.read_references()?;
        Ok(references
            .iter()
            .find(|reference| reference.matches(key.service(), key.version()))
            .cloned())
    }

    /// Returns the reference for `service` and `version`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::Domain`] when the inputs fail validation or
    /// [`ReferenceError::ReferenceNotFound`] when no reference matches.
    pub fn get_reference(
        &self,
        service: &str,
        version: Option<&str>,
    ) -> ReferenceResult<Arc<Reference>> {
        let key = ReferenceKey::parse(service, version)?;
        self.find(&key)?
            .ok_or_else(|| ReferenceError::ReferenceNotFound {
                key: key.to_string(),
            })
    }

    /// Returns all references in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::LockPoisoned`] when the registry lock is
    /// poisoned.
    pub fn references(&self) -> ReferenceResult<Vec<Arc<Reference>>> {
        Ok(self.read_references()?.clone())
    }

    /// Returns the number of declared references.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::LockPoisoned`] when the registry lock is
    /// poisoned.
    pub fn len(&self) -> ReferenceResult<usize> {
        Ok(self.read_references()?.len())
    }

    /// Returns whether no reference has been declared.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::LockPoisoned`] when the registry lock is
    /// poisoned.
    pub fn is_empty(&self) -> ReferenceResult<bool> {
        Ok(self.read_references()?.is_empty())
    }

    /// Returns a snapshot of every reference in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::LockPoisoned`] when a lock is poisoned.
    pub fn summaries(&self) -> ReferenceResult<Vec<ReferenceSummary>> {
        self.references()?
            .iter()
            .map(|reference| reference.summary())
            .collect()
    }

    fn read_references(&self) -> ReferenceResult<RwLockReadGuard<'_, Vec<Arc<Reference>>>> {
        self.references
            .read()
            .map_err(|err| ReferenceError::lock_poisoned(&err))
    }

    fn write_references(&self) -> ReferenceResult<RwLockWriteGuard<'_, Vec<Arc<Reference>>>> {
        self.references
            .write()
            .map_err(|err| ReferenceError::lock_poisoned(&err))
    }
}

impl Default for ReferenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReferenceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceRegistry")
            .field("references", &self.references)
            .finish_non_exhaustive()
    }
}

/// Returns the reference for `service` and `version` from the process-wide
/// registry.
///
/// # Errors
///
/// See [`ReferenceRegistry::get_reference`].
pub fn get_reference(service: &str, version: Option<&str>) -> ReferenceResult<Arc<Reference>> {
    ReferenceRegistry::global().get_reference(service, version)
}
