//! References: per-service capability tables with parent fallback.
//!
//! A [`Reference`] stands for one external service (optionally pinned to a
//! version) and knows which binder, mappers, synchronizers and backend
//! adapters to use for it. When a lookup finds nothing at a reference's own
//! level it walks up the parent chain, so a versioned reference only has to
//! register what differs from its parent.

use crate::reference::{
    domain::{
        CapabilityKind, MappingDirection, ModelName, ReferenceId, ReferenceKey, ServiceName,
        ServiceVersion, SynchronizationType,
    },
    error::{ReferenceError, ReferenceResult},
    ports::{BackendAdapter, Binder, Capability, Component, Mapper, Synchronizer},
    services::{ReferenceRegistry, ReferenceSummary},
};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use tracing::{debug, warn};

/// Components registered directly on one reference.
///
/// Vectors keep registration order so resolution is deterministic when
/// several candidates match.
#[derive(Default)]
struct Capabilities {
    binder: Option<Arc<dyn Binder>>,
    synchronizers: Vec<Arc<dyn Synchronizer>>,
    mappers: Vec<Arc<dyn Mapper>>,
    backend_adapters: Vec<Arc<dyn BackendAdapter>>,
}

impl Capabilities {
    fn names(&self, kind: CapabilityKind) -> Vec<String> {
        match kind {
            CapabilityKind::Binder => self
                .binder
                .iter()
                .map(|binder| binder.name().to_owned())
                .collect(),
            CapabilityKind::Synchronizer => names_of(&self.synchronizers),
            CapabilityKind::Mapper => names_of(&self.mappers),
            CapabilityKind::BackendAdapter => names_of(&self.backend_adapters),
        }
    }
}

fn names_of<T: Component + ?Sized>(entries: &[Arc<T>]) -> Vec<String> {
    entries.iter().map(|entry| entry.name().to_owned()).collect()
}

/// Compares two components by address, ignoring trait-object metadata.
fn same_component<T: ?Sized, U: ?Sized>(left: &Arc<T>, right: &Arc<U>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(left), Arc::as_ptr(right))
}

/// Appends `entry` unless the same instance is already present.
fn insert_unique<T: ?Sized>(entries: &mut Vec<Arc<T>>, entry: Arc<T>) -> bool {
    if entries.iter().any(|existing| same_component(existing, &entry)) {
        return false;
    }
    entries.push(entry);
    true
}

/// Removes `target` by identity, returning whether it was present.
fn remove_by_identity<T: ?Sized, U: ?Sized>(entries: &mut Vec<Arc<T>>, target: &Arc<U>) -> bool {
    let before = entries.len();
    entries.retain(|existing| !same_component(existing, target));
    entries.len() != before
}

/// Capability lookup table for one external service and version.
///
/// References are created through [`Reference::builder`] and live in a
/// [`ReferenceRegistry`], which owns them. A child keeps only a weak link to
/// its parent.
///
/// ```
/// use referentials::reference::services::{Reference, ReferenceRegistry};
///
/// let registry = ReferenceRegistry::new();
/// let magento = Reference::builder()
///     .service("magento")
///     .register(&registry)
///     .expect("valid reference");
/// let magento_17 = Reference::builder()
///     .parent(&magento)
///     .version("1.7")
///     .register(&registry)
///     .expect("valid reference");
///
/// assert_eq!(magento_17.service().as_str(), "magento");
/// assert_eq!(magento_17.to_string(), "Reference('magento', '1.7')");
/// ```
pub struct Reference {
    id: ReferenceId,
    key: ReferenceKey,
    inherits_service: bool,
    parent: Option<Weak<Self>>,
    parent_key: Option<ReferenceKey>,
    declared_at: DateTime<Utc>,
    capabilities: RwLock<Capabilities>,
}

impl Reference {
    /// Starts declaring a new reference.
    #[must_use]
    pub fn builder() -> ReferenceBuilder {
        ReferenceBuilder::default()
    }

    /// Returns the reference identifier.
    #[must_use]
    pub const fn id(&self) -> ReferenceId {
        self.id
    }

    /// Returns the registry lookup key.
    #[must_use]
    pub const fn key(&self) -> &ReferenceKey {
        &self.key
    }

    /// Returns the service, either declared here or inherited from the
    /// parent chain.
    #[must_use]
    pub const fn service(&self) -> &ServiceName {
        self.key.service()
    }

    /// Returns the version, if any.
    #[must_use]
    pub const fn version(&self) -> Option<&ServiceVersion> {
        self.key.version()
    }

    /// Returns whether the service was inherited from the parent.
    #[must_use]
    pub const fn inherits_service(&self) -> bool {
        self.inherits_service
    }

    /// Returns the declaration timestamp.
    #[must_use]
    pub const fn declared_at(&self) -> DateTime<Utc> {
        self.declared_at
    }

    /// Returns the parent reference, if one was declared.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::ParentReleased`] when the parent has been
    /// dropped by its owning registry.
    pub fn parent(&self) -> ReferenceResult<Option<Arc<Self>>> {
        self.parent
            .as_ref()
            .map(|weak| {
                weak.upgrade().ok_or_else(|| ReferenceError::ParentReleased {
                    reference: self.to_string(),
                })
            })
            .transpose()
    }

    /// Returns the parent chain, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::ParentReleased`] when any ancestor has been
    /// dropped.
    pub fn ancestors(&self) -> ReferenceResult<Vec<Arc<Self>>> {
        let mut ancestors = Vec::new();
        let mut next = self.parent()?;
        while let Some(ancestor) = next {
            next = ancestor.parent()?;
            ancestors.push(ancestor);
        }
        Ok(ancestors)
    }

    /// Returns whether this reference answers to `service` and `version`.
    ///
    /// Both must be equal; a versioned reference does not match a lookup
    /// without version, and vice versa.
    #[must_use]
    pub fn matches(&self, service: &ServiceName, version: Option<&ServiceVersion>) -> bool {
        self.service() == service && self.version() == version
    }

    /// Resolves the mapper for `model` in `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::CapabilityNotFound`] when neither this
    /// reference nor any ancestor has a matching mapper, or
    /// [`ReferenceError::ParentReleased`] when the chain is broken.
    pub fn get_mapper(
        &self,
        model: &ModelName,
        direction: MappingDirection,
        child_of: Option<&ModelName>,
    ) -> ReferenceResult<Arc<dyn Mapper>> {
        self.resolve(
            CapabilityKind::Mapper,
            || {
                format!(
                    "model: {model}, direction: {direction}, child_of: {}",
                    child_of.map_or("none", ModelName::as_str)
                )
            },
            |capabilities: &Capabilities| capabilities.mappers.clone(),
            |mapper: &Arc<dyn Mapper>| mapper.matches(model, direction, child_of),
        )
    }

    /// Resolves the binder.
    ///
    /// The model is only used in the error message: a reference has a single
    /// binder for all models.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::CapabilityNotFound`] when no binder is
    /// registered along the chain.
    pub fn get_binder(&self, model: &ModelName) -> ReferenceResult<Arc<dyn Binder>> {
        self.resolve(
            CapabilityKind::Binder,
            || format!("model: {model}"),
            |capabilities: &Capabilities| capabilities.binder.iter().cloned().collect(),
            |_: &Arc<dyn Binder>| true,
        )
    }

    /// Resolves the synchronizer for `synchronization_type` and `model`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::CapabilityNotFound`] when no synchronizer
    /// matches along the chain.
    pub fn get_synchronizer(
        &self,
        synchronization_type: &SynchronizationType,
        model: &ModelName,
    ) -> ReferenceResult<Arc<dyn Synchronizer>> {
        self.resolve(
            CapabilityKind::Synchronizer,
            || format!("synchronization type: {synchronization_type}, model: {model}"),
            |capabilities: &Capabilities| capabilities.synchronizers.clone(),
            |synchronizer: &Arc<dyn Synchronizer>| {
                synchronizer.matches(synchronization_type, model)
            },
        )
    }

    /// Resolves the backend adapter for `model`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::CapabilityNotFound`] when no adapter
    /// matches along the chain.
    pub fn get_backend_adapter(&self, model: &ModelName) -> ReferenceResult<Arc<dyn BackendAdapter>> {
        self.resolve(
            CapabilityKind::BackendAdapter,
            || format!("model: {model}"),
            |capabilities: &Capabilities| capabilities.backend_adapters.clone(),
            |adapter: &Arc<dyn BackendAdapter>| adapter.matches(model),
        )
    }

    /// Walks this reference and then its ancestors, returning the first
    /// candidate `accepts` approves.
    fn resolve<T: ?Sized>(
        &self,
        kind: CapabilityKind,
        criteria: impl FnOnce() -> String,
        candidates: impl Fn(&Capabilities) -> Vec<Arc<T>>,
        accepts: impl Fn(&Arc<T>) -> bool,
    ) -> ReferenceResult<Arc<T>> {
        if let Some(local) = self.pick(&candidates, &accepts)? {
            return Ok(local);
        }

        let mut next = self.parent()?;
        while let Some(ancestor) = next {
            if let Some(inherited) = ancestor.pick(&candidates, &accepts)? {
                debug!(
                    reference = %self,
                    resolved_on = %ancestor,
                    %kind,
                    "capability resolved through parent chain"
                );
                return Ok(inherited);
            }
            next = ancestor.parent()?;
        }

        Err(ReferenceError::CapabilityNotFound {
            kind,
            reference: self.to_string(),
            criteria: criteria(),
        })
    }

    /// Returns the first local candidate `accepts` approves.
    ///
    /// Candidates are copied out of the table first, so match predicates run
    /// without the lock held and may call back into this reference.
    fn pick<T: ?Sized>(
        &self,
        candidates: &impl Fn(&Capabilities) -> Vec<Arc<T>>,
        accepts: &impl Fn(&Arc<T>) -> bool,
    ) -> ReferenceResult<Option<Arc<T>>> {
        let snapshot = candidates(&*self.read_capabilities()?);
        Ok(snapshot.into_iter().find(|candidate| accepts(candidate)))
    }

    /// Sets the binder, replacing any previously registered one.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::LockPoisoned`] when the capability table
    /// lock is poisoned.
    pub fn register_binder(&self, binder: Arc<dyn Binder>) -> ReferenceResult<()> {
        let name = binder.name().to_owned();
        let previous = self.write_capabilities()?.binder.replace(binder);
        if let Some(replaced) = previous {
            debug!(reference = %self, replaced = replaced.name(), binder = %name, "binder replaced");
        }
        self.trace_registration(CapabilityKind::Binder, &name, true);
        Ok(())
    }

    /// Adds a synchronizer. Registering the same instance twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::LockPoisoned`] when the capability table
    /// lock is poisoned.
    pub fn register_synchronizer(&self, synchronizer: Arc<dyn Synchronizer>) -> ReferenceResult<()> {
        let name = synchronizer.name().to_owned();
        let added = insert_unique(&mut self.write_capabilities()?.synchronizers, synchronizer);
        self.trace_registration(CapabilityKind::Synchronizer, &name, added);
        Ok(())
    }

    /// Adds a mapper. Registering the same instance twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::LockPoisoned`] when the capability table
    /// lock is poisoned.
    pub fn register_mapper(&self, mapper: Arc<dyn Mapper>) -> ReferenceResult<()> {
        let name = mapper.name().to_owned();
        let added = insert_unique(&mut self.write_capabilities()?.mappers, mapper);
        self.trace_registration(CapabilityKind::Mapper, &name, added);
        Ok(())
    }

    /// Adds a backend adapter. Registering the same instance twice is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::LockPoisoned`] when the capability table
    /// lock is poisoned.
    pub fn register_backend_adapter(&self, adapter: Arc<dyn BackendAdapter>) -> ReferenceResult<()> {
        let name = adapter.name().to_owned();
        let added = insert_unique(&mut self.write_capabilities()?.backend_adapters, adapter);
        self.trace_registration(CapabilityKind::BackendAdapter, &name, added);
        Ok(())
    }

    /// Registers an already classified capability.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::LockPoisoned`] when the capability table
    /// lock is poisoned.
    pub fn register(&self, capability: Capability) -> ReferenceResult<()> {
        match capability {
            Capability::Binder(binder) => self.register_binder(binder),
            Capability::Synchronizer(synchronizer) => self.register_synchronizer(synchronizer),
            Capability::Mapper(mapper) => self.register_mapper(mapper),
            Capability::BackendAdapter(adapter) => self.register_backend_adapter(adapter),
        }
    }

    /// Registers `component` under the first capability it declares and
    /// hands it back unchanged.
    ///
    /// Capabilities are checked in the order binder, synchronizer, mapper,
    /// backend adapter.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::UnsupportedComponent`] when the component
    /// declares none of the four capabilities.
    pub fn subscribe<C: Component>(&self, component: Arc<C>) -> ReferenceResult<Arc<C>> {
        let Some(capability) = Capability::classify(&component) else {
            warn!(
                reference = %self,
                component = component.name(),
                "rejected component without a known capability"
            );
            return Err(ReferenceError::UnsupportedComponent {
                component: component.name().to_owned(),
                reference: self.to_string(),
            });
        };
        self.register(capability)?;
        Ok(component)
    }

    /// Removes the binder if it is `binder`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::NotRegistered`] when `binder` is not the
    /// registered binder.
    pub fn unregister_binder<B: Binder + ?Sized>(&self, binder: &Arc<B>) -> ReferenceResult<()> {
        let mut capabilities = self.write_capabilities()?;
        let is_current = capabilities
            .binder
            .as_ref()
            .is_some_and(|current| same_component(current, binder));
        if !is_current {
            return Err(self.not_registered(CapabilityKind::Binder, binder.name()));
        }
        capabilities.binder = None;
        drop(capabilities);
        self.trace_removal(CapabilityKind::Binder, binder.name());
        Ok(())
    }

    /// Removes `synchronizer`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::NotRegistered`] when it is not registered
    /// on this reference.
    pub fn unregister_synchronizer<S: Synchronizer + ?Sized>(
        &self,
        synchronizer: &Arc<S>,
    ) -> ReferenceResult<()> {
        let removed =
            remove_by_identity(&mut self.write_capabilities()?.synchronizers, synchronizer);
        self.finish_removal(CapabilityKind::Synchronizer, synchronizer.name(), removed)
    }

    /// Removes `mapper`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::NotRegistered`] when it is not registered
    /// on this reference.
    pub fn unregister_mapper<M: Mapper + ?Sized>(&self, mapper: &Arc<M>) -> ReferenceResult<()> {
        let removed = remove_by_identity(&mut self.write_capabilities()?.mappers, mapper);
        self.finish_removal(CapabilityKind::Mapper, mapper.name(), removed)
    }

    /// Removes `adapter`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::NotRegistered`] when it is not registered
    /// on this reference.
    pub fn unregister_backend_adapter<A: BackendAdapter + ?Sized>(
        &self,
        adapter: &Arc<A>,
    ) -> ReferenceResult<()> {
        let removed = remove_by_identity(&mut self.write_capabilities()?.backend_adapters, adapter);
        self.finish_removal(CapabilityKind::BackendAdapter, adapter.name(), removed)
    }

    /// Returns the names of components of `kind` registered on this
    /// reference itself, in registration order. Ancestors are not included.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::LockPoisoned`] when the capability table
    /// lock is poisoned.
    pub fn registered(&self, kind: CapabilityKind) -> ReferenceResult<Vec<String>> {
        Ok(self.read_capabilities()?.names(kind))
    }

    /// Returns a serializable snapshot of this reference.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::LockPoisoned`] when the capability table
    /// lock is poisoned.
    pub fn summary(&self) -> ReferenceResult<ReferenceSummary> {
        let capabilities = self.read_capabilities()?;
        Ok(ReferenceSummary {
            id: self.id,
            key: self.key.clone(),
            parent: self.parent_key.clone(),
            declared_at: self.declared_at,
            binder: capabilities.binder.as_ref().map(|b| b.name().to_owned()),
            synchronizers: capabilities.names(CapabilityKind::Synchronizer),
            mappers: capabilities.names(CapabilityKind::Mapper),
            backend_adapters: capabilities.names(CapabilityKind::BackendAdapter),
        })
    }

    fn read_capabilities(&self) -> ReferenceResult<RwLockReadGuard<'_, Capabilities>> {
        self.capabilities
            .read()
            .map_err(|err| ReferenceError::lock_poisoned(&err))
    }

    fn write_capabilities(&self) -> ReferenceResult<RwLockWriteGuard<'_, Capabilities>> {
        self.capabilities
            .write()
            .map_err(|err| ReferenceError::lock_poisoned(&err))
    }

    fn finish_removal(
        &self,
        kind: CapabilityKind,
        component: &str,
        removed: bool,
    ) -> ReferenceResult<()> {
        if !removed {
            return Err(self.not_registered(kind, component));
        }
        self.trace_removal(kind, component);
        Ok(())
    }

    fn not_registered(&self, kind: CapabilityKind, component: &str) -> ReferenceError {
        ReferenceError::NotRegistered {
            kind,
            component: component.to_owned(),
            reference: self.to_string(),
        }
    }

    fn trace_registration(&self, kind: CapabilityKind, component: &str, added: bool) {
        debug!(reference = %self, %kind, component, added, "component registered");
    }

    fn trace_removal(&self, kind: CapabilityKind, component: &str) {
        debug!(reference = %self, %kind, component, "component unregistered");
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version() {
            Some(version) => write!(f, "Reference('{}', '{version}')", self.service()),
            None => write!(f, "Reference('{}')", self.service()),
        }
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("parent", &self.parent_key)
            .field("declared_at", &self.declared_at)
            .finish_non_exhaustive()
    }
}

/// Builder declaring a [`Reference`] into a registry.
#[derive(Debug, Clone, Default)]
pub struct ReferenceBuilder {
    service: Option<String>,
    version: Option<String>,
    parent: Option<Arc<Reference>>,
}

impl ReferenceBuilder {
    /// Sets the service name. Optional when a parent is given.
    #[must_use]
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Sets the service version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the parent reference consulted when a lookup misses.
    #[must_use]
    pub fn parent(mut self, parent: &Arc<Reference>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Validates the declaration and registers the new reference into
    /// `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::MissingService`] when neither a service nor
    /// a parent was given, or [`ReferenceError::Domain`] when the service or
    /// version fails validation.
    pub fn register(self, registry: &ReferenceRegistry) -> ReferenceResult<Arc<Reference>> {
        let Self {
            service,
            version,
            parent,
        } = self;

        let (service_name, inherits_service) = match (service, parent.as_ref()) {
            (Some(raw), _) => (ServiceName::new(raw)?, false),
            (None, Some(parent_reference)) => (parent_reference.service().clone(), true),
            (None, None) => return Err(ReferenceError::MissingService),
        };
        let service_version = version.map(ServiceVersion::new).transpose()?;

        let reference = Arc::new(Reference {
            id: ReferenceId::new(),
            key: ReferenceKey::new(service_name, service_version),
            inherits_service,
            parent: parent.as_ref().map(Arc::downgrade),
            parent_key: parent.as_ref().map(|p| p.key().clone()),
            declared_at: registry.now(),
            capabilities: RwLock::default(),
        });

        registry.register_reference(Arc::clone(&reference))?;
        debug!(reference = %reference, id = %reference.id, "reference declared");
        Ok(reference)
    }

    /// Registers the new reference into the process-wide registry.
    ///
    /// # Errors
    ///
    /// See [`ReferenceBuilder::register`].
    pub fn register_global(self) -> ReferenceResult<Arc<Reference>> {
        self.register(ReferenceRegistry::global())
    }
}
