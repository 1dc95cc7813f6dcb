//! Capability contracts resolved by references.
//!
//! Implementations of these traits live outside this crate: they wrap the
//! actual binding, mapping, synchronization and remote-API logic for a given
//! service. A reference only needs each kind's match predicate to decide
//! which implementation applies to a request.

use crate::reference::domain::{
    CapabilityKind, MappingDirection, ModelName, SynchronizationType,
};
use std::sync::Arc;

/// Base contract for anything that can be registered on a reference.
///
/// A component declares which capability it satisfies by overriding the
/// matching `as_*` hook. Hooks are consulted in the order binder,
/// synchronizer, mapper, backend adapter; the first one returning `Some`
/// decides the kind under which [`subscribe`] registers the component.
///
/// ```
/// use referentials::reference::domain::ModelName;
/// use referentials::reference::ports::{BackendAdapter, Component};
/// use std::sync::Arc;
///
/// struct ProductApi;
///
/// impl Component for ProductApi {
///     fn as_backend_adapter(this: &Arc<Self>) -> Option<Arc<dyn BackendAdapter>> {
///         let adapter: Arc<dyn BackendAdapter> = Arc::<Self>::clone(this);
///         Some(adapter)
///     }
/// }
///
/// impl BackendAdapter for ProductApi {
///     fn matches(&self, model: &ModelName) -> bool {
///         model.as_str() == "product.product"
///     }
/// }
/// ```
///
/// [`subscribe`]: crate::reference::services::Reference::subscribe
pub trait Component: Send + Sync + 'static {
    /// Returns a human-readable name used in diagnostics and errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Returns the component as a binder when it implements [`Binder`].
    fn as_binder(_this: &Arc<Self>) -> Option<Arc<dyn Binder>>
    where
        Self: Sized,
    {
        None
    }

    /// Returns the component as a synchronizer when it implements
    /// [`Synchronizer`].
    fn as_synchronizer(_this: &Arc<Self>) -> Option<Arc<dyn Synchronizer>>
    where
        Self: Sized,
    {
        None
    }

    /// Returns the component as a mapper when it implements [`Mapper`].
    fn as_mapper(_this: &Arc<Self>) -> Option<Arc<dyn Mapper>>
    where
        Self: Sized,
    {
        None
    }

    /// Returns the component as a backend adapter when it implements
    /// [`BackendAdapter`].
    fn as_backend_adapter(_this: &Arc<Self>) -> Option<Arc<dyn BackendAdapter>>
    where
        Self: Sized,
    {
        None
    }
}

/// Maps application records to their identifiers in the external service.
///
/// A reference holds at most one binder; it is returned for every model.
pub trait Binder: Component {}

/// Transforms record fields between the application and the external
/// service.
pub trait Mapper: Component {
    /// Returns whether this mapper handles `model` in `direction`.
    ///
    /// `child_of` names the parent model when the mapping is nested inside
    /// another one (e.g. order lines within an order).
    fn matches(
        &self,
        model: &ModelName,
        direction: MappingDirection,
        child_of: Option<&ModelName>,
    ) -> bool;
}

/// Runs a synchronization workflow for a model.
pub trait Synchronizer: Component {
    /// Returns whether this synchronizer handles `synchronization_type` for
    /// `model`.
    fn matches(&self, synchronization_type: &SynchronizationType, model: &ModelName) -> bool;
}

/// Performs remote API calls for a model.
pub trait BackendAdapter: Component {
    /// Returns whether this adapter handles `model`.
    fn matches(&self, model: &ModelName) -> bool;
}

/// A component tagged with the capability it was registered as.
#[derive(Clone)]
pub enum Capability {
    /// A binder.
    Binder(Arc<dyn Binder>),
    /// A synchronizer.
    Synchronizer(Arc<dyn Synchronizer>),
    /// A mapper.
    Mapper(Arc<dyn Mapper>),
    /// A backend adapter.
    BackendAdapter(Arc<dyn BackendAdapter>),
}

impl Capability {
    /// Classifies a component by the first capability hook it answers.
    ///
    /// Returns `None` when the component declares none of the four
    /// capabilities.
    #[must_use]
    pub fn classify<C: Component>(component: &Arc<C>) -> Option<Self> {
        C::as_binder(component)
            .map(Self::Binder)
            .or_else(|| C::as_synchronizer(component).map(Self::Synchronizer))
            .or_else(|| C::as_mapper(component).map(Self::Mapper))
            .or_else(|| C::as_backend_adapter(component).map(Self::BackendAdapter))
    }

    /// Returns the capability kind.
    #[must_use]
    pub const fn kind(&self) -> CapabilityKind {
        match self {
            Self::Binder(_) => CapabilityKind::Binder,
            Self::Synchronizer(_) => CapabilityKind::Synchronizer,
            Self::Mapper(_) => CapabilityKind::Mapper,
            Self::BackendAdapter(_) => CapabilityKind::BackendAdapter,
        }
    }

    /// Returns the wrapped component's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Binder(binder) => binder.name(),
            Self::Synchronizer(synchronizer) => synchronizer.name(),
            Self::Mapper(mapper) => mapper.name(),
            Self::BackendAdapter(adapter) => adapter.name(),
        }
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Capability")
            .field(&self.kind())
            .field(&self.name())
            .finish()
    }
}
