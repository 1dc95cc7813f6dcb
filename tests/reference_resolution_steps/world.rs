//! Shared world state for reference resolution BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use crate::test_helpers::ApiAdapter;
use mockable::DefaultClock;
use referentials::reference::{
    error::ReferenceError,
    services::{Reference, ReferenceRegistry},
};
use rstest::fixture;

/// Scenario world for reference resolution behaviour tests.
pub struct ResolutionWorld {
    /// Registry holding the scenario's references.
    pub registry: ReferenceRegistry,
    /// Adapters registered by label, kept for unregistration.
    pub adapters: HashMap<String, Arc<ApiAdapter>>,
    /// Name of the last resolved component, or the resolution error.
    pub last_resolution: Option<Result<String, ReferenceError>>,
    /// Outcome of the last subscription attempt.
    pub last_subscription: Option<Result<(), ReferenceError>>,
}

impl ResolutionWorld {
    /// Creates a world with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: ReferenceRegistry::with_clock(Arc::new(DefaultClock)),
            adapters: HashMap::new(),
            last_resolution: None,
            last_subscription: None,
        }
    }

    /// Looks up a reference by `service` or `service@version`.
    pub fn reference(&self, key: &str) -> Result<Arc<Reference>, eyre::Report> {
        let (service, version) = key
            .split_once('@')
            .map_or((key, None), |(service, version)| (service, Some(version)));
        self.registry
            .get_reference(service, version)
            .map_err(|err| eyre::eyre!("reference '{key}' not declared: {err}"))
    }

    /// Returns the recorded resolution outcome.
    pub fn resolution(&self) -> Result<&Result<String, ReferenceError>, eyre::Report> {
        self.last_resolution
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing resolution result in scenario world"))
    }
}

impl Default for ResolutionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ResolutionWorld {
    ResolutionWorld::default()
}
