//! Declarative reference configuration.
//!
//! A [`ReferenceCatalog`] lists references to declare at start-up, so the
//! service/version tree can live in a configuration file instead of code:
//!
//! ```json
//! {
//!   "references": [
//!     { "service": "magento" },
//!     { "version": "1.7", "parent": { "service": "magento" } }
//!   ]
//! }
//! ```
//!
//! Definitions are declared in order, so a parent must appear before its
//! children (or already be in the registry).

use crate::reference::{
    error::{ReferenceError, ReferenceResult},
    services::{Reference, ReferenceRegistry},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Ordered list of reference definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceCatalog {
    /// Definitions, declared in order.
    #[serde(default)]
    pub references: Vec<ReferenceDefinition>,
}

impl ReferenceCatalog {
    /// Parses a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::InvalidCatalog`] when the document is not a
    /// valid catalog.
    pub fn from_json(document: &str) -> ReferenceResult<Self> {
        serde_json::from_str(document).map_err(ReferenceError::invalid_catalog)
    }
}

/// One reference to declare.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceDefinition {
    /// Service name; inherited from the parent when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Service version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Parent to fall back to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentSelector>,
}

/// Lookup key of an already declared parent reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParentSelector {
    /// Parent service name.
    pub service: String,
    /// Parent version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ReferenceRegistry {
    /// Declares one reference from its definition.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::ReferenceNotFound`] when the parent is not
    /// registered, or any error [`crate::reference::services::ReferenceBuilder::register`]
    /// returns.
    pub fn declare(&self, definition: &ReferenceDefinition) -> ReferenceResult<Arc<Reference>> {
        let mut builder = Reference::builder();
        if let Some(service) = &definition.service {
            builder = builder.service(service.as_str());
        }
        if let Some(version) = &definition.version {
            builder = builder.version(version.as_str());
        }
        if let Some(selector) = &definition.parent {
            let parent = self.get_reference(&selector.service, selector.version.as_deref())?;
            builder = builder.parent(&parent);
        }
        builder.register(self)
    }

    /// Declares every reference in `catalog`, in order.
    ///
    /// Stops at the first failing definition; references declared before it
    /// stay registered.
    ///
    /// # Errors
    ///
    /// See [`ReferenceRegistry::declare`].
    pub fn load_catalog(&self, catalog: &ReferenceCatalog) -> ReferenceResult<Vec<Arc<Reference>>> {
        catalog
            .references
            .iter()
            .map(|definition| self.declare(definition))
            .collect()
    }
}
