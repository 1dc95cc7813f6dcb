//! Service references and capability resolution.
//!
//! A reference identifies an external service (Magento, `PrestaShop`,
//! Redmine, ...) and optionally a version of it, and resolves which binder,
//! mapper, synchronizer or backend adapter to use for a given data model.
//! A versioned reference can point at a parent and inherit everything it
//! does not override. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Capability contracts in [`ports`]
//! - Reference, registry and catalog in [`services`]
//! - Errors in [`error`]

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
