//! Referentials: service references for connector frameworks.
//!
//! Connectors that synchronise data with external systems register their
//! components on references, one per service and optionally per version.
//! Lookups walk from the most specific reference up to its parents, so a
//! versioned reference only declares what differs from the generic one.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Validated names, lookup keys and capability kinds
//! - **Ports**: Capability traits that connector components implement
//! - **Services**: References, the registry and catalog loading
//!
//! # Modules
//!
//! - [`reference`]: Reference declaration, registration and resolution

pub mod reference;
