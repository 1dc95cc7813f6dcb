//! Port contracts for capabilities registered on references.
//!
//! Ports define the infrastructure-agnostic traits that service integrations
//! implement and references resolve.

pub mod capability;

pub use capability::{
    BackendAdapter, Binder, Capability, Component, Mapper, Synchronizer,
};
