//! Application services for reference declaration and capability
//! resolution.

mod catalog;
mod reference;
mod registry;

pub use catalog::{ParentSelector, ReferenceCatalog, ReferenceDefinition};
pub use reference::{Reference, ReferenceBuilder};
pub use registry::{ReferenceRegistry, ReferenceSummary, get_reference};
