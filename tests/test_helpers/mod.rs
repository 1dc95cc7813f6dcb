//! Connector components shared by integration and behaviour tests.
//!
//! Each component carries a label and the criteria it answers to, which is
//! all the resolution layer looks at.

use referentials::reference::{
    domain::{MappingDirection, ModelName, SynchronizationType},
    ports::{BackendAdapter, Binder, Component, Mapper, Synchronizer},
};
use std::sync::Arc;

/// Parses a model name, panicking on invalid test input.
pub fn model(raw: &str) -> ModelName {
    ModelName::new(raw).expect("valid model name")
}

/// Parses a synchronization type, panicking on invalid test input.
pub fn synchronization(raw: &str) -> SynchronizationType {
    SynchronizationType::new(raw).expect("valid synchronization type")
}

/// Binder storing external identifiers for one service.
pub struct ServiceBinder {
    label: String,
}

impl ServiceBinder {
    /// Creates a labelled binder.
    pub fn new(label: &str) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_owned(),
        })
    }
}

impl Component for ServiceBinder {
    fn name(&self) -> &str {
        &self.label
    }

    fn as_binder(this: &Arc<Self>) -> Option<Arc<dyn Binder>> {
        let binder: Arc<dyn Binder> = Arc::<Self>::clone(this);
        Some(binder)
    }
}

impl Binder for ServiceBinder {}

/// Mapper for one model and direction, optionally nested under a parent
/// model.
pub struct RecordMapper {
    label: String,
    model: ModelName,
    direction: MappingDirection,
    child_of: Option<ModelName>,
}

impl RecordMapper {
    /// Creates a top-level mapper.
    pub fn new(label: &str, raw_model: &str, direction: MappingDirection) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_owned(),
            model: model(raw_model),
            direction,
            child_of: None,
        })
    }

    /// Creates a mapper used inside `raw_parent` mappings.
    pub fn nested(
        label: &str,
        raw_model: &str,
        direction: MappingDirection,
        raw_parent: &str,
    ) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_owned(),
            model: model(raw_model),
            direction,
            child_of: Some(model(raw_parent)),
        })
    }
}

impl Component for RecordMapper {
    fn name(&self) -> &str {
        &self.label
    }

    fn as_mapper(this: &Arc<Self>) -> Option<Arc<dyn Mapper>> {
        let mapper: Arc<dyn Mapper> = Arc::<Self>::clone(this);
        Some(mapper)
    }
}

impl Mapper for RecordMapper {
    fn matches(
        &self,
        model: &ModelName,
        direction: MappingDirection,
        child_of: Option<&ModelName>,
    ) -> bool {
        self.model == *model && self.direction == direction && self.child_of.as_ref() == child_of
    }
}

/// Synchronizer for one workflow and model.
pub struct WorkflowSynchronizer {
    label: String,
    synchronization_type: SynchronizationType,
    model: ModelName,
}

impl WorkflowSynchronizer {
    /// Creates a labelled synchronizer.
    pub fn new(label: &str, raw_type: &str, raw_model: &str) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_owned(),
            synchronization_type: synchronization(raw_type),
            model: model(raw_model),
        })
    }
}

impl Component for WorkflowSynchronizer {
    fn name(&self) -> &str {
        &self.label
    }

    fn as_synchronizer(this: &Arc<Self>) -> Option<Arc<dyn Synchronizer>> {
        let synchronizer: Arc<dyn Synchronizer> = Arc::<Self>::clone(this);
        Some(synchronizer)
    }
}

impl Synchronizer for WorkflowSynchronizer {
    fn matches(&self, synchronization_type: &SynchronizationType, model: &ModelName) -> bool {
        self.synchronization_type == *synchronization_type && self.model == *model
    }
}

/// Remote API adapter for one model.
pub struct ApiAdapter {
    label: String,
    model: ModelName,
}

impl ApiAdapter {
    /// Creates a labelled adapter.
    pub fn new(label: &str, raw_model: &str) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_owned(),
            model: model(raw_model),
        })
    }
}

impl Component for ApiAdapter {
    fn name(&self) -> &str {
        &self.label
    }

    fn as_backend_adapter(this: &Arc<Self>) -> Option<Arc<dyn BackendAdapter>> {
        let adapter: Arc<dyn BackendAdapter> = Arc::<Self>::clone(this);
        Some(adapter)
    }
}

impl BackendAdapter for ApiAdapter {
    fn matches(&self, model: &ModelName) -> bool {
        self.model == *model
    }
}

/// Component declaring no capability.
pub struct ReportExporter;

impl Component for ReportExporter {
    fn name(&self) -> &str {
        "report_exporter"
    }
}
