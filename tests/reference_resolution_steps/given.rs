//! Given steps for reference resolution BDD scenarios.

use super::world::ResolutionWorld;
use crate::test_helpers::{ApiAdapter, RecordMapper, ServiceBinder, WorkflowSynchronizer};
use eyre::WrapErr;
use referentials::reference::{domain::MappingDirection, services::Reference};
use rstest_bdd_macros::given;
use std::sync::Arc;

#[given(r#"a reference for service "{service}""#)]
fn a_reference_for_service(world: &mut ResolutionWorld, service: String) -> Result<(), eyre::Report> {
    Reference::builder()
        .service(service)
        .register(&world.registry)
        .wrap_err("declare generic reference")?;
    Ok(())
}

#[given(r#"a child reference "{version}" of "{parent}""#)]
fn a_child_reference(
    world: &mut ResolutionWorld,
    version: String,
    parent: String,
) -> Result<(), eyre::Report> {
    let parent_reference = world.reference(&parent)?;
    Reference::builder()
        .parent(&parent_reference)
        .version(version)
        .register(&world.registry)
        .wrap_err("declare versioned reference")?;
    Ok(())
}

#[given(r#"a binder "{name}" registered on "{key}""#)]
fn a_binder_registered(
    world: &mut ResolutionWorld,
    name: String,
    key: String,
) -> Result<(), eyre::Report> {
    world
        .reference(&key)?
        .subscribe(ServiceBinder::new(&name))
        .wrap_err("subscribe binder")?;
    Ok(())
}

#[given(r#"a mapper "{name}" for model "{model}" registered on "{key}""#)]
fn a_mapper_registered(
    world: &mut ResolutionWorld,
    name: String,
    model: String,
    key: String,
) -> Result<(), eyre::Report> {
    world
        .reference(&key)?
        .subscribe(RecordMapper::new(&name, &model, MappingDirection::Import))
        .wrap_err("subscribe mapper")?;
    Ok(())
}

#[given(r#"a synchronizer "{name}" of type "{kind}" for model "{model}" registered on "{key}""#)]
fn a_synchronizer_registered(
    world: &mut ResolutionWorld,
    name: String,
    kind: String,
    model: String,
    key: String,
) -> Result<(), eyre::Report> {
    world
        .reference(&key)?
        .subscribe(WorkflowSynchronizer::new(&name, &kind, &model))
        .wrap_err("subscribe synchronizer")?;
    Ok(())
}

#[given(r#"an adapter "{name}" for model "{model}" registered on "{key}""#)]
fn an_adapter_registered(
    world: &mut ResolutionWorld,
    name: String,
    model: String,
    key: String,
) -> Result<(), eyre::Report> {
    let adapter = world
        .reference(&key)?
        .subscribe(ApiAdapter::new(&name, &model))
        .wrap_err("subscribe adapter")?;
    world.adapters.insert(name, Arc::clone(&adapter));
    Ok(())
}
