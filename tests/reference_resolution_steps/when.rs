//! When steps for reference resolution BDD scenarios.

use super::world::ResolutionWorld;
use crate::test_helpers::{ReportExporter, model, synchronization};
use referentials::reference::domain::MappingDirection;
use rstest_bdd_macros::when;
use std::sync::Arc;

#[when(r#"the mapper for model "{name}" is resolved on "{key}""#)]
fn resolve_mapper(world: &mut ResolutionWorld, name: String, key: String) -> Result<(), eyre::Report> {
    let reference = world.reference(&key)?;
    let outcome = reference
        .get_mapper(&model(&name), MappingDirection::Import, None)
        .map(|mapper| mapper.name().to_owned());
    world.last_resolution = Some(outcome);
    Ok(())
}

#[when(r#"the backend adapter for model "{name}" is resolved on "{key}""#)]
fn resolve_adapter(world: &mut ResolutionWorld, name: String, key: String) -> Result<(), eyre::Report> {
    let reference = world.reference(&key)?;
    let outcome = reference
        .get_backend_adapter(&model(&name))
        .map(|adapter| adapter.name().to_owned());
    world.last_resolution = Some(outcome);
    Ok(())
}

#[when(r#"the synchronizer of type "{kind}" for model "{name}" is resolved on "{key}""#)]
fn resolve_synchronizer(
    world: &mut ResolutionWorld,
    kind: String,
    name: String,
    key: String,
) -> Result<(), eyre::Report> {
    let reference = world.reference(&key)?;
    let outcome = reference
        .get_synchronizer(&synchronization(&kind), &model(&name))
        .map(|synchronizer| synchronizer.name().to_owned());
    world.last_resolution = Some(outcome);
    Ok(())
}

#[when(r#"a plain component is subscribed to "{key}""#)]
fn subscribe_plain_component(world: &mut ResolutionWorld, key: String) -> Result<(), eyre::Report> {
    let reference = world.reference(&key)?;
    let outcome = reference.subscribe(Arc::new(ReportExporter)).map(drop);
    world.last_subscription = Some(outcome);
    Ok(())
}

#[when(r#"the adapter "{name}" is unregistered from "{key}""#)]
fn unregister_adapter(world: &mut ResolutionWorld, name: String, key: String) -> Result<(), eyre::Report> {
    let adapter = world
        .adapters
        .get(&name)
        .ok_or_else(|| eyre::eyre!("adapter '{name}' was never registered"))?;
    world
        .reference(&key)?
        .unregister_backend_adapter(adapter)
        .map_err(|err| eyre::eyre!("unregistration failed: {err}"))
}
