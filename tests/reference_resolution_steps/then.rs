//! Then steps for reference resolution BDD scenarios.

use super::world::ResolutionWorld;
use crate::test_helpers::model;
use referentials::reference::error::ReferenceError;
use rstest_bdd_macros::then;

#[then(r#"the resolved component is "{name}""#)]
fn resolved_component_is(world: &ResolutionWorld, name: String) -> Result<(), eyre::Report> {
    match world.resolution()? {
        Ok(resolved) if *resolved == name => Ok(()),
        other => Err(eyre::eyre!("expected '{name}' to be resolved, got {other:?}")),
    }
}

#[then(r#"the binder on "{key}" is "{name}""#)]
fn binder_on_reference_is(
    world: &ResolutionWorld,
    key: String,
    name: String,
) -> Result<(), eyre::Report> {
    let binder = world
        .reference(&key)?
        .get_binder(&model("res.partner"))
        .map_err(|err| eyre::eyre!("binder lookup failed: {err}"))?;
    if binder.name() != name {
        return Err(eyre::eyre!(
            "expected binder '{name}', found '{}'",
            binder.name()
        ));
    }
    Ok(())
}

#[then("resolution fails with a not found error")]
fn resolution_fails_not_found(world: &ResolutionWorld) -> Result<(), eyre::Report> {
    let result = world.resolution()?;
    if !matches!(result, Err(ReferenceError::CapabilityNotFound { .. })) {
        return Err(eyre::eyre!("expected capability not found, got {result:?}"));
    }
    Ok(())
}

#[then("subscription fails with an unsupported component error")]
fn subscription_fails_unsupported(world: &ResolutionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_subscription
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing subscription result in scenario world"))?;
    if !matches!(result, Err(ReferenceError::UnsupportedComponent { .. })) {
        return Err(eyre::eyre!("expected unsupported component, got {result:?}"));
    }
    Ok(())
}

#[then(r#"unregistering "{name}" from "{key}" again fails"#)]
fn unregistering_again_fails(
    world: &ResolutionWorld,
    name: String,
    key: String,
) -> Result<(), eyre::Report> {
    let adapter = world
        .adapters
        .get(&name)
        .ok_or_else(|| eyre::eyre!("adapter '{name}' was never registered"))?;
    let result = world.reference(&key)?.unregister_backend_adapter(adapter);
    if !matches!(result, Err(ReferenceError::NotRegistered { .. })) {
        return Err(eyre::eyre!("expected not registered error, got {result:?}"));
    }
    Ok(())
}
