//! Operation selection.
//!
//! Narrows a registry down to the single operation named by the
//! `x86syscall-func` setting. With no setting every entry stays enabled.

use alloc::string::ToString;
use trapbench_common::SelectError;
use trapbench_hal::Settings;

use crate::registry::Registry;

/// Settings key holding the requested operation name.
pub const FUNC_SETTING: &str = "x86syscall-func";

/// Enables only the entry named `requested`.
///
/// Names match exactly and case-sensitively. On failure no flag is touched
/// and the error lists every valid name.
pub fn select(registry: &mut Registry, requested: &str) -> Result<(), SelectError> {
    if registry.get(requested).is_none() {
        return Err(SelectError::InvalidName {
            requested: requested.to_string(),
            valid: registry.names(),
        });
    }
    for entry in registry.iter_mut() {
        let matched = entry.name() == requested;
        entry.set_enabled(matched);
    }
    Ok(())
}

/// Applies the selection stored in `settings`, if there is one.
///
/// An invalid name is logged as an error before being returned.
pub fn select_from_settings<S: Settings + ?Sized>(
    settings: &S,
    registry: &mut Registry,
) -> Result<(), SelectError> {
    let Some(requested) = settings.setting(FUNC_SETTING) else {
        return Ok(());
    };
    select(registry, requested).map_err(|err| {
        log::error!("{}", err);
        err
    })
}
