//! Loading and unloading profiles into a shell session.
//!
//! Both operations only schedule changes on an [`Environment`]; the caller
//! prints [`Environment::write_statements`] for the shell to evaluate. The
//! names of loaded profiles are tracked in `ENVMANAGER_LOADED`.

use tracing::{debug, info};

use crate::core::constants::{LOADED_PROFILES_VAR, LOADED_SEPARATOR};
use crate::core::environment::Environment;
use crate::core::registry::Registry;
use crate::error::{ProfileError, Result};

/// Profiles currently recorded as loaded in `env`, in load order.
pub fn loaded_profiles(env: &Environment) -> Vec<String> {
    let mut names = Vec::new();
    for name in env.current(LOADED_PROFILES_VAR, "").split(LOADED_SEPARATOR) {
        let name = name.trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

fn track(env: &mut Environment, names: &[String]) -> Result<()> {
    let separator = LOADED_SEPARATOR.to_string();
    env.set(LOADED_PROFILES_VAR, &names.join(separator.as_str()))
}

/// Load `requested` profiles and everything they depend on.
///
/// With no names, the profiles mapped to `cwd` are loaded instead. Each
/// profile is selected once; dependencies follow the profile that pulled
/// them in. Returns the selection in the order it was applied.
///
/// # Errors
///
/// Returns `ProfileError::NoMappingFound` if no names were given and `cwd`
/// is not mapped, and otherwise the first lookup, resolution or storage
/// error. On error `env` may hold a partial set of changes and must not be
/// written out.
pub fn load(
    registry: &Registry,
    env: &mut Environment,
    requested: &[String],
    cwd: &str,
) -> Result<Vec<String>> {
    let requested: Vec<String> = if requested.is_empty() {
        if !registry.has_directory_mapping(cwd) {
            return Err(ProfileError::NoMappingFound(cwd.to_string()).into());
        }
        debug!(cwd = %cwd, "using directory mapping");
        registry.directory_mapping(cwd)?.to_vec()
    } else {
        requested.to_vec()
    };

    let mut selected: Vec<String> = Vec::new();
    for name in &requested {
        let profile = registry.profile(name)?;
        if selected.contains(name) {
            continue;
        }
        selected.push(name.clone());

        for dependency in profile.dependencies(registry, &selected)? {
            if !selected.contains(&dependency) {
                selected.push(dependency);
            }
        }
    }
    debug!(profiles = ?selected, "selected profiles");

    for name in &selected {
        registry.profile(name)?.add_to_environment(registry, env)?;
    }

    let mut tracked = loaded_profiles(env);
    for name in &selected {
        if !tracked.contains(name) {
            tracked.push(name.clone());
        }
    }
    track(env, &tracked)?;

    info!(count = selected.len(), "profiles loaded");
    Ok(selected)
}

/// Unload `requested` profiles, or every loaded profile when `all` is set.
///
/// Dependencies are left alone. Returns the names that were unloaded.
///
/// # Errors
///
/// Returns `ProfileError::NothingToUnload` when no names were given without
/// `all`, and otherwise the first lookup error.
pub fn unload(
    registry: &Registry,
    env: &mut Environment,
    requested: &[String],
    all: bool,
) -> Result<Vec<String>> {
    let mut tracked = loaded_profiles(env);

    let names: Vec<String> = if all {
        tracked.clone()
    } else if requested.is_empty() {
        return Err(ProfileError::NothingToUnload.into());
    } else {
        requested.to_vec()
    };

    for name in &names {
        registry.profile(name)?.remove_from_environment(env)?;
        tracked.retain(|n| n != name);
    }
    track(env, &tracked)?;

    info!(count = names.len(), "profiles unloaded");
    Ok(names)
}
