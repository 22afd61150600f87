//! Config commands.
//!
//! Create the main configuration file and add storages, profiles and
//! directory mappings to it. Every command edits exactly one file.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::cli::{current_environment, load_configuration, output, working_dir};
use crate::core::config::{Configuration, StorageConfig};
use crate::core::constants;
use crate::core::profile::Profile;
use crate::core::session;
use crate::core::store::StoreKind;
use crate::core::validation::{parse_assignment, validate_name};
use crate::error::{ConfigError, ProfileError, RegistryError, Result, ValidationError};

/// Profile definition collected from `config add profile` flags.
#[derive(Debug, Default)]
pub struct NewProfile {
    pub storage: String,
    pub name: String,
    pub path: String,
    pub const_env: Vec<String>,
    pub env: Vec<String>,
    pub depends_on: Vec<String>,
}

/// Write an empty configuration to the main path.
pub fn init(main: &Path, force: bool) -> Result<()> {
    Configuration::new().write_to_file(main, force)?;
    output::success(&format!(
        "Configuration initialized in {}",
        output::path(main.display())
    ));
    Ok(())
}

/// Add a storage of type `kind` with its default settings.
pub fn add_storage(main: &Path, kind: &str, name: &str, force: bool) -> Result<()> {
    let kind: StoreKind = kind.parse()?;
    validate_name(name)?;

    let mut config = Configuration::load_from_file(main)?;
    if config.storages.contains_key(name) && !force {
        return Err(ConfigError::AlreadyDefined {
            kind: "storage",
            name: name.to_string(),
            path: main.to_path_buf(),
        }
        .into());
    }

    config.storages.insert(
        name.to_string(),
        StorageConfig {
            storage_type: kind.identifier().to_string(),
            config: kind.default_config(),
        },
    );
    config.write_to_file(main, true)?;

    output::success(&format!(
        "Storage {} has been added to the configuration at {}",
        output::name(name),
        output::path(main.display())
    ));
    if kind.default_config().values().any(String::is_empty) {
        output::hint(&format!("fill in its settings in {}", main.display()));
    }
    Ok(())
}

/// Add a profile to the main configuration.
///
/// The storage has to be defined in one of the merged config files.
pub fn add_profile(main: &Path, new: NewProfile, force: bool) -> Result<()> {
    let merged = load_configuration(main)?;
    if !merged.storages.contains_key(&new.storage) {
        return Err(RegistryError::UnknownStorage(new.storage).into());
    }
    validate_name(&new.name)?;

    let profile = build_profile(&new)?;
    for dependency in &profile.depends_on {
        if !merged.profiles.contains_key(dependency) && dependency != &new.name {
            output::warn(&format!(
                "profile {} depends on {} which is not defined yet",
                new.name, dependency
            ));
        }
    }

    let mut config = Configuration::load_from_file(main)?;
    if config.profiles.contains_key(&new.name) && !force {
        return Err(ConfigError::AlreadyDefined {
            kind: "profile",
            name: new.name,
            path: main.to_path_buf(),
        }
        .into());
    }

    debug!(profile = %new.name, storage = %new.storage, "adding profile");
    config.profiles.insert(new.name.clone(), profile);
    config.write_to_file(main, true)?;

    output::success(&format!(
        "Profile {} has been added to the configuration at {}",
        output::name(&new.name),
        output::path(main.display())
    ));
    Ok(())
}

fn build_profile(new: &NewProfile) -> Result<Profile> {
    let mut const_env = BTreeMap::new();
    for assignment in &new.const_env {
        let (key, value) = parse_assignment(assignment)?;
        const_env.insert(key, value);
    }

    let mut env = BTreeMap::new();
    for assignment in &new.env {
        let (key, attribute) = parse_assignment(assignment)?;
        if attribute.is_empty() {
            return Err(ValidationError::InvalidAssignment(assignment.clone()).into());
        }
        env.insert(key, attribute);
    }

    let mut depends_on: Vec<String> = Vec::new();
    for dependency in &new.depends_on {
        validate_name(dependency)?;
        if !depends_on.contains(dependency) {
            depends_on.push(dependency.clone());
        }
    }

    if !env.is_empty() && new.path.is_empty() {
        return Err(ValidationError::EmptyPath.into());
    }

    Ok(Profile {
        storage: new.storage.clone(),
        path: new.path.clone(),
        depends_on,
        const_env,
        env,
        ..Profile::default()
    })
}

/// Map the working directory to `profiles`, or to the loaded profiles.
///
/// With `local`, the mapping goes to `.envmanager.toml` in the working
/// directory, which is created if needed.
pub fn add_mapping(main: &Path, profiles: &[String], local: bool) -> Result<()> {
    let cwd = working_dir()?;

    let profiles = if profiles.is_empty() {
        session::loaded_profiles(&current_environment())
    } else {
        for name in profiles {
            validate_name(name)?;
        }
        profiles.to_vec()
    };
    if profiles.is_empty() {
        return Err(ProfileError::NothingLoaded.into());
    }

    let target = if local {
        let path = cwd.join(constants::CONFIG_FILE);
        if !path.exists() {
            Configuration::new().write_to_file(&path, false)?;
        }
        path
    } else {
        main.to_path_buf()
    };

    let mut config = Configuration::load_from_file(&target)?;
    config
        .directory_mapping
        .insert(cwd.display().to_string(), profiles.clone());
    config.write_to_file(&target, true)?;

    output::success(&format!(
        "Mapped the profiles ({}) to {}",
        profiles.join(", "),
        output::path(cwd.display())
    ));
    Ok(())
}
