//! Debug commands.
//!
//! Inspect config files, storages, profiles and entries without loading
//! anything into the shell.

use std::path::Path;
use std::rc::Rc;

use crate::cli::{load_configuration, load_registry, output, working_dir};
use crate::core::config;
use crate::core::store::{self, Prompt};
use crate::error::{Error, ProfileError, Result};

/// List the config files in processing order on stderr.
///
/// Does not read the files, so it still works when merging fails.
pub fn files(main: &Path) -> Result<()> {
    let cwd = working_dir()?;
    let files: Vec<_> = config::discover(&cwd, main)
        .into_iter()
        .map(|f| f.display().to_string())
        .collect();

    output::note("These files will be processed in this order (later files override earlier files):");
    eprint!("{}", output::format_list(&files, "\t- ", ""));
    Ok(())
}

/// List configured storages, or run the checks of storage `name`.
///
/// The storage is built without validating it first, so a broken storage
/// can still be inspected.
pub fn storage(main: &Path, name: Option<&str>) -> Result<()> {
    let config = load_configuration(main)?;

    let Some(name) = name else {
        output::header("Configured storages:");
        if config.storages.is_empty() {
            output::dimmed("no storages defined");
        }
        for (name, storage) in &config.storages {
            output::list_item(&format!("{} ({})", name, storage.storage_type));
        }
        return Ok(());
    };

    let configured = config.storages.get(name);
    output::data(&format!(
        "Storage {}\nIs configured: {}",
        name,
        configured.is_some()
    ));
    let Some(settings) = configured else {
        return Ok(());
    };

    let adapter = store::build(
        name,
        &settings.storage_type,
        &settings.config,
        Rc::new(Prompt),
    )?;
    let validation = adapter.validate();

    output::data("Running storage dependent checks:");
    output::data(&validation.lines.join("\n"));
    match validation.error {
        None => output::success("checks passed"),
        Some(e) => output::warn(&e.to_string()),
    }
    Ok(())
}

/// Show a profile with its resolved dependencies and any problems.
///
/// A dependency that cannot be resolved is reported as a problem, with an
/// empty dependency list.
pub fn profile(main: &Path, name: &str, json: bool) -> Result<()> {
    let registry = load_registry(main)?;
    let profile = registry.profile(name)?;
    let mut problems = profile.validate(&registry);
    let dependencies = match profile.dependencies(&registry, &[]) {
        Ok(dependencies) => dependencies,
        // direct unknown dependencies are already reported by validate
        Err(Error::Profile(ProfileError::UnknownDependency { profile: owner, .. }))
            if owner == name =>
        {
            Vec::new()
        }
        Err(e) => {
            problems.push(e.to_string());
            Vec::new()
        }
    };
    let storage_exists = registry.has_storage(&profile.storage);

    if json {
        let result = serde_json::json!({
            "name": name,
            "storage": profile.storage,
            "storage_exists": storage_exists,
            "path": profile.path,
            "dependencies": dependencies,
            "const_env": profile.const_env,
            "env": profile.env,
            "problems": problems,
        });
        output::data(&serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    output::section(&format!("Profile {}", name));
    output::kv("storage", &profile.storage);
    output::kv("storage exists", storage_exists);
    output::kv("path", &profile.path);

    output::data(&format!(
        "Profile depends on other profiles: {}",
        !dependencies.is_empty()
    ));
    for dependency in &dependencies {
        output::list_item(dependency);
    }

    output::data(&format!(
        "Provides static environment variables: {}",
        !profile.const_env.is_empty()
    ));
    for (key, value) in &profile.const_env {
        output::list_item(&format!("{} : {}", key, value));
    }

    output::data(&format!(
        "Provides dynamic environment variables: {}",
        !profile.env.is_empty()
    ));
    for (key, attribute) in &profile.env {
        output::list_item(&format!("{} : {}", key, attribute));
    }

    for problem in &problems {
        output::warn(problem);
    }
    Ok(())
}

/// Show the attribute names of the entry at `path` in `storage`.
pub fn entry(main: &Path, storage: &str, path: &str) -> Result<()> {
    let registry = load_registry(main)?;
    let adapter = registry.storage(storage)?;
    let entry = adapter.get_entry(path)?;

    let mut names = entry.attribute_names();
    names.sort();

    output::data(&format!("Attributes of {} in {}:", path, storage));
    for name in &names {
        output::data(&format!("- {}", name));
    }
    if adapter.is_case_sensitive() {
        output::data("This storage provider is case-sensitive!");
    }
    Ok(())
}
