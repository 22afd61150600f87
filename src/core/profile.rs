//! Profiles.
//!
//! A profile is a named bundle of environment variables: literal values,
//! values read from a storage entry, and other profiles it depends on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::environment::Environment;
use crate::core::registry::Registry;
use crate::error::{Error, ProfileError, RegistryError, Result};

/// Declarative description of one environment bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Assigned by [`Registry::add_profile`]; never read from configuration.
    #[serde(skip)]
    pub(crate) name: String,
    /// Storage the `env` mappings are read from.
    #[serde(default)]
    pub storage: String,
    /// Backend-specific path of the entry.
    #[serde(default)]
    pub path: String,
    /// Profiles loaded together with this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Variables set to literal values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub const_env: BTreeMap<String, String>,
    /// Variables set from entry attributes (variable name → attribute name).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl Profile {
    /// An empty, unnamed profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read mapped variables from the entry at `path` in `storage`.
    pub fn with_entry(mut self, storage: &str, path: &str) -> Self {
        self.storage = storage.to_string();
        self.path = path.to_string();
        self
    }

    /// Set `key` to a literal value.
    pub fn with_const(mut self, key: &str, value: &str) -> Self {
        self.const_env.insert(key.to_string(), value.to_string());
        self
    }

    /// Set `key` from the entry attribute `attribute`.
    pub fn with_mapping(mut self, key: &str, attribute: &str) -> Self {
        self.env.insert(key.to_string(), attribute.to_string());
        self
    }

    /// Load `name` together with this profile.
    pub fn with_dependency(mut self, name: &str) -> Self {
        if !self.depends_on.iter().any(|d| d == name) {
            self.depends_on.push(name.to_string());
        }
        self
    }

    /// Name assigned at registration, empty before that.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Assign the profile's identity. Only the registry should call this.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Problems that would stop this profile from loading: an unknown
    /// storage or unknown dependencies.
    pub fn validate(&self, registry: &Registry) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.env.is_empty() && !registry.has_storage(&self.storage) {
            problems.push(format!(
                "references storage {} which is not defined",
                self.storage
            ));
        }
        for dependency in &self.depends_on {
            if !registry.has_profile(dependency) {
                problems.push(format!("depends on {} which is not defined", dependency));
            }
        }
        problems
    }

    /// Schedule exports for every variable this profile defines.
    ///
    /// Literal values are applied first. Mapped values need the storage
    /// entry, which is fetched once. Stops at the first failure; variables
    /// already scheduled stay in `env`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownStorage` for an undefined storage, the
    /// storage's error if the entry cannot be read, and
    /// `StorageError::UnknownAttribute` for a mapping to a missing attribute.
    pub fn add_to_environment(&self, registry: &Registry, env: &mut Environment) -> Result<()> {
        debug!(profile = %self.name, "adding profile to environment");

        for (key, value) in &self.const_env {
            env.set(key, value)?;
        }

        if self.env.is_empty() {
            return Ok(());
        }

        let storage = registry.storage(&self.storage)?;
        let entry = storage.get_entry(&self.path)?;
        for (key, attribute) in &self.env {
            let value = entry.attribute(attribute)?;
            env.set(key, &value)?;
        }
        trace!(profile = %self.name, mapped = self.env.len(), "applied storage values");

        Ok(())
    }

    /// Schedule unsets for every variable this profile defines.
    ///
    /// Never reads from the storage.
    pub fn remove_from_environment(&self, env: &mut Environment) -> Result<()> {
        debug!(profile = %self.name, "removing profile from environment");

        for key in self.const_env.keys().chain(self.env.keys()) {
            env.unset(key)?;
        }
        Ok(())
    }

    /// All profiles this profile needs, directly or transitively.
    ///
    /// Direct dependencies come first in declared order, followed by the
    /// dependencies of each of them, depth first. Every name appears once,
    /// at the position it was first discovered. Names in `already_visited`
    /// are not expanded again, which also breaks cycles. The profile itself
    /// is never part of the result.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::UnknownDependency` if any profile in the
    /// closure depends on a name the registry does not know.
    pub fn dependencies(&self, registry: &Registry, already_visited: &[String]) -> Result<Vec<String>> {
        let mut visited = already_visited.to_vec();
        let mut found = Vec::new();
        self.collect_dependencies(registry, &mut visited, &mut found)?;
        found.retain(|name| name != &self.name);
        Ok(found)
    }

    fn collect_dependencies(
        &self,
        registry: &Registry,
        visited: &mut Vec<String>,
        found: &mut Vec<String>,
    ) -> Result<()> {
        push_unique(visited, &self.name);
        for name in &self.depends_on {
            push_unique(found, name);
        }

        for name in &self.depends_on {
            if visited.contains(name) {
                trace!(profile = %self.name, dependency = %name, "already visited");
                continue;
            }
            let dependency = registry.profile(name).map_err(|e| match e {
                Error::Registry(RegistryError::UnknownProfile(_)) => ProfileError::UnknownDependency {
                    profile: self.name.clone(),
                    dependency: name.clone(),
                }
                .into(),
                other => other,
            })?;
            visited.push(name.clone());
            dependency.collect_dependencies(registry, visited, found)?;
        }
        Ok(())
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}
