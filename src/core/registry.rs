//! The registry of storages, profiles and directory mappings.
//!
//! One registry is built per command invocation from the merged
//! configuration and passed by reference to everything that needs a lookup.

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

use crate::core::config::Configuration;
use crate::core::profile::Profile;
use crate::core::store::{self, Credentials, Store};
use crate::error::{RegistryError, Result, ValidationError};

/// Name-keyed lookup tables for everything the configuration defines.
#[derive(Default)]
pub struct Registry {
    storages: BTreeMap<String, Box<dyn Store>>,
    profiles: BTreeMap<String, Profile>,
    directory_mappings: BTreeMap<String, Vec<String>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("storages", &self.storage_names())
            .field("profiles", &self.profiles)
            .field("directory_mappings", &self.directory_mappings)
            .finish()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a merged configuration.
    ///
    /// Storages are created (and validated) first, then profiles and
    /// mappings are registered.
    ///
    /// # Errors
    ///
    /// Returns the first storage creation error, or a validation error for
    /// an empty name, path or profile list.
    pub fn from_config(config: &Configuration, credentials: Rc<dyn Credentials>) -> Result<Self> {
        let mut registry = Self::new();

        for (name, storage) in &config.storages {
            let adapter = store::create(
                name,
                &storage.storage_type,
                &storage.config,
                Rc::clone(&credentials),
            )?;
            registry.add_storage(name, adapter)?;
        }

        for (name, profile) in &config.profiles {
            registry.add_profile(name, profile.clone())?;
        }

        for (path, profiles) in &config.directory_mapping {
            registry.add_directory_mapping(path, profiles.clone())?;
        }

        debug!(
            storages = registry.storages.len(),
            profiles = registry.profiles.len(),
            mappings = registry.directory_mappings.len(),
            "registry ready"
        );
        Ok(registry)
    }

    /// Register a storage, replacing any storage of the same name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyName` if `name` is empty.
    pub fn add_storage(&mut self, name: &str, adapter: Box<dyn Store>) -> Result<()> {
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        self.storages.insert(name.to_string(), adapter);
        Ok(())
    }

    /// Register a profile under `name`, replacing any profile of the same
    /// name. The profile takes `name` as its identity.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyName` if `name` is empty.
    pub fn add_profile(&mut self, name: &str, mut profile: Profile) -> Result<()> {
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        profile.set_name(name);
        self.profiles.insert(name.to_string(), profile);
        Ok(())
    }

    /// Map a directory to the profiles loaded there by default.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyPath` or
    /// `ValidationError::EmptyProfileList`.
    pub fn add_directory_mapping(&mut self, path: &str, profiles: Vec<String>) -> Result<()> {
        if path.is_empty() {
            return Err(ValidationError::EmptyPath.into());
        }
        if profiles.is_empty() {
            return Err(ValidationError::EmptyProfileList.into());
        }
        self.directory_mappings.insert(path.to_string(), profiles);
        Ok(())
    }

    /// Look up a profile.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyName` or `RegistryError::UnknownProfile`.
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        self.profiles
            .get(name)
            .ok_or_else(|| RegistryError::UnknownProfile(name.to_string()).into())
    }

    /// Look up a storage.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyName` or `RegistryError::UnknownStorage`.
    pub fn storage(&self, name: &str) -> Result<&dyn Store> {
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        self.storages
            .get(name)
            .map(|storage| storage.as_ref())
            .ok_or_else(|| RegistryError::UnknownStorage(name.to_string()).into())
    }

    /// Profiles mapped to `path`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyPath` or `RegistryError::UnknownMapping`.
    pub fn directory_mapping(&self, path: &str) -> Result<&[String]> {
        if path.is_empty() {
            return Err(ValidationError::EmptyPath.into());
        }
        self.directory_mappings
            .get(path)
            .map(Vec::as_slice)
            .ok_or_else(|| RegistryError::UnknownMapping(path.to_string()).into())
    }

    pub fn has_storage(&self, name: &str) -> bool {
        self.storages.contains_key(name)
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn has_directory_mapping(&self, path: &str) -> bool {
        self.directory_mappings.contains_key(path)
    }

    /// All storages, ordered by name.
    pub fn storages(&self) -> impl Iterator<Item = (&str, &dyn Store)> {
        self.storages
            .iter()
            .map(|(name, storage)| (name.as_str(), storage.as_ref()))
    }

    /// All profiles, ordered by name.
    pub fn profiles(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.profiles.iter().map(|(name, profile)| (name.as_str(), profile))
    }

    /// All directory mappings, ordered by path.
    pub fn directory_mappings(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.directory_mappings
            .iter()
            .map(|(path, profiles)| (path.as_str(), profiles.as_slice()))
    }

    pub fn storage_names(&self) -> Vec<String> {
        self.storages.keys().cloned().collect()
    }

    pub fn profile_names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn directory_mapped_paths(&self) -> Vec<String> {
        self.directory_mappings.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StorageConfig;
    use crate::core::entry::Entry;
    use crate::core::store::{Fixed, Validation};
    use crate::error::{Error, StorageError};
    use tempfile::TempDir;

    struct Empty;

    impl Store for Empty {
        fn get_entry(&self, _path: &str) -> Result<Entry> {
            Ok(Entry::new())
        }

        fn is_case_sensitive(&self) -> bool {
            false
        }

        fn validate(&self) -> Validation {
            Validation::passed(vec![])
        }
    }

    #[test]
    fn test_add_storage() {
        let mut registry = Registry::new();
        registry.add_storage("work", Box::new(Empty)).unwrap();
        assert!(registry.has_storage("work"));
        assert!(!registry.storage("work").unwrap().is_case_sensitive());
    }

    #[test]
    fn test_add_storage_empty_name() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.add_storage("", Box::new(Empty)),
            Err(Error::Validation(ValidationError::EmptyName))
        ));
        assert!(registry.storage_names().is_empty());
    }

    #[test]
    fn test_add_profile_assigns_name() {
        let mut registry = Registry::new();
        registry.add_profile("db", Profile::default()).unwrap();
        assert_eq!(registry.profile("db").unwrap().name(), "db");
    }

    #[test]
    fn test_add_profile_empty_name() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.add_profile("", Profile::default()),
            Err(Error::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn test_add_profile_replaces() {
        let mut registry = Registry::new();
        registry.add_profile("db", Profile::default()).unwrap();
        registry
            .add_profile(
                "db",
                Profile {
                    path: "second".to_string(),
                    ..Profile::default()
                },
            )
            .unwrap();
        assert_eq!(registry.profile("db").unwrap().path, "second");
        assert_eq!(registry.profile_names(), vec!["db"]);
    }

    #[test]
    fn test_add_directory_mapping() {
        let mut registry = Registry::new();
        registry
            .add_directory_mapping("/work", vec!["db".to_string()])
            .unwrap();
        assert_eq!(registry.directory_mapping("/work").unwrap(), ["db"]);
        assert!(registry.has_directory_mapping("/work"));
    }

    #[test]
    fn test_add_directory_mapping_errors() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.add_directory_mapping("", vec!["db".to_string()]),
            Err(Error::Validation(ValidationError::EmptyPath))
        ));
        assert!(matches!(
            registry.add_directory_mapping("/work", vec![]),
            Err(Error::Validation(ValidationError::EmptyProfileList))
        ));
        assert!(registry.directory_mapped_paths().is_empty());
    }

    #[test]
    fn test_lookup_errors() {
        let registry = Registry::new();
        assert!(matches!(
            registry.profile(""),
            Err(Error::Validation(ValidationError::EmptyName))
        ));
        assert!(matches!(
            registry.storage(""),
            Err(Error::Validation(ValidationError::EmptyName))
        ));
        assert!(matches!(
            registry.directory_mapping(""),
            Err(Error::Validation(ValidationError::EmptyPath))
        ));
        assert_eq!(
            registry.profile("ghost").unwrap_err().to_string(),
            "profile with name ghost does not exist"
        );
        assert!(matches!(
            registry.storage("ghost"),
            Err(Error::Registry(RegistryError::UnknownStorage(_)))
        ));
        assert!(matches!(
            registry.directory_mapping("/nowhere"),
            Err(Error::Registry(RegistryError::UnknownMapping(_)))
        ));
    }

    #[test]
    fn test_enumeration_is_ordered() {
        let mut registry = Registry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.add_profile(name, Profile::default()).unwrap();
            registry.add_storage(name, Box::new(Empty)).unwrap();
        }
        registry
            .add_directory_mapping("/b", vec!["zeta".to_string()])
            .unwrap();
        registry
            .add_directory_mapping("/a", vec!["alpha".to_string()])
            .unwrap();

        assert_eq!(registry.profile_names(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(registry.storage_names(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(registry.directory_mapped_paths(), vec!["/a", "/b"]);

        let names: Vec<&str> = registry.profiles().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        assert_eq!(registry.storages().count(), 3);
        assert_eq!(registry.directory_mappings().next().unwrap().0, "/a");
    }

    #[test]
    fn test_from_config() {
        let tmp = TempDir::new().unwrap();
        let mut config = Configuration::new();
        config.storages.insert(
            "personal".to_string(),
            StorageConfig {
                storage_type: "pass".to_string(),
                config: BTreeMap::from([("dir".to_string(), tmp.path().display().to_string())]),
            },
        );
        config.profiles.insert(
            "db".to_string(),
            Profile {
                storage: "personal".to_string(),
                ..Profile::default()
            },
        );
        config
            .directory_mapping
            .insert("/work".to_string(), vec!["db".to_string()]);

        let registry = Registry::from_config(&config, Rc::new(Fixed::new("pw"))).unwrap();
        assert!(registry.has_storage("personal"));
        assert_eq!(registry.profile("db").unwrap().name(), "db");
        assert_eq!(registry.directory_mapping("/work").unwrap(), ["db"]);
    }

    #[test]
    fn test_from_config_unknown_storage_type() {
        let mut config = Configuration::new();
        config.storages.insert(
            "odd".to_string(),
            StorageConfig {
                storage_type: "vault".to_string(),
                config: BTreeMap::new(),
            },
        );

        assert!(matches!(
            Registry::from_config(&config, Rc::new(Fixed::new("pw"))),
            Err(Error::Storage(StorageError::UnknownType(_)))
        ));
    }

    #[test]
    fn test_from_config_empty_mapping() {
        let mut config = Configuration::new();
        config.directory_mapping.insert("/work".to_string(), vec![]);

        assert!(matches!(
            Registry::from_config(&config, Rc::new(Fixed::new("pw"))),
            Err(Error::Validation(ValidationError::EmptyProfileList))
        ));
    }
}
