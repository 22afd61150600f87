//! Storage backend selection.
//!
//! Maps the `type` of a configured storage to its implementation and builds
//! validated instances.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;

use tracing::{debug, warn};

use super::{Credentials, Keepass, Pass, Store};
use crate::error::{Result, StorageError};

/// Supported storage backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// KeePass database file
    Keepass,
    /// password-store directory
    Pass,
}

impl StoreKind {
    /// Every supported kind.
    pub const ALL: [StoreKind; 2] = [StoreKind::Keepass, StoreKind::Pass];

    /// Identifier used as `type` in the configuration.
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::Keepass => "keepass",
            Self::Pass => "pass",
        }
    }

    /// Identifiers of every supported kind.
    pub fn identifiers() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.identifier()).collect()
    }

    /// Seed configuration written by `config add storage`.
    pub fn default_config(&self) -> BTreeMap<String, String> {
        let key = match self {
            Self::Keepass => "path",
            Self::Pass => "prefix",
        };
        BTreeMap::from([(key.to_string(), String::new())])
    }
}

impl FromStr for StoreKind {
    type Err = StorageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.identifier() == s)
            .ok_or_else(|| StorageError::UnknownType(s.to_string()))
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Build the storage called `name` from its configured type and settings.
///
/// The storage is validated before it is returned; a storage that fails
/// validation is never handed out.
///
/// # Errors
///
/// Returns the errors of [`build`], or the validation error of the storage.
pub fn create(
    name: &str,
    kind: &str,
    config: &BTreeMap<String, String>,
    credentials: Rc<dyn Credentials>,
) -> Result<Box<dyn Store>> {
    let store = build(name, kind, config, credentials)?;

    let validation = store.validate();
    if let Some(error) = validation.error {
        for line in &validation.lines {
            warn!(storage = %name, "{}", line);
        }
        return Err(error.into());
    }

    Ok(store)
}

/// Construct a storage without validating it.
///
/// Used where a broken storage should be inspected rather than rejected.
///
/// # Errors
///
/// Returns `StorageError::UnknownType` for an unsupported type, or
/// `StorageError::MissingConfig` when a required setting is absent.
pub fn build(
    name: &str,
    kind: &str,
    config: &BTreeMap<String, String>,
    credentials: Rc<dyn Credentials>,
) -> Result<Box<dyn Store>> {
    let kind: StoreKind = kind.parse()?;
    debug!(storage = %name, kind = %kind, "creating storage");

    let setting = |key: &str| config.get(key).filter(|v| !v.is_empty()).cloned();

    let store: Box<dyn Store> = match kind {
        StoreKind::Keepass => {
            let file = setting("path").ok_or_else(|| StorageError::MissingConfig {
                storage: name.to_string(),
                key: "path",
            })?;
            let key_file = setting("keyfile").map(PathBuf::from);
            Box::new(Keepass::new(name, file, key_file, credentials))
        }
        StoreKind::Pass => {
            let dir = match setting("dir") {
                Some(dir) => PathBuf::from(dir),
                None => Pass::default_dir().ok_or_else(|| StorageError::MissingConfig {
                    storage: name.to_string(),
                    key: "dir",
                })?,
            };
            let prefix = setting("prefix").unwrap_or_default();
            Box::new(Pass::new(name, dir, &prefix))
        }
    };

    Ok(store)
}
