//! Configuration file management.
//!
//! Handles reading, merging, and writing `.envmanager.toml` files. The main
//! file (usually `~/.envmanager.toml`) is loaded first; every
//! `.envmanager.toml` found between the working directory and the filesystem
//! root is merged on top of it, nearest file last.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::core::constants;
use crate::core::profile::Profile;
use crate::error::{ConfigError, Result};

/// Contents of one or more merged configuration files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// General behavior. Only honored from the main file.
    #[serde(default, skip_serializing_if = "Options::is_default")]
    pub options: Options,
    /// Storage definitions by name.
    #[serde(default)]
    pub storages: BTreeMap<String, StorageConfig>,
    /// Profile definitions by name.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
    /// Directory path → profiles loaded there when none are named.
    #[serde(default)]
    pub directory_mapping: BTreeMap<String, Vec<String>>,
}

/// The `[options]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Let later files silently replace earlier definitions. Makes
    /// `collision_detection_ignore` meaningless.
    #[serde(default)]
    pub disable_collision_detection: bool,
    #[serde(default, skip_serializing_if = "CollisionDetectionIgnore::is_empty")]
    pub collision_detection_ignore: CollisionDetectionIgnore,
}

impl Options {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Names that may be redefined by later files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionDetectionIgnore {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub storages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<String>,
}

impl CollisionDetectionIgnore {
    fn is_empty(&self) -> bool {
        self.storages.is_empty() && self.profiles.is_empty() && self.mappings.is_empty()
    }
}

/// A `[storages.<name>]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(rename = "type")]
    pub storage_type: String,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

impl Configuration {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the main configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoHomeDir` if the home directory is unknown.
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(constants::CONFIG_FILE))
            .ok_or_else(|| ConfigError::NoHomeDir.into())
    }

    /// Load a configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if the file doesn't exist,
    /// `ConfigError::ReadFile` if it can't be read, or `ConfigError::Parse`
    /// if the TOML is malformed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        let config = read(path)?;
        debug!(
            storages = config.storages.len(),
            profiles = config.profiles.len(),
            mappings = config.directory_mapping.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Merge the file at `path` into this configuration.
    ///
    /// Storages, profiles and mappings of the file are added. Redefining a
    /// name that already exists is an error unless collision detection is
    /// disabled or the name is listed in `collision_detection_ignore`. The
    /// file's own `[options]` are ignored.
    ///
    /// Mapping keys `.` and `./sub` are resolved against the directory
    /// containing the file.
    ///
    /// # Errors
    ///
    /// Returns a read or parse error, or `ConfigError::Collision`.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "merging config");
        let fragment = read(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        self.merge(fragment, base)
    }

    fn merge(&mut self, fragment: Configuration, base: &Path) -> Result<()> {
        let check = !self.options.disable_collision_detection;
        let ignore = &self.options.collision_detection_ignore;

        for (name, storage) in fragment.storages {
            if check && self.storages.contains_key(&name) && !ignore.storages.contains(&name) {
                return Err(ConfigError::Collision {
                    kind: "storage name",
                    name,
                    expanded_from: None,
                }
                .into());
            }
            self.storages.insert(name, storage);
        }

        for (name, profile) in fragment.profiles {
            if check && self.profiles.contains_key(&name) && !ignore.profiles.contains(&name) {
                return Err(ConfigError::Collision {
                    kind: "profile name",
                    name,
                    expanded_from: None,
                }
                .into());
            }
            self.profiles.insert(name, profile);
        }

        for (original, profiles) in fragment.directory_mapping {
            let name = expand_mapping_path(&original, base);
            trace!(from = %original, to = %name, "expanded mapping path");
            if check
                && self.directory_mapping.contains_key(&name)
                && !ignore.mappings.contains(&name)
            {
                let expanded_from = (original != name).then_some(original);
                return Err(ConfigError::Collision {
                    kind: "mapping",
                    name,
                    expanded_from,
                }
                .into());
            }
            self.directory_mapping.insert(name, profiles);
        }

        Ok(())
    }

    /// Write the configuration to `path`.
    ///
    /// An existing file is only replaced when `replace` is set. On Unix the
    /// file is created with mode 0600.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::WouldOverwrite`, or an error if serialization or
    /// the write fails.
    pub fn write_to_file(&self, path: &Path, replace: bool) -> Result<()> {
        debug!(path = %path.display(), replace, "writing config");

        if path.exists() && !replace {
            return Err(ConfigError::WouldOverwrite(path.to_path_buf()).into());
        }

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(contents.as_bytes())?;
            file.flush()?;

            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        #[cfg(not(unix))]
        {
            std::fs::write(path, contents)?;
        }

        Ok(())
    }
}

/// List the configuration files to process, in processing order.
///
/// The main file always comes first. The remaining files are every
/// `.envmanager.toml` between `start_dir` and the filesystem root (root
/// itself excluded), farthest first, so the file nearest to `start_dir` has
/// the highest precedence. The main file is never listed twice.
pub fn discover(start_dir: &Path, main: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for dir in start_dir.ancestors() {
        if dir.parent().is_none() {
            break;
        }
        let candidate = dir.join(constants::CONFIG_FILE);
        if candidate != main && candidate.is_file() {
            trace!(path = %candidate.display(), "discovered config file");
            found.push(candidate);
        }
    }

    found.push(main.to_path_buf());
    found.reverse();
    found
}

fn read(path: &Path) -> Result<Configuration> {
    if !path.exists() {
        return Err(ConfigError::NotInitialized(path.to_path_buf()).into());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(config)
}

fn expand_mapping_path(name: &str, base: &Path) -> String {
    if name == "." {
        base.display().to_string()
    } else if let Some(rest) = name.strip_prefix("./") {
        base.join(rest).display().to_string()
    } else {
        name.to_string()
    }
}
