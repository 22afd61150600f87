//! Error types.
//!
//! A top-level [`Error`] wraps one enum per domain so callers can match on
//! the failure they care about (`Error::Registry(RegistryError::UnknownProfile(_))`)
//! while everything else propagates with `?`.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Malformed input. Always checked before any lookup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("key must not be empty")]
    EmptyKey,

    #[error("name cannot be empty")]
    EmptyName,

    #[error("path cannot be empty")]
    EmptyPath,

    #[error("profiles cannot be empty")]
    EmptyProfileList,

    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("invalid assignment '{0}': expected NAME=VALUE")]
    InvalidAssignment(String),
}

/// Lookups against the registry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("profile with name {0} does not exist")]
    UnknownProfile(String),

    #[error("storage with name {0} does not exist")]
    UnknownStorage(String),

    #[error("directory mapping for path {0} does not exist")]
    UnknownMapping(String),
}

/// Secret backends and the entries they return.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("unknown attribute {0}")]
    UnknownAttribute(String),

    #[error("could not find entry {path} in storage {storage}")]
    EntryNotFound { storage: String, path: String },

    #[error("could not find group {group} in storage {storage}")]
    GroupNotFound { storage: String, group: String },

    #[error("storage type {0} is not known (supported: keepass, pass)")]
    UnknownType(String),

    #[error("storage {storage} is missing required config key '{key}'")]
    MissingConfig { storage: String, key: &'static str },

    #[error("validation of {0} failed. Run `envmanager debug storage {0}` to check it in detail")]
    ValidationFailed(String),

    #[error("could not obtain credentials for {storage}: {reason}")]
    Credentials { storage: String, reason: String },

    #[error("{tool} not found on PATH")]
    ToolMissing { tool: &'static str },

    #[error("{storage}: {message}")]
    Backend { storage: String, message: String },
}

/// Profile resolution and the load/unload flow.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile {profile} has unknown dependency {dependency}")]
    UnknownDependency { profile: String, dependency: String },

    #[error("no profiles specified and no mapping for {0} found")]
    NoMappingFound(String),

    #[error("you must specify at least one profile to unload (or pass --all)")]
    NothingToUnload,

    #[error("no profiles are loaded at the moment; load some or pass --profile")]
    NothingLoaded,
}

/// Configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file {} not found", .0.display())]
    NotInitialized(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("collision detected, {kind} {name} is duplicated{}", expanded_note(.expanded_from))]
    Collision {
        kind: &'static str,
        name: String,
        expanded_from: Option<String>,
    },

    #[error("will not overwrite {} without being explicitly told to do so", .0.display())]
    WouldOverwrite(PathBuf),

    #[error("the {kind} {name} already exists in {}. Set --force to overwrite it", .path.display())]
    AlreadyDefined {
        kind: &'static str,
        name: String,
        path: PathBuf,
    },

    #[error("unable to determine home directory")]
    NoHomeDir,
}

fn expanded_note(expanded_from: &Option<String>) -> String {
    match expanded_from {
        Some(original) => format!(". Name was expanded from {}", original),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
