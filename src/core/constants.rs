//! Constants used throughout envmanager.
//!
//! Centralizes magic strings and configuration values.

/// Configuration file name, both in the home directory and in project directories.
pub const CONFIG_FILE: &str = ".envmanager.toml";

/// Environment variable holding the comma-separated list of loaded profiles.
pub const LOADED_PROFILES_VAR: &str = "ENVMANAGER_LOADED";

/// Environment variable overriding the log filter.
pub const LOG_VAR: &str = "ENVMANAGER_LOG";

/// Environment variable selecting the log format; `json` for one object per line.
pub const LOG_FORMAT_VAR: &str = "ENVMANAGER_LOG_FORMAT";

/// Environment variable overriding the main configuration file path.
pub const CONFIG_VAR: &str = "ENVMANAGER_CONFIG";

/// Separator used in the loaded-profiles tracking variable.
pub const LOADED_SEPARATOR: char = ',';

/// Separator between emitted shell statements.
pub const STATEMENT_SEPARATOR: &str = ";";
