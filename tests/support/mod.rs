//! Test support utilities for envmanager integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own temporary project dir, home dir and tool dir.
/// No process-global state is mutated: child processes use `.current_dir()`
/// and explicit environment variables so tests can run in parallel.
pub struct Test {
    /// Temporary directory the commands run in
    pub dir: TempDir,
    /// Temporary home directory holding the main config file
    pub home: TempDir,
    /// Directory prepended to PATH for fake backend tools
    pub bin: TempDir,
}

impl Test {
    /// Create a new empty test environment without any config file.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");
        let bin = TempDir::new().expect("failed to create temp bin");

        Self { dir, home, bin }
    }

    /// Create a test environment whose main config file has `contents`.
    pub fn with_config(contents: &str) -> Self {
        let t = Self::new();
        std::fs::write(t.config_path(), contents).expect("failed to write config");
        t
    }

    /// Path of the main config file.
    pub fn config_path(&self) -> PathBuf {
        self.home.path().join(".envmanager.toml")
    }

    /// Contents of the main config file.
    pub fn config_contents(&self) -> String {
        std::fs::read_to_string(self.config_path()).expect("failed to read config")
    }

    /// Working directory of the commands as the binary sees it.
    pub fn dir_path(&self) -> PathBuf {
        std::fs::canonicalize(self.dir.path()).expect("failed to canonicalize dir")
    }

    /// Working directory of the commands, as used in directory mappings.
    pub fn dir_key(&self) -> String {
        self.dir_path().display().to_string()
    }

    /// Create a subdirectory of the project dir.
    pub fn subdir(&self, name: &str) -> PathBuf {
        let path = self.dir_path().join(name);
        std::fs::create_dir_all(&path).expect("failed to create subdir");
        path
    }

    /// Write a `.envmanager.toml` into `dir`.
    pub fn write_local_config(&self, dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join(".envmanager.toml");
        std::fs::write(&path, contents).expect("failed to write local config");
        path
    }

    /// Install an executable script called `name` into the tool dir.
    #[cfg(unix)]
    pub fn install_tool(&self, name: &str, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.bin.path().join(name);
        std::fs::write(&path, script).expect("failed to write tool");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("failed to chmod tool");
    }

    /// PATH with the tool dir in front.
    pub fn path_var(&self) -> String {
        let original = std::env::var("PATH").unwrap_or_default();
        format!("{}:{}", self.bin.path().display(), original)
    }
}
