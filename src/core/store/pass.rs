//! Password-store backend.
//!
//! Reads entries from a `pass`/`gopass` compatible directory of
//! GPG-encrypted files.
//!
//! ## Requirements
//!
//! - `gpg` CLI must be installed
//! - the private key must be available to `gpg-agent`
//!
//! ## Usage
//!
//! ```toml
//! [storages.personal]
//! type = "pass"
//! config = { prefix = "env" }
//! ```
//!
//! The store directory is `dir` from the config, `$PASSWORD_STORE_DIR`, or
//! `~/.password-store`, in that order.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use super::{Store, Validation};
use crate::core::entry::Entry;
use crate::error::{Result, StorageError};

/// Attribute holding the first line of a secret.
pub const PASSWORD_ATTRIBUTE: &str = "password";

const GPG: &str = "gpg";

/// A password-store directory.
#[derive(Debug, Clone)]
pub struct Pass {
    name: String,
    dir: PathBuf,
    prefix: String,
}

impl Pass {
    pub fn new(name: &str, dir: impl Into<PathBuf>, prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            dir: dir.into(),
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    /// Store directory used when none is configured.
    pub fn default_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os("PASSWORD_STORE_DIR") {
            return Some(PathBuf::from(dir));
        }
        dirs::home_dir().map(|home| home.join(".password-store"))
    }

    /// Store-relative name of the secret addressed by `path`.
    fn secret_name(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        if self.prefix.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.prefix, path)
        }
    }

    /// Locate the encrypted file for `path`, checking its group first.
    fn secret_file(&self, path: &str) -> Result<PathBuf> {
        let name = self.secret_name(path);
        let file = self.dir.join(format!("{}.gpg", name));

        if let Some((group, _)) = name.rsplit_once('/') {
            if !self.dir.join(group).is_dir() {
                return Err(StorageError::GroupNotFound {
                    storage: self.name.clone(),
                    group: group.to_string(),
                }
                .into());
            }
        }
        if !file.is_file() {
            return Err(StorageError::EntryNotFound {
                storage: self.name.clone(),
                path: path.to_string(),
            }
            .into());
        }
        Ok(file)
    }

    fn decrypt(&self, file: &Path) -> Result<String> {
        let gpg = which::which(GPG).map_err(|_| StorageError::ToolMissing { tool: GPG })?;

        let output = Command::new(gpg)
            .args(["--quiet", "--batch", "--yes", "--decrypt"])
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| StorageError::Backend {
                storage: self.name.clone(),
                message: format!("failed to spawn gpg: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StorageError::Backend {
                storage: self.name.clone(),
                message: format!(
                    "gpg decrypt failed: {}. Ensure you have the private key in your keyring.",
                    stderr.trim()
                ),
            }
            .into());
        }

        let plaintext = String::from_utf8(output.stdout).map_err(|e| StorageError::Backend {
            storage: self.name.clone(),
            message: format!("UTF-8 error: {}", e),
        })?;
        trace!(plaintext_len = plaintext.len(), "decrypted with gpg");
        Ok(plaintext)
    }
}

impl Store for Pass {
    fn get_entry(&self, path: &str) -> Result<Entry> {
        debug!(storage = %self.name, path = %path, "reading pass entry");
        let file = self.secret_file(path)?;
        let plaintext = self.decrypt(&file)?;
        parse_secret(&plaintext)
    }

    fn is_case_sensitive(&self) -> bool {
        true
    }

    fn validate(&self) -> Validation {
        let exists = self.dir.is_dir();
        let gpg_found = which::which(GPG).is_ok();
        let lines = vec![
            format!(
                "Store directory is {}\nDirectory exists: {}",
                self.dir.display(),
                exists
            ),
            format!("Prefix: {}", self.prefix),
            format!("{} found: {}", GPG, gpg_found),
        ];

        if exists {
            Validation::passed(lines)
        } else {
            Validation::failed(StorageError::ValidationFailed(self.name.clone()), lines)
        }
    }
}

/// Convert a decrypted secret into an entry.
///
/// The first line is the password; following `key: value` lines become
/// attributes. YAML document separators and other lines are ignored.
fn parse_secret(plaintext: &str) -> Result<Entry> {
    let mut entry = Entry::new();
    let mut lines = plaintext.lines();

    entry.set_attribute(PASSWORD_ATTRIBUTE, lines.next().unwrap_or_default())?;

    for line in lines {
        if line.trim() == "---" {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            entry.set_attribute(key, value.trim())?;
        }
    }

    Ok(entry)
}
