//! Shell environment staging.
//!
//! Collects pending exports and unsets and renders them as statements for the
//! calling shell to evaluate.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::trace;

use crate::core::constants::STATEMENT_SEPARATOR;
use crate::error::{Result, ValidationError};

/// The current environment plus the variables that will be exported or
/// unset the next time [`Environment::write_statements`] is called.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Snapshot of the shell's environment, filled once by `load`.
    current: HashMap<String, String>,
    /// Variables to export.
    add_vars: BTreeMap<String, String>,
    /// Variables to unset.
    del_vars: BTreeSet<String>,
}

impl Environment {
    /// Create an environment with nothing captured and nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment whose snapshot is the given variables instead of
    /// the real process environment.
    pub fn with_current<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            current: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Capture the process environment. Call exactly once, before `current`.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn load(&mut self) {
        for (key, value) in std::env::vars_os() {
            if let (Ok(key), Ok(value)) = (key.into_string(), value.into_string()) {
                self.current.insert(key, value);
            }
        }
        trace!(vars = self.current.len(), "captured environment");
    }

    /// Look up a variable in the captured snapshot, falling back to `default`.
    pub fn current(&self, key: &str, default: &str) -> String {
        self.current
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Schedule `export key="value"`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyKey` if `key` is empty.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(ValidationError::EmptyKey.into());
        }
        self.add_vars.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Schedule `unset key`, dropping any pending export of the same key.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyKey` if `key` is empty.
    pub fn unset(&mut self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(ValidationError::EmptyKey.into());
        }
        self.add_vars.remove(key);
        self.del_vars.insert(key.to_string());
        Ok(())
    }

    /// Pending exports, ordered by name.
    pub fn pending_exports(&self) -> &BTreeMap<String, String> {
        &self.add_vars
    }

    /// Pending unsets, ordered by name.
    pub fn pending_unsets(&self) -> &BTreeSet<String> {
        &self.del_vars
    }

    /// Render all pending changes: exports first, then unsets, joined by `;`.
    ///
    /// Values are wrapped in double quotes verbatim. Does not clear the
    /// pending changes.
    pub fn write_statements(&self) -> String {
        let exports = self
            .add_vars
            .iter()
            .map(|(key, value)| format!("export {}=\"{}\"", key, value));
        let unsets = self.del_vars.iter().map(|key| format!("unset {}", key));

        exports
            .chain(unsets)
            .collect::<Vec<_>>()
            .join(STATEMENT_SEPARATOR)
    }
}
