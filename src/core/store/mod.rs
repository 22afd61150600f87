//! Secret storage backends.
//!
//! A profile reads its secret-backed variables from an [`Entry`] that a
//! [`Store`] returns for a backend-specific path.
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement the `Store` trait in a new file (e.g., `vault.rs`)
//! 2. Add a variant to [`StoreKind`] with its identifier and default config
//! 3. Construct it in [`create`]
//!
//! ## Example
//!
//! ```ignore
//! struct Vault { /* ... */ }
//!
//! impl Store for Vault {
//!     fn get_entry(&self, path: &str) -> Result<Entry> {
//!         // Fetch and convert the secret
//!     }
//!     fn is_case_sensitive(&self) -> bool {
//!         true
//!     }
//!     fn validate(&self) -> Validation {
//!         Validation::passed(vec!["address reachable".to_string()])
//!     }
//! }
//! ```

use crate::core::entry::Entry;
use crate::error::{Result, StorageError};

mod backend;
mod credentials;
mod keepass;
mod pass;

pub use backend::{build, create, StoreKind};
pub use credentials::{Credentials, Fixed, Prompt};
pub use keepass::Keepass;
pub use pass::Pass;

/// Secret storage trait.
///
/// The core only ever talks to a backend through these operations, so any
/// type implementing them can back profiles.
pub trait Store {
    /// Fetch the entry addressed by `path`.
    ///
    /// How the path is interpreted depends on the backend; hierarchical
    /// backends separate groups with `/`. A backend may ask for credentials
    /// the first time it is used.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::EntryNotFound` or `StorageError::GroupNotFound`
    /// when nothing lives at `path`, or a backend error when the secret
    /// cannot be read.
    fn get_entry(&self, path: &str) -> Result<Entry>;

    /// Whether paths and attribute names are case-sensitive.
    fn is_case_sensitive(&self) -> bool;

    /// Run backend-specific sanity checks (e.g. the database file exists).
    fn validate(&self) -> Validation;
}

/// Outcome of [`Store::validate`].
///
/// The diagnostic lines are always present; `error` alone decides whether the
/// storage is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub lines: Vec<String>,
    pub error: Option<StorageError>,
}

impl Validation {
    /// A passing validation with informational lines.
    pub fn passed(lines: Vec<String>) -> Self {
        Self { lines, error: None }
    }

    /// A failing validation with diagnostic lines.
    pub fn failed(error: StorageError, lines: Vec<String>) -> Self {
        Self {
            lines,
            error: Some(error),
        }
    }

    /// Whether the storage passed validation.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
