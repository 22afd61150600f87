//! Entry type.
//!
//! A storage independent representation of one secret record.

use std::collections::HashMap;

use crate::error::{Result, StorageError, ValidationError};

/// Flat attribute bag returned by a [`Store`](crate::core::store::Store).
///
/// Attribute names are case-sensitive here; whether the backend itself is
/// case-sensitive is reported by the storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    attributes: HashMap<String, String>,
}

impl Entry {
    /// Create an entry without attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyKey` if `key` is empty.
    pub fn set_attribute(&mut self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(ValidationError::EmptyKey.into());
        }
        self.attributes.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Get a copy of an attribute value.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyKey` if `key` is empty and
    /// `StorageError::UnknownAttribute` if the entry has no such attribute.
    pub fn attribute(&self, key: &str) -> Result<String> {
        if key.is_empty() {
            return Err(ValidationError::EmptyKey.into());
        }
        self.attributes
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::UnknownAttribute(key.to_string()).into())
    }

    /// Names of all attributes, in no particular order.
    pub fn attribute_names(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the entry has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
