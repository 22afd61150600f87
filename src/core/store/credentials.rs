//! Credential providers for storages that need a password.

use std::io::{self, IsTerminal};

use dialoguer::Password;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Result, StorageError};

/// Supplies the password a storage needs to open its database.
pub trait Credentials {
    /// Password for the storage called `storage`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Credentials` if no password can be obtained.
    fn password(&self, storage: &str) -> Result<Zeroizing<String>>;
}

/// Asks the user on the terminal.
///
/// The prompt is drawn on stderr so it never mixes with the statements
/// written to stdout. Piped stdin is read as a single line instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct Prompt;

impl Credentials for Prompt {
    fn password(&self, storage: &str) -> Result<Zeroizing<String>> {
        debug!(storage = %storage, "requesting password");

        if !io::stdin().is_terminal() {
            let mut input = Zeroizing::new(String::new());
            io::stdin().read_line(&mut input)?;
            return Ok(Zeroizing::new(input.trim_end_matches(['\r', '\n']).to_string()));
        }

        let password = Password::new()
            .with_prompt(format!("Enter password for {}", storage))
            .allow_empty_password(true)
            .interact()
            .map_err(|e| StorageError::Credentials {
                storage: storage.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Zeroizing::new(password))
    }
}

/// Always returns the same password.
#[derive(Clone)]
pub struct Fixed(Zeroizing<String>);

impl Fixed {
    pub fn new(password: impl Into<String>) -> Self {
        Self(Zeroizing::new(password.into()))
    }
}

impl std::fmt::Debug for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Fixed(<redacted>)")
    }
}

impl Credentials for Fixed {
    fn password(&self, _storage: &str) -> Result<Zeroizing<String>> {
        Ok(self.0.clone())
    }
}
