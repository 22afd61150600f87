//! Input validation for names entered on the command line.
//!
//! Validates storage and profile names, variable names, and `NAME=VALUE`
//! assignments.

use crate::error::{Result, ValidationError};

/// Validate a storage or profile name.
///
/// Names must be non-empty and consist of ASCII letters and digits only.
///
/// # Errors
///
/// Returns `ValidationError::EmptyName` or `ValidationError::InvalidName`.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName.into());
    }

    if let Some((i, ch)) = name
        .chars()
        .enumerate()
        .find(|(_, ch)| !ch.is_ascii_alphanumeric())
    {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: format!(
                "invalid character '{}' at position {}. Only letters and digits are allowed",
                ch,
                i + 1
            ),
        }
        .into());
    }

    Ok(())
}

/// Validate an environment variable name.
///
/// Variable names may contain ASCII letters, digits and underscores.
///
/// # Errors
///
/// Returns `ValidationError::EmptyKey` or `ValidationError::InvalidName`.
pub fn validate_var_name(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey.into());
    }

    for (i, ch) in key.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(ValidationError::InvalidName {
                name: key.to_string(),
                reason: format!(
                    "invalid character '{}' at position {}. Only A-Z, 0-9, and underscore are allowed",
                    ch,
                    i + 1
                ),
            }
            .into());
        }
    }

    Ok(())
}

/// Split `NAME=VALUE` into its parts, validating `NAME` as a variable name.
///
/// The value may be empty and may itself contain `=`.
///
/// # Errors
///
/// Returns `ValidationError::InvalidAssignment` when there is no `=`, or the
/// error of [`validate_var_name`].
pub fn parse_assignment(input: &str) -> Result<(String, String)> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| ValidationError::InvalidAssignment(input.to_string()))?;
    let key = key.trim();
    validate_var_name(key)?;
    Ok((key.to_string(), value.to_string()))
}
