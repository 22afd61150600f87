//! Current command.
//!
//! Lists the profiles loaded in this shell.

use crate::cli::{current_environment, output};
use crate::core::session;
use crate::error::Result;

/// Show loaded profiles, sorted by name.
pub fn execute() -> Result<()> {
    let mut loaded = session::loaded_profiles(&current_environment());

    if loaded.is_empty() {
        output::data("No profiles loaded");
        return Ok(());
    }

    loaded.sort();
    output::data(&loaded.join("\n"));
    Ok(())
}
