//! Unload command.
//!
//! Prints the statements that unload profiles. Dependencies stay loaded.

use std::io::Write;
use std::path::Path;

use crate::cli::{current_environment, load_registry};
use crate::core::session;
use crate::error::{ProfileError, Result};

/// Unload `profiles`, or everything currently loaded when `all` is set.
pub fn execute(main: &Path, profiles: &[String], all: bool) -> Result<()> {
    if profiles.is_empty() && !all {
        return Err(ProfileError::NothingToUnload.into());
    }

    let registry = load_registry(main)?;
    let mut env = current_environment();

    session::unload(&registry, &mut env, profiles, all)?;

    let mut stdout = std::io::stdout();
    write!(stdout, "{}", env.write_statements())?;
    stdout.flush()?;
    Ok(())
}
