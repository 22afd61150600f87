//! Load command.
//!
//! Prints the statements that load profiles and their dependencies.

use std::io::Write;
use std::path::Path;

use crate::cli::{current_environment, load_registry, working_dir};
use crate::core::session;
use crate::error::Result;

/// Load `profiles`, or the profiles mapped to the working directory.
pub fn execute(main: &Path, profiles: &[String]) -> Result<()> {
    let registry = load_registry(main)?;
    let mut env = current_environment();
    let cwd = working_dir()?;

    session::load(&registry, &mut env, profiles, &cwd.display().to_string())?;

    let mut stdout = std::io::stdout();
    write!(stdout, "{}", env.write_statements())?;
    stdout.flush()?;
    Ok(())
}
