//! envmanager - manage the environment variables of your shell.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envmanager::cli::output;
use envmanager::cli::{execute, Cli};
use envmanager::core::constants;
use envmanager::error::{ConfigError, Error, ProfileError, StorageError};

fn main() {
    let cli = Cli::parse();

    // stdout is evaluated by the shell, so logs must stay on stderr
    let filter = EnvFilter::try_from_env(constants::LOG_VAR).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envmanager=debug")
        } else {
            EnvFilter::new("envmanager=warn")
        }
    });

    let json = std::env::var(constants::LOG_FORMAT_VAR).is_ok_and(|f| f == "json");
    let (plain, structured) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time();
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(structured)
        .init();

    if let Err(e) = execute(cli.command, cli.config) {
        let suggestion = match &e {
            Error::Config(ConfigError::NotInitialized(_)) => Some("run: envmanager config init"),
            Error::Config(ConfigError::Collision { .. }) => {
                Some("run: envmanager debug files, or list the name under [options.collision_detection_ignore]")
            }
            Error::Storage(StorageError::ToolMissing { .. }) => {
                Some("install it or add it to your PATH")
            }
            Error::Profile(ProfileError::NoMappingFound(_)) => {
                Some("name the profiles to load, or run: envmanager config add mapping")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
