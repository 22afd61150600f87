//! Command-line interface.

pub mod completions;
pub mod config;
pub mod current;
pub mod debug;
pub mod load;
pub mod output;
pub mod unload;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::core::config::{self as configuration, Configuration};
use crate::core::constants;
use crate::core::environment::Environment;
use crate::core::registry::Registry;
use crate::core::store::Prompt;
use crate::error::Result;

/// envmanager - manage the environment variables of your shell.
#[derive(Parser)]
#[command(
    name = "envmanager",
    about = "Load environment variable profiles backed by KeePass and password-store",
    version,
    after_help = "Statements are printed for your shell: eval \"$(envmanager load <profile>)\""
)]
pub struct Cli {
    /// Main configuration file [default: ~/.envmanager.toml]
    #[arg(short, long, global = true, env = constants::CONFIG_VAR)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Load profiles into this shell's environment
    ///
    /// Without profiles, the directory mapping of the working directory is loaded.
    Load {
        /// Profiles to load
        profiles: Vec<String>,
    },

    /// Unload profiles from this shell's environment
    Unload {
        /// Profiles to unload
        profiles: Vec<String>,
        /// Unload every currently loaded profile
        #[arg(long)]
        all: bool,
    },

    /// Show currently loaded profiles
    #[command(visible_alias = "loaded")]
    Current,

    /// Manage your configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Inspect your configuration
    Debug {
        #[command(subcommand)]
        action: DebugAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Create an empty main configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Add storages, profiles and mappings
    Add {
        #[command(subcommand)]
        item: AddItem,
    },
}

/// Things `config add` can add.
#[derive(Subcommand)]
pub enum AddItem {
    /// Add a storage with the default settings of its type
    Storage {
        /// Storage type (keepass, pass)
        #[arg(value_name = "TYPE")]
        kind: String,
        /// Storage name (letters and digits)
        name: String,
        /// Overwrite an existing storage
        #[arg(short, long)]
        force: bool,
    },

    /// Add a profile reading from a configured storage
    Profile {
        /// Storage the entry lives in
        storage: String,
        /// Profile name (letters and digits)
        name: String,
        /// Path of the entry in the storage
        #[arg(short, long, default_value = "")]
        path: String,
        /// Constant variable, NAME=VALUE
        #[arg(long = "const", value_name = "NAME=VALUE")]
        const_env: Vec<String>,
        /// Variable read from an entry attribute, NAME=ATTRIBUTE
        #[arg(long = "env", value_name = "NAME=ATTRIBUTE")]
        env: Vec<String>,
        /// Profile loaded together with this one
        #[arg(short, long = "depends-on", value_name = "PROFILE")]
        depends_on: Vec<String>,
        /// Overwrite an existing profile
        #[arg(short, long)]
        force: bool,
    },

    /// Map the working directory to profiles
    ///
    /// Without --profile, the currently loaded profiles are mapped.
    Mapping {
        /// Profile to map
        #[arg(long = "profile", value_name = "PROFILE")]
        profiles: Vec<String>,
        /// Write to ./.envmanager.toml instead of the main file
        #[arg(short, long)]
        local: bool,
    },
}

/// Debug subcommands.
#[derive(Subcommand)]
pub enum DebugAction {
    /// Show which config files are processed, in order
    Files,

    /// List storages, or run the checks of one storage
    Storage {
        /// Storage to check
        name: Option<String>,
    },

    /// Show a profile, its dependencies and problems
    Profile {
        /// Profile name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the attribute names of an entry
    Entry {
        /// Storage name
        storage: String,
        /// Path of the entry
        path: String,
    },
}

/// Execute a command.
pub fn execute(command: Command, config: Option<PathBuf>) -> Result<()> {
    use Command::*;

    let main = match config {
        Some(path) => path,
        None => Configuration::default_path()?,
    };
    debug!(path = %main.display(), "main config file");

    match command {
        Load { profiles } => load::execute(&main, &profiles),
        Unload { profiles, all } => unload::execute(&main, &profiles, all),
        Current => current::execute(),
        Config { action } => match action {
            ConfigAction::Init { force } => config::init(&main, force),
            ConfigAction::Add { item } => match item {
                AddItem::Storage { kind, name, force } => {
                    config::add_storage(&main, &kind, &name, force)
                }
                AddItem::Profile {
                    storage,
                    name,
                    path,
                    const_env,
                    env,
                    depends_on,
                    force,
                } => config::add_profile(
                    &main,
                    config::NewProfile {
                        storage,
                        name,
                        path,
                        const_env,
                        env,
                        depends_on,
                    },
                    force,
                ),
                AddItem::Mapping { profiles, local } => config::add_mapping(&main, &profiles, local),
            },
        },
        Debug { action } => match action {
            DebugAction::Files => debug::files(&main),
            DebugAction::Storage { name } => debug::storage(&main, name.as_deref()),
            DebugAction::Profile { name, json } => debug::profile(&main, &name, json),
            DebugAction::Entry { storage, path } => debug::entry(&main, &storage, &path),
        },
        Completions { shell } => completions::execute(shell),
    }
}

/// Working directory as used for directory mappings.
pub(crate) fn working_dir() -> Result<PathBuf> {
    Ok(std::env::current_dir()?)
}

/// The main file merged with every config file above the working directory.
///
/// On a merge failure the files already processed, the offending file and
/// the files still to process are listed on stderr.
pub(crate) fn load_configuration(main: &Path) -> Result<Configuration> {
    let cwd = working_dir()?;
    let files = configuration::discover(&cwd, main);

    let mut config = Configuration::load_from_file(main)?;
    for (i, file) in files.iter().enumerate() {
        if file == main {
            continue;
        }
        if let Err(e) = config.merge_file(file) {
            let shown: Vec<_> = files.iter().map(|f| f.display()).collect();
            output::note("Failed to merge configuration.\nAlready processed config files:");
            eprint!("{}", output::format_list(&shown[..i], "\t- ", "\t<none>\n"));
            output::note(&format!("Offending config file:\n\t{}", file.display()));
            output::note("Still to process:");
            eprint!("{}", output::format_list(&shown[i + 1..], "\t- ", "\t<none>\n"));
            return Err(e);
        }
    }
    Ok(config)
}

/// Registry for the merged configuration, asking for passwords on the terminal.
pub(crate) fn load_registry(main: &Path) -> Result<Registry> {
    let config = load_configuration(main)?;
    Registry::from_config(&config, Rc::new(Prompt))
}

/// Snapshot of the process environment.
pub(crate) fn current_environment() -> Environment {
    let mut env = Environment::new();
    env.load();
    env
}
