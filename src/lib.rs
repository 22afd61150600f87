//! envmanager - load and unload environment variable profiles in your shell.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── load          # Print statements that load profiles
//! │   ├── unload        # Print statements that unload profiles
//! │   ├── current       # Show loaded profiles
//! │   ├── config        # Create and extend config files
//! │   ├── debug         # Inspect files, storages, profiles and entries
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # .envmanager.toml discovery and merging
//!     ├── entry         # Attribute bag read from a storage
//!     ├── environment   # Pending exports and unsets
//!     ├── profile       # Profile definition and dependency resolution
//!     ├── registry      # Lookup tables for one invocation
//!     ├── session       # Load/unload orchestration
//!     └── store/        # Secret storage backends
//!         ├── mod       # Store trait
//!         ├── keepass   # KeePass via keepassxc-cli
//!         └── pass      # password-store via gpg
//! ```
//!
//! # Usage
//!
//! `load` and `unload` print shell statements on stdout for the shell to
//! evaluate:
//!
//! ```text
//! eval "$(envmanager load db)"
//! eval "$(envmanager unload --all)"
//! ```

pub mod cli;
pub mod core;
pub mod error;
