//! Core library components.
//!
//! Profiles, storages and the registry that ties them together, plus the
//! configuration files they are read from and the environment changes they
//! produce.

pub mod config;
pub mod constants;
pub mod entry;
pub mod environment;
pub mod profile;
pub mod registry;
pub mod session;
pub mod store;
pub mod validation;
