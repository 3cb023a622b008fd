//! # kc-cli
//!
//! Operator CLI for declaratively managed Keycloak realms.
//!
//! The `kc-realm` binary drives a [`kc_provider::RealmController`] from
//! JSON files on disk:
//! - `plan` / `apply` a realm configuration against tracked state
//! - `refresh` tracked state from the server
//! - `import` an existing realm into a state file
//! - `destroy` the tracked realm
//! - `schema` to list the fields a configuration may set

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
