//! Command implementations.

pub mod realm;
pub mod schema;
pub mod state;

use std::sync::Arc;

use kc_provider::{HttpRealmClient, RealmController, REALM_SCHEMA};

use crate::cli::Command;
use crate::config::OutputFormat;
use crate::CliConfig;

/// Runs a command against the configured server.
pub async fn run(command: Command, config: &CliConfig, format: OutputFormat) -> crate::CliResult<()> {
    if let Command::Schema = command {
        return schema::run_schema(format);
    }

    let controller = connect(config)?;
    match command {
        Command::Plan(args) => realm::plan(&controller, &args, format),
        Command::Apply(args) => realm::apply(&controller, &args, format).await,
        Command::Refresh(args) => realm::refresh(&controller, &args, format).await,
        Command::Import(args) => realm::import(&controller, &args, format).await,
        Command::Destroy(args) => realm::destroy(&controller, &args, format).await,
        Command::Schema => schema::run_schema(format),
    }
}

/// Builds a controller talking to the configured server.
pub fn connect(config: &CliConfig) -> crate::CliResult<RealmController> {
    config.provider.validate()?;
    let client = HttpRealmClient::new(&config.provider)?;
    tracing::debug!(server = %client.base_url(), "using management API");
    Ok(RealmController::new(Arc::new(client), &REALM_SCHEMA))
}
