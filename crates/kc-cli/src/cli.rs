//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::OutputFormat;

/// kc-realm - plan and apply Keycloak realm configuration.
#[derive(Debug, Parser)]
#[command(name = "kc-realm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Server URL (overrides config and KC_SERVER_URL).
    #[arg(short, long, global = true)]
    pub server: Option<String>,

    /// Configuration file (defaults to ~/.keycloak/kc.toml).
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Output format (overrides config).
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show what apply would change.
    Plan(PlanArgs),

    /// Create, update or replace the realm and record the new state.
    Apply(ApplyArgs),

    /// Re-read the tracked realm from the server.
    Refresh(StateArgs),

    /// Start tracking an existing realm.
    Import(ImportArgs),

    /// Delete the tracked realm.
    Destroy(DestroyArgs),

    /// List the fields a realm configuration may set.
    Schema,
}

/// Arguments for `plan`.
#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Realm configuration (JSON object).
    #[arg(short, long)]
    pub config: PathBuf,

    /// Tracked state; a missing file plans a create.
    #[arg(long)]
    pub state: Option<PathBuf>,
}

/// Arguments for `apply`.
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Realm configuration (JSON object).
    #[arg(short, long)]
    pub config: PathBuf,

    /// State file to read and rewrite.
    #[arg(long)]
    pub state: PathBuf,
}

/// Arguments naming a state file.
#[derive(Debug, Args)]
pub struct StateArgs {
    /// State file.
    #[arg(long)]
    pub state: PathBuf,
}

/// Arguments for `import`.
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Realm identity on the server.
    pub id: String,

    /// State file to create.
    #[arg(long)]
    pub state: PathBuf,
}

/// Arguments for `destroy`.
#[derive(Debug, Args)]
pub struct DestroyArgs {
    /// State file of the realm to delete.
    #[arg(long)]
    pub state: PathBuf,

    /// Skip confirmation.
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn plan_state_is_optional() {
        let cli = Cli::try_parse_from(["kc-realm", "plan", "-c", "acme.json"]).unwrap();
        match cli.command {
            Command::Plan(args) => {
                assert_eq!(args.config, PathBuf::from("acme.json"));
                assert!(args.state.is_none());
            }
            other => panic!("expected plan, got {other:?}"),
        }
    }

    #[test]
    fn apply_requires_state() {
        assert!(Cli::try_parse_from(["kc-realm", "apply", "--config", "acme.json"]).is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "kc-realm",
            "destroy",
            "--state",
            "acme.state.json",
            "--force",
            "-o",
            "json",
            "--server",
            "https://sso.example.com",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.server.as_deref(), Some("https://sso.example.com"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Destroy(DestroyArgs { force: true, .. })));
    }

    #[test]
    fn import_takes_the_id_positionally() {
        let cli =
            Cli::try_parse_from(["kc-realm", "import", "legacy", "--state", "s.json"]).unwrap();
        assert!(matches!(cli.command, Command::Import(ImportArgs { ref id, .. }) if id == "legacy"));
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        assert!(Cli::try_parse_from(["kc-realm", "-o", "xml", "schema"]).is_err());
    }
}
