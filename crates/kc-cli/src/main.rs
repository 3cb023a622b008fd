//! # kc-realm
//!
//! Plan and apply Keycloak realm configuration from the command line.

#![forbid(unsafe_code)]
#![deny(warnings)]

use clap::Parser;
use kc_cli::{cli::Cli, commands::run, config::CliConfig, output::error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays parseable.
    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match CliConfig::load(cli.config_file.as_deref()) {
        Ok(c) => c.with_server(cli.server.as_deref()),
        Err(e) => {
            error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };
    let format = cli.output.unwrap_or(config.output_format);

    if let Err(e) = run(cli.command, &config, format).await {
        error(&e.to_string());
        std::process::exit(1);
    }
}
