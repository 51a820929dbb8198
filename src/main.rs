#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! opshim — typed access to 1Password vaults and items through `op`.

mod cli;
mod commands;
mod types;

use anyhow::Context;
use clap::Parser;
use opshim::OpClient;
use tracing_subscriber::EnvFilter;

use cli::{Cli, OutputCtx, write_error};
use types::ErrorOutput;

/// Log to stderr; stdout carries command output. `RUST_LOG` overrides the default.
fn init_logging(debug: bool) -> anyhow::Result<()> {
    let default = if debug { "opshim=debug" } else { "warn" };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default).context("invalid default log filter")?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install log subscriber")
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.debug_enabled()) {
        eprintln!("warning: {err:#}");
    }

    let ctx = OutputCtx::new(cli.output, cli.json, cli.fields.as_deref(), cli.no_header);
    let client = OpClient::with_config(cli.client_config());

    match commands::dispatch(&cli.command, &client, &ctx) {
        Ok(()) => {}
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            let error_output = ErrorOutput::from_op_error(&err);
            write_error(&error_output, cli.output, cli.json);
            std::process::exit(err.exit_code());
        }
    }
}
