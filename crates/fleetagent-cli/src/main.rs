//! # fleetctl — fleetagent CLI
//!
//! Offline inspection tool for the node agent: renders state-change events
//! the way the agent logs them, validates network plugin configs, and
//! prints the setup retry schedule.

mod commands;
mod output;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::from_default_env();
    if cli.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    commands::execute(cli)
}
