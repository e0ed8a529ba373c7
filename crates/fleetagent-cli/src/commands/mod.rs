//! CLI command definitions and dispatch.

pub mod backoff;
pub mod cni_config;
pub mod render;

use clap::{Parser, Subcommand};

/// fleetctl — inspect fleetagent state changes and network setup.
#[derive(Parser, Debug)]
#[command(name = "fleetctl", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Path to the agent configuration file.
    #[arg(long, global = true, env = "FLEETAGENT_CONFIG")]
    pub config: Option<std::path::PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the events in a JSON fixture as the agent logs them.
    Render(render::RenderArgs),
    /// Validate a VPC ENI plugin config and print it normalized.
    CniConfig(cni_config::CniConfigArgs),
    /// Print the network setup retry schedule.
    Backoff(backoff::BackoffArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Render(args) => render::execute(&args, cli.config.as_deref()),
        Command::CniConfig(args) => cni_config::execute(&args),
        Command::Backoff(args) => backoff::execute(&args, cli.config.as_deref()),
    }
}
