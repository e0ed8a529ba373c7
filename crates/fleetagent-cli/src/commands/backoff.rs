//! `fleetctl backoff` — Print the network setup retry schedule.

use std::path::Path;

use clap::Args;
use fleetagent_cni::backoff::ExponentialBackoff;
use fleetagent_common::config::AgentConfig;

use crate::output::format_duration;

/// Arguments for the `backoff` command.
#[derive(Args, Debug)]
pub struct BackoffArgs {
    /// Override the configured number of attempts.
    #[arg(long)]
    pub max_retries: Option<u32>,
}

/// Executes the `backoff` command.
///
/// # Errors
///
/// Returns an error if the agent configuration cannot be loaded.
pub fn execute(args: &BackoffArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = AgentConfig::load_or_default(config_path)?;
    if let Some(max_retries) = args.max_retries {
        config.setup_backoff.max_retries = max_retries;
    }
    config.setup_backoff.validate()?;

    let backoff = ExponentialBackoff::new(config.setup_backoff);
    for line in schedule_lines(&backoff) {
        println!("{line}");
    }
    Ok(())
}

fn schedule_lines(backoff: &ExponentialBackoff) -> Vec<String> {
    let config = backoff.config();
    let mut lines = vec![format!(
        "{} attempts, jitter ±{:.0}%, multiple {}",
        config.max_retries,
        config.jitter * 100.0,
        config.multiple
    )];
    for (retry, delay) in backoff.schedule().into_iter().enumerate() {
        lines.push(format!("after attempt {}: wait ~{}", retry + 1, format_duration(delay)));
    }
    lines.push(format!("after attempt {}: give up", config.max_retries));
    lines
}
