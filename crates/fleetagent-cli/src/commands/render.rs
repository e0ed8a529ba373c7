//! `fleetctl render` — Render recorded events as the agent logs them.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use fleetagent_common::config::AgentConfig;
use fleetagent_statechange::wire::{
    SubmitAttachmentStateChangesRequest, SubmitContainerStateChangeRequest,
    SubmitTaskStateChangeRequest,
};
use fleetagent_statechange::{AttachmentStateChange, ContainerStateChange, TaskStateChange};
use serde::Deserialize;

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// JSON file with `containers`, `tasks`, and `attachments` arrays.
    pub file: PathBuf,

    /// Print the submission request body under each rendered line.
    #[arg(long)]
    pub wire: bool,

    /// Cluster name used in request bodies. Defaults to the configured
    /// cluster.
    #[arg(long)]
    pub cluster: Option<String>,
}

/// Events recorded for offline rendering.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventFixture {
    /// Container events.
    pub containers: Vec<ContainerStateChange>,
    /// Task events.
    pub tasks: Vec<TaskStateChange>,
    /// Attachment events.
    pub attachments: Vec<AttachmentStateChange>,
}

/// Executes the `render` command.
///
/// # Errors
///
/// Returns an error if the fixture cannot be read or parsed, or if the
/// agent configuration is needed and cannot be loaded.
pub fn execute(args: &RenderArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let fixture: EventFixture = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", args.file.display()))?;
    tracing::debug!(
        containers = fixture.containers.len(),
        tasks = fixture.tasks.len(),
        attachments = fixture.attachments.len(),
        "loaded event fixture"
    );

    let cluster = if args.wire {
        Some(resolve_cluster(args, config_path)?)
    } else {
        None
    };
    for line in render_fixture(&fixture, cluster.as_deref())? {
        println!("{line}");
    }
    Ok(())
}

/// Picks the cluster for request bodies: the `--cluster` flag, then the
/// agent configuration.
///
/// # Errors
///
/// Returns an error if the agent configuration cannot be loaded.
pub fn resolve_cluster(args: &RenderArgs, config_path: Option<&Path>) -> anyhow::Result<String> {
    if let Some(cluster) = &args.cluster {
        return Ok(cluster.clone());
    }
    Ok(AgentConfig::load_or_default(config_path)?.cluster)
}

/// Renders every event in the fixture, containers first, then tasks, then
/// attachments. When `cluster` is given, each rendering is followed by the
/// JSON request body for it.
///
/// # Errors
///
/// Returns an error if a request body cannot be serialized.
pub fn render_fixture(
    fixture: &EventFixture,
    cluster: Option<&str>,
) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();
    for change in &fixture.containers {
        lines.push(format!("container: {change}"));
        if let Some(cluster) = cluster {
            lines.push(serde_json::to_string(
                &SubmitContainerStateChangeRequest::from_change(cluster, change),
            )?);
        }
    }
    for change in &fixture.tasks {
        lines.push(format!("task: {change}"));
        if let Some(cluster) = cluster {
            lines.push(serde_json::to_string(
                &SubmitTaskStateChangeRequest::from_change(cluster, change),
            )?);
        }
    }
    for change in &fixture.attachments {
        lines.push(format!("attachment: {change}"));
        let request = cluster
            .and_then(|cluster| SubmitAttachmentStateChangesRequest::from_change(cluster, change));
        if let Some(request) = request {
            lines.push(serde_json::to_string(&request)?);
        }
    }
    Ok(lines)
}
