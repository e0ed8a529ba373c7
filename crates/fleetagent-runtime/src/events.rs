//! Construction of state-change events from live objects.
//!
//! Events copy the fields that are submitted as part of the event and keep
//! a `Weak` handle to the object for everything that is only rendered.
//! Dropping a task therefore never dangles an event that is still queued
//! for logging; its metadata clause simply disappears.

use std::sync::{Arc, Weak};

use fleetagent_common::attachment::EniAttachment;
use fleetagent_statechange::getter::{ContainerMetadataGetter, TaskMetadataGetter};
use fleetagent_statechange::{AttachmentStateChange, ContainerStateChange, TaskStateChange};

use crate::container::Container;
use crate::task::Task;

/// Builds the event for a container's last observed status.
#[must_use]
pub fn container_state_change(task_arn: &str, container: &Arc<Container>) -> ContainerStateChange {
    let metadata = Arc::downgrade(container) as Weak<dyn ContainerMetadataGetter>;
    let state = container.read();
    let mut change = ContainerStateChange::new(task_arn, container.name(), state.known_status)
        .with_runtime_id(state.runtime_id.clone())
        .with_network_bindings(state.network_bindings.clone())
        .with_metadata(metadata);
    if let Some(digest) = container.image_digest() {
        change = change.with_image_digest(digest);
    }
    if let Some(exit_code) = state.exit_code {
        change = change.with_exit_code(exit_code);
    }
    if let Some(reason) = &state.reason {
        change = change.with_reason(reason.clone());
    }
    drop(state);
    tracing::debug!(task = %task_arn, change = %change, "built container state change");
    change
}

/// Builds the event for a task's last observed status.
///
/// Containers whose observed status has not been acknowledged yet are
/// included as sub-events in definition order, followed by any queued
/// managed-agent changes. The attachment is included until its status has
/// been sent, and queued agent changes until
/// [`Task::ack_managed_agents`] is called. Building the event leaves the
/// task unchanged.
#[must_use]
pub fn task_state_change(task: &Arc<Task>, reason: Option<&str>) -> TaskStateChange {
    let metadata = Arc::downgrade(task) as Weak<dyn TaskMetadataGetter>;
    let mut change = TaskStateChange::new(task.arn(), task.known_status()).with_metadata(metadata);
    if let Some(reason) = reason {
        change = change.with_reason(reason);
    }

    {
        let state = task.read();
        if let Some(at) = state.pull_started_at {
            change = change.with_pull_started_at(at);
        }
        if let Some(at) = state.pull_stopped_at {
            change = change.with_pull_stopped_at(at);
        }
        if let Some(at) = state.execution_stopped_at {
            change = change.with_execution_stopped_at(at);
        }
    }

    if let Some(attachment) = task.attachment().filter(|a| !a.is_sent()) {
        change = change.with_attachment(Arc::clone(attachment));
    }
    for container in task.containers().iter().filter(|c| c.has_unsent_change()) {
        change = change.with_container(container_state_change(task.arn(), container));
    }
    for agent in task.pending_managed_agents() {
        change = change.with_managed_agent(agent);
    }

    if !change.has_ordered_timestamps() {
        tracing::warn!(
            task = %task.arn(),
            pull_started_at = ?change.pull_started_at(),
            pull_stopped_at = ?change.pull_stopped_at(),
            execution_stopped_at = ?change.execution_stopped_at(),
            "task timestamps are out of order"
        );
    }
    tracing::debug!(change = %change, "built task state change");
    change
}

/// Builds the event for an attachment's current status.
#[must_use]
pub fn attachment_state_change(attachment: &Arc<EniAttachment>) -> AttachmentStateChange {
    let change = AttachmentStateChange::new(Arc::clone(attachment));
    tracing::debug!(change = %change, "built attachment state change");
    change
}
