//! Task state change event.

use std::fmt;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use fleetagent_common::attachment::EniAttachment;
use fleetagent_common::types::{ManagedAgentStateChange, TaskStatus};
use serde::{Deserialize, Serialize};

use crate::container::ContainerStateChange;
use crate::getter::TaskMetadataGetter;
use crate::render::{self, Clauses};

/// One task's transition, as submitted through `SubmitTaskStateChange`.
///
/// Container and managed-agent sub-events are kept in the order the
/// producer added them, and are rendered and submitted in that order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStateChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attachment: Option<Arc<EniAttachment>>,
    task_arn: String,
    status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    containers: Vec<ContainerStateChange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    managed_agents: Vec<ManagedAgentStateChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pull_started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pull_stopped_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    execution_stopped_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    metadata: Option<Weak<dyn TaskMetadataGetter>>,
}

impl TaskStateChange {
    /// Creates an event carrying only the required fields.
    #[must_use]
    pub fn new(task_arn: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            task_arn: task_arn.into(),
            status,
            ..Self::default()
        }
    }

    /// Sets the human-readable reason for the transition.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// References the task's network attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Arc<EniAttachment>) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Appends a container sub-event.
    #[must_use]
    pub fn with_container(mut self, change: ContainerStateChange) -> Self {
        self.containers.push(change);
        self
    }

    /// Appends a managed-agent sub-event.
    #[must_use]
    pub fn with_managed_agent(mut self, change: ManagedAgentStateChange) -> Self {
        self.managed_agents.push(change);
        self
    }

    /// Sets when image pulls started.
    #[must_use]
    pub fn with_pull_started_at(mut self, at: DateTime<Utc>) -> Self {
        self.pull_started_at = Some(at);
        self
    }

    /// Sets when image pulls finished.
    #[must_use]
    pub fn with_pull_stopped_at(mut self, at: DateTime<Utc>) -> Self {
        self.pull_stopped_at = Some(at);
        self
    }

    /// Sets when the essential container stopped.
    #[must_use]
    pub fn with_execution_stopped_at(mut self, at: DateTime<Utc>) -> Self {
        self.execution_stopped_at = Some(at);
        self
    }

    /// Attaches a metadata getter without taking ownership of it.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Weak<dyn TaskMetadataGetter>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Task identifier.
    pub fn task_arn(&self) -> &str {
        &self.task_arn
    }

    /// Status being reported.
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Reason for the transition, if any.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Network attachment, when relevant to this transition.
    pub const fn attachment(&self) -> Option<&Arc<EniAttachment>> {
        self.attachment.as_ref()
    }

    /// Container sub-events in insertion order.
    pub fn containers(&self) -> &[ContainerStateChange] {
        &self.containers
    }

    /// Managed-agent sub-events in insertion order.
    pub fn managed_agents(&self) -> &[ManagedAgentStateChange] {
        &self.managed_agents
    }

    /// When image pulls started, if known.
    pub const fn pull_started_at(&self) -> Option<DateTime<Utc>> {
        self.pull_started_at
    }

    /// When image pulls finished, if known.
    pub const fn pull_stopped_at(&self) -> Option<DateTime<Utc>> {
        self.pull_stopped_at
    }

    /// When the essential container stopped, if known.
    pub const fn execution_stopped_at(&self) -> Option<DateTime<Utc>> {
        self.execution_stopped_at
    }

    /// Returns `false` if any two set timestamps run backwards.
    ///
    /// Producers are expected to report pull-started ≤ pull-stopped ≤
    /// execution-stopped; unset timestamps are skipped.
    pub fn has_ordered_timestamps(&self) -> bool {
        let set: Vec<DateTime<Utc>> = [
            self.pull_started_at,
            self.pull_stopped_at,
            self.execution_stopped_at,
        ]
        .into_iter()
        .flatten()
        .collect();
        set.windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// Resolves the metadata getter.
    ///
    /// Returns `None` both when no getter was supplied and when the task
    /// behind it no longer exists.
    pub fn metadata(&self) -> Option<Arc<dyn TaskMetadataGetter>> {
        self.metadata.as_ref().and_then(Weak::upgrade)
    }

    /// Renders the single-line diagnostic summary of this event.
    #[must_use]
    pub fn render(&self) -> String {
        let mut clauses = Clauses::new(", ", format_args!("{} -> {}", self.task_arn, self.status));
        if let Some(metadata) = self.metadata() {
            clauses.push(format_args!(
                "Known Sent: {}, PullStartedAt: {}, PullStoppedAt: {}, ExecutionStoppedAt: {}",
                metadata.known_sent_status(),
                render::instant(metadata.pull_started_at()),
                render::instant(metadata.pull_stopped_at()),
                render::instant(metadata.execution_stopped_at())
            ));
        }
        clauses.push_opt(self.attachment.as_deref());
        for container in &self.containers {
            clauses.push(format_args!("container change: {container}"));
        }
        for agent in &self.managed_agents {
            clauses.push(format_args!("managed agent: {agent}"));
        }
        clauses.finish()
    }
}

impl fmt::Display for TaskStateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::RwLock;

    use chrono::TimeZone;
    use fleetagent_common::types::{AttachmentStatus, ContainerStatus};

    use super::*;

    #[derive(Default)]
    struct FakeTask {
        sent: &'static str,
        pull_started_at: RwLock<Option<DateTime<Utc>>>,
        pull_stopped_at: Option<DateTime<Utc>>,
    }

    impl TaskMetadataGetter for FakeTask {
        fn known_sent_status(&self) -> String {
            self.sent.to_owned()
        }

        fn pull_started_at(&self) -> Option<DateTime<Utc>> {
            *self.pull_started_at.read().expect("lock")
        }

        fn pull_stopped_at(&self) -> Option<DateTime<Utc>> {
            self.pull_stopped_at
        }

        fn execution_stopped_at(&self) -> Option<DateTime<Utc>> {
            None
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 6, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn agent(name: &str) -> ManagedAgentStateChange {
        ManagedAgentStateChange {
            managed_agent_name: name.into(),
            status: "RUNNING".into(),
            ..ManagedAgentStateChange::default()
        }
    }

    #[test]
    fn bare_task_renders_arrow_only() {
        let change = TaskStateChange::new("arn:1", TaskStatus::Running);
        assert_eq!(change.render(), "arn:1 -> RUNNING");
    }

    #[test]
    fn single_container_sub_event_is_appended() {
        let container = ContainerStateChange::new("arn:1", "web", ContainerStatus::Running);
        let change = TaskStateChange::new("arn:1", TaskStatus::Running).with_container(container);
        assert_eq!(
            change.render(),
            "arn:1 -> RUNNING, container change: containerName=web containerStatus=RUNNING"
        );
    }

    #[test]
    fn sub_events_keep_insertion_order() {
        let change = TaskStateChange::new("arn:1", TaskStatus::Stopped)
            .with_container(ContainerStateChange::new("arn:1", "b", ContainerStatus::Stopped))
            .with_container(ContainerStateChange::new("arn:1", "a", ContainerStatus::Stopped))
            .with_managed_agent(agent("second"))
            .with_managed_agent(agent("first"));
        assert_eq!(
            change.render(),
            "arn:1 -> STOPPED, \
             container change: containerName=b containerStatus=STOPPED, \
             container change: containerName=a containerStatus=STOPPED, \
             managed agent: managedAgentName=second status=RUNNING, \
             managed agent: managedAgentName=first status=RUNNING"
        );
    }

    #[test]
    fn metadata_renders_unset_timestamps_as_epoch() {
        let metadata: Arc<dyn TaskMetadataGetter> = Arc::new(FakeTask {
            sent: "PULLED",
            pull_stopped_at: Some(at(2)),
            ..FakeTask::default()
        });
        let change = TaskStateChange::new("arn:1", TaskStatus::Running)
            .with_metadata(Arc::downgrade(&metadata));
        assert_eq!(
            change.render(),
            "arn:1 -> RUNNING, Known Sent: PULLED, \
             PullStartedAt: 1970-01-01 00:00:00 UTC, \
             PullStoppedAt: 2026-05-06 02:00:00 UTC, \
             ExecutionStoppedAt: 1970-01-01 00:00:00 UTC"
        );
    }

    #[test]
    fn metadata_is_read_at_render_time() {
        let task = Arc::new(FakeTask {
            sent: "NONE",
            ..FakeTask::default()
        });
        let metadata: Arc<dyn TaskMetadataGetter> = task.clone();
        let change = TaskStateChange::new("arn:1", TaskStatus::Pulled)
            .with_metadata(Arc::downgrade(&metadata));
        assert!(change.render().contains("PullStartedAt: 1970-01-01 00:00:00 UTC"));

        *task.pull_started_at.write().expect("lock") = Some(at(1));
        assert!(change.render().contains("PullStartedAt: 2026-05-06 01:00:00 UTC"));
    }

    #[test]
    fn dropped_task_omits_metadata_clause() {
        let metadata: Arc<dyn TaskMetadataGetter> = Arc::new(FakeTask::default());
        let change = TaskStateChange::new("arn:1", TaskStatus::Running)
            .with_metadata(Arc::downgrade(&metadata));
        drop(metadata);
        assert_eq!(change.render(), "arn:1 -> RUNNING");
    }

    #[test]
    fn attachment_precedes_containers() {
        let attachment = Arc::new(EniAttachment::new(
            "arn:1",
            "arn:eni/1",
            "0a:0b:0c:0d:0e:0f",
            at(3),
        ));
        attachment.set_status(AttachmentStatus::Attached);
        let change = TaskStateChange::new("arn:1", TaskStatus::Running)
            .with_attachment(attachment)
            .with_container(ContainerStateChange::new("arn:1", "web", ContainerStatus::Running));
        assert_eq!(
            change.render(),
            "arn:1 -> RUNNING, ENI Attachment: task: arn:1; attachment: arn:eni/1; \
             attachmentSent: false; status: ATTACHED; expiresAt: 2026-05-06T03:00:00Z, \
             container change: containerName=web containerStatus=RUNNING"
        );
    }

    #[test]
    fn timestamp_order_skips_unset_values() {
        let ordered = TaskStateChange::new("arn:1", TaskStatus::Stopped)
            .with_pull_started_at(at(1))
            .with_execution_stopped_at(at(4));
        assert!(ordered.has_ordered_timestamps());

        let backwards = TaskStateChange::new("arn:1", TaskStatus::Stopped)
            .with_pull_started_at(at(5))
            .with_pull_stopped_at(at(2));
        assert!(!backwards.has_ordered_timestamps());

        assert!(TaskStateChange::new("arn:1", TaskStatus::None).has_ordered_timestamps());
    }

    #[test]
    fn render_is_idempotent() {
        let change = TaskStateChange::new("arn:1", TaskStatus::Running)
            .with_container(ContainerStateChange::new("arn:1", "web", ContainerStatus::Running))
            .with_managed_agent(agent("ExecuteCommandAgent"));
        assert_eq!(change.render(), change.render());
    }
}
