//! Live task object.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use fleetagent_common::attachment::EniAttachment;
use fleetagent_common::types::{ManagedAgentStateChange, TaskStatus};

use crate::container::Container;

#[derive(Debug, Default)]
pub(crate) struct TaskState {
    pub(crate) known_status: TaskStatus,
    pub(crate) sent_status: TaskStatus,
    pub(crate) pull_started_at: Option<DateTime<Utc>>,
    pub(crate) pull_stopped_at: Option<DateTime<Utc>>,
    pub(crate) execution_stopped_at: Option<DateTime<Utc>>,
    pub(crate) pending_agents: Vec<ManagedAgentStateChange>,
}

/// A task tracked by the agent, owning its containers.
#[derive(Debug)]
pub struct Task {
    arn: String,
    containers: Vec<Arc<Container>>,
    attachment: Option<Arc<EniAttachment>>,
    state: RwLock<TaskState>,
}

impl Task {
    /// Creates a task with no containers.
    #[must_use]
    pub fn new(arn: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            containers: Vec::new(),
            attachment: None,
            state: RwLock::new(TaskState::default()),
        }
    }

    /// Adds a container; containers keep the order they are added in.
    #[must_use]
    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.push(Arc::new(container));
        self
    }

    /// Associates the task's network attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Arc<EniAttachment>) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Task identifier.
    pub fn arn(&self) -> &str {
        &self.arn
    }

    /// Containers, in definition order.
    pub fn containers(&self) -> &[Arc<Container>] {
        &self.containers
    }

    /// Looks up a container by name.
    pub fn container(&self, name: &str) -> Option<&Arc<Container>> {
        self.containers.iter().find(|c| c.name() == name)
    }

    /// The task's network attachment, if any.
    pub const fn attachment(&self) -> Option<&Arc<EniAttachment>> {
        self.attachment.as_ref()
    }

    /// Records a newly observed status.
    pub fn set_known_status(&self, status: TaskStatus) {
        let mut state = self.write();
        tracing::debug!(
            task = %self.arn,
            from = %state.known_status,
            to = %status,
            "task status changed"
        );
        state.known_status = status;
    }

    /// Records when image pulls started. Only the first call takes effect.
    pub fn set_pull_started_at(&self, at: DateTime<Utc>) {
        let mut state = self.write();
        if state.pull_started_at.is_none() {
            state.pull_started_at = Some(at);
        }
    }

    /// Records when image pulls finished. Only the first call takes effect.
    pub fn set_pull_stopped_at(&self, at: DateTime<Utc>) {
        let mut state = self.write();
        if state.pull_stopped_at.is_none() {
            state.pull_stopped_at = Some(at);
        }
    }

    /// Records when the essential container stopped. Only the first call
    /// takes effect.
    pub fn set_execution_stopped_at(&self, at: DateTime<Utc>) {
        let mut state = self.write();
        if state.execution_stopped_at.is_none() {
            state.execution_stopped_at = Some(at);
        }
    }

    /// Queues a managed-agent change. It is reported with every task event
    /// until acknowledged.
    pub fn record_managed_agent_change(&self, change: ManagedAgentStateChange) {
        self.write().pending_agents.push(change);
    }

    /// Drops the oldest `count` queued managed-agent changes once the
    /// control plane has accepted an event carrying them.
    pub fn ack_managed_agents(&self, count: usize) {
        let mut state = self.write();
        let count = count.min(state.pending_agents.len());
        state.pending_agents = state.pending_agents.split_off(count);
        tracing::debug!(
            task = %self.arn,
            acked = count,
            remaining = state.pending_agents.len(),
            "managed agent changes acknowledged"
        );
    }

    /// Records that the control plane acknowledged `status`.
    pub fn mark_sent(&self, status: TaskStatus) {
        self.write().sent_status = status;
    }

    /// Last observed status.
    pub fn known_status(&self) -> TaskStatus {
        self.read().known_status
    }

    /// Last status acknowledged by the control plane.
    pub fn sent_status(&self) -> TaskStatus {
        self.read().sent_status
    }

    /// Managed-agent changes not yet acknowledged, oldest first.
    pub fn pending_managed_agents(&self) -> Vec<ManagedAgentStateChange> {
        self.read().pending_agents.clone()
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, TaskState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TaskState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 3, 4, 5, second)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn containers_keep_definition_order() {
        let task = Task::new("arn:1")
            .with_container(Container::new("b", true))
            .with_container(Container::new("a", false));
        let names: Vec<&str> = task.containers().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["b", "a"]);
        assert!(task.container("a").is_some());
        assert!(task.container("missing").is_none());
    }

    #[test]
    fn timestamps_are_set_once() {
        let task = Task::new("arn:1");
        task.set_pull_started_at(at(1));
        task.set_pull_started_at(at(9));
        assert_eq!(task.read().pull_started_at, Some(at(1)));
    }

    #[test]
    fn pending_agents_stay_queued_until_acked() {
        let task = Task::new("arn:1");
        task.record_managed_agent_change(ManagedAgentStateChange {
            managed_agent_name: "first".into(),
            ..ManagedAgentStateChange::default()
        });
        task.record_managed_agent_change(ManagedAgentStateChange {
            managed_agent_name: "second".into(),
            ..ManagedAgentStateChange::default()
        });
        assert_eq!(task.pending_managed_agents().len(), 2);
        assert_eq!(task.pending_managed_agents().len(), 2);

        task.ack_managed_agents(1);
        let pending = task.pending_managed_agents();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].managed_agent_name, "second");

        task.ack_managed_agents(5);
        assert!(task.pending_managed_agents().is_empty());
    }
}
