//! Request bodies for the control-plane submission operations.
//!
//! Optional event fields map to absent JSON fields, never to zero values:
//! an unset exit code is omitted rather than sent as `0`, an unset
//! timestamp is omitted rather than sent as the epoch.

use chrono::{DateTime, Utc};
use fleetagent_common::constants::MAX_REASON_LENGTH;
use fleetagent_common::types::{ManagedAgentStateChange, NetworkBinding};
use serde::{Deserialize, Serialize};

use crate::attachment::AttachmentStateChange;
use crate::container::ContainerStateChange;
use crate::task::TaskStateChange;

/// Body of `SubmitContainerStateChange`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitContainerStateChangeRequest {
    /// Cluster the task runs in.
    pub cluster: String,
    /// Task identifier.
    pub task: String,
    /// Name of the container.
    pub container_name: String,
    /// Runtime identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_id: Option<String>,
    /// Backend status.
    pub status: String,
    /// Exit code, for exited containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Reason for the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Host port bindings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_bindings: Vec<NetworkBinding>,
}

impl SubmitContainerStateChangeRequest {
    /// Builds the request for a container event.
    #[must_use]
    pub fn from_change(cluster: &str, change: &ContainerStateChange) -> Self {
        Self {
            cluster: cluster.to_owned(),
            task: change.task_arn().to_owned(),
            container_name: change.container_name().to_owned(),
            runtime_id: non_empty(change.runtime_id()),
            status: change.status().backend_status().to_owned(),
            exit_code: change.exit_code(),
            reason: change.reason().and_then(truncate_reason),
            network_bindings: change.network_bindings().to_vec(),
        }
    }
}

/// A container entry nested in `SubmitTaskStateChange`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStateChangeEntry {
    /// Name of the container.
    pub container_name: String,
    /// Runtime identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_id: Option<String>,
    /// Backend status.
    pub status: String,
    /// Exit code, for exited containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Reason for the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Digest of the image the container runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_digest: Option<String>,
    /// Host port bindings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_bindings: Vec<NetworkBinding>,
}

impl From<&ContainerStateChange> for ContainerStateChangeEntry {
    fn from(change: &ContainerStateChange) -> Self {
        Self {
            container_name: change.container_name().to_owned(),
            runtime_id: non_empty(change.runtime_id()),
            status: change.status().backend_status().to_owned(),
            exit_code: change.exit_code(),
            reason: change.reason().and_then(truncate_reason),
            image_digest: change.image_digest().and_then(non_empty),
            network_bindings: change.network_bindings().to_vec(),
        }
    }
}

/// A managed-agent entry nested in `SubmitTaskStateChange`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedAgentEntry {
    /// Container the agent runs in.
    pub container_name: String,
    /// Name of the agent.
    pub managed_agent_name: String,
    /// Status of the agent.
    pub status: String,
    /// Reason for the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&ManagedAgentStateChange> for ManagedAgentEntry {
    fn from(change: &ManagedAgentStateChange) -> Self {
        Self {
            container_name: change.container_name.clone(),
            managed_agent_name: change.managed_agent_name.clone(),
            status: change.status.clone(),
            reason: change.reason.as_deref().and_then(truncate_reason),
        }
    }
}

/// An attachment entry, used by both task and attachment submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentEntry {
    /// Identifier of the attachment.
    pub attachment_arn: String,
    /// Attachment status.
    pub status: String,
}

/// Body of `SubmitTaskStateChange`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTaskStateChangeRequest {
    /// Cluster the task runs in.
    pub cluster: String,
    /// Task identifier.
    pub task: String,
    /// Backend status.
    pub status: String,
    /// Reason for the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Container sub-events, in event order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ContainerStateChangeEntry>,
    /// Managed-agent sub-events, in event order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub managed_agents: Vec<ManagedAgentEntry>,
    /// The task's network attachment, if relevant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentEntry>,
    /// When image pulls started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_started_at: Option<DateTime<Utc>>,
    /// When image pulls finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_stopped_at: Option<DateTime<Utc>>,
    /// When the essential container stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_stopped_at: Option<DateTime<Utc>>,
}

impl SubmitTaskStateChangeRequest {
    /// Builds the request for a task event.
    #[must_use]
    pub fn from_change(cluster: &str, change: &TaskStateChange) -> Self {
        Self {
            cluster: cluster.to_owned(),
            task: change.task_arn().to_owned(),
            status: change.status().backend_status().to_owned(),
            reason: change.reason().and_then(truncate_reason),
            containers: change.containers().iter().map(Into::into).collect(),
            managed_agents: change.managed_agents().iter().map(Into::into).collect(),
            attachments: change
                .attachment()
                .map(|attachment| AttachmentEntry {
                    attachment_arn: attachment.attachment_arn.clone(),
                    status: attachment.status().to_string(),
                })
                .into_iter()
                .collect(),
            pull_started_at: change.pull_started_at(),
            pull_stopped_at: change.pull_stopped_at(),
            execution_stopped_at: change.execution_stopped_at(),
        }
    }
}

/// Body of `SubmitAttachmentStateChanges`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttachmentStateChangesRequest {
    /// Cluster the attachment belongs to.
    pub cluster: String,
    /// Attachments changing state.
    pub attachments: Vec<AttachmentEntry>,
}

impl SubmitAttachmentStateChangesRequest {
    /// Builds the request for an attachment event.
    ///
    /// Returns `None` for an event without an attachment, since there is
    /// nothing to submit.
    #[must_use]
    pub fn from_change(cluster: &str, change: &AttachmentStateChange) -> Option<Self> {
        let attachment = change.attachment()?;
        Some(Self {
            cluster: cluster.to_owned(),
            attachments: vec![AttachmentEntry {
                attachment_arn: attachment.attachment_arn.clone(),
                status: attachment.status().to_string(),
            }],
        })
    }
}

/// Trims a reason to the control-plane limit on a char boundary.
///
/// Empty reasons map to `None`.
#[must_use]
pub fn truncate_reason(reason: &str) -> Option<String> {
    if reason.is_empty() {
        return None;
    }
    let mut end = reason.len().min(MAX_REASON_LENGTH);
    while !reason.is_char_boundary(end) {
        end -= 1;
    }
    Some(reason[..end].to_owned())
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use fleetagent_common::attachment::EniAttachment;
    use fleetagent_common::types::{AttachmentStatus, ContainerStatus, TaskStatus};

    use super::*;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, 12, minute, 0)
            .single()
            .expect("valid timestamp")
    }

    fn attachment() -> Arc<EniAttachment> {
        let attachment = Arc::new(EniAttachment::new(
            "arn:task/1",
            "arn:eni/1",
            "00:11:22:33:44:55",
            at(30),
        ));
        attachment.set_status(AttachmentStatus::Attached);
        attachment
    }

    #[test]
    fn container_request_omits_unset_fields() {
        let change = ContainerStateChange::new("arn:task/1", "web", ContainerStatus::Created);
        let json = serde_json::to_value(SubmitContainerStateChangeRequest::from_change(
            "prod", &change,
        ))
        .expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "cluster": "prod",
                "task": "arn:task/1",
                "containerName": "web",
                "status": "PENDING"
            })
        );
    }

    #[test]
    fn exit_code_zero_is_sent_when_set() {
        let change = ContainerStateChange::new("arn:task/1", "web", ContainerStatus::Stopped)
            .with_runtime_id("abc")
            .with_exit_code(0);
        let request = SubmitContainerStateChangeRequest::from_change("prod", &change);
        assert_eq!(request.exit_code, Some(0));
        assert_eq!(request.runtime_id.as_deref(), Some("abc"));
        assert_eq!(request.status, "STOPPED");
    }

    #[test]
    fn task_request_preserves_sub_event_order_and_timestamps() {
        let change = TaskStateChange::new("arn:task/1", TaskStatus::Stopped)
            .with_reason("Essential container exited")
            .with_attachment(attachment())
            .with_container(ContainerStateChange::new("arn:task/1", "b", ContainerStatus::Stopped))
            .with_container(
                ContainerStateChange::new("arn:task/1", "a", ContainerStatus::Stopped)
                    .with_image_digest("sha256:feed"),
            )
            .with_managed_agent(ManagedAgentStateChange {
                container_name: "a".into(),
                managed_agent_name: "ExecuteCommandAgent".into(),
                status: "STOPPED".into(),
                ..ManagedAgentStateChange::default()
            })
            .with_pull_started_at(at(1))
            .with_execution_stopped_at(at(9));

        let request = SubmitTaskStateChangeRequest::from_change("prod", &change);
        let names: Vec<&str> = request
            .containers
            .iter()
            .map(|c| c.container_name.as_str())
            .collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(request.containers[1].image_digest.as_deref(), Some("sha256:feed"));
        assert_eq!(request.attachments[0].status, "ATTACHED");

        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["pullStartedAt"], "2026-09-01T12:01:00Z");
        assert!(json.get("pullStoppedAt").is_none());
        assert_eq!(json["managedAgents"][0]["managedAgentName"], "ExecuteCommandAgent");
    }

    #[test]
    fn attachment_request_requires_an_attachment() {
        assert!(
            SubmitAttachmentStateChangesRequest::from_change(
                "prod",
                &AttachmentStateChange::default()
            )
            .is_none()
        );

        let request = SubmitAttachmentStateChangesRequest::from_change(
            "prod",
            &AttachmentStateChange::new(attachment()),
        )
        .expect("request for present attachment");
        assert_eq!(request.attachments[0].attachment_arn, "arn:eni/1");
    }

    #[test]
    fn long_reason_is_truncated_on_char_boundary() {
        let reason = "é".repeat(200);
        let truncated = truncate_reason(&reason).expect("non-empty");
        assert!(truncated.len() <= MAX_REASON_LENGTH);
        assert_eq!(truncated.len(), 254);
        assert!(truncate_reason("").is_none());
    }
}
