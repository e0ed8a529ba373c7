//! Container state change event.

use std::fmt;
use std::sync::{Arc, Weak};

use fleetagent_common::types::{ContainerStatus, NetworkBinding, format_bindings};
use serde::{Deserialize, Serialize};

use crate::getter::ContainerMetadataGetter;
use crate::render::Clauses;

/// One container's transition, as submitted through
/// `SubmitContainerStateChange` or nested in a task state change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStateChange {
    task_arn: String,
    #[serde(default)]
    runtime_id: String,
    container_name: String,
    status: ContainerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    network_bindings: Vec<NetworkBinding>,
    #[serde(skip)]
    metadata: Option<Weak<dyn ContainerMetadataGetter>>,
}

impl ContainerStateChange {
    /// Creates an event carrying only the required fields.
    #[must_use]
    pub fn new(
        task_arn: impl Into<String>,
        container_name: impl Into<String>,
        status: ContainerStatus,
    ) -> Self {
        Self {
            task_arn: task_arn.into(),
            container_name: container_name.into(),
            status,
            ..Self::default()
        }
    }

    /// Sets the runtime identifier.
    #[must_use]
    pub fn with_runtime_id(mut self, runtime_id: impl Into<String>) -> Self {
        self.runtime_id = runtime_id.into();
        self
    }

    /// Sets the digest of the image the container runs.
    #[must_use]
    pub fn with_image_digest(mut self, digest: impl Into<String>) -> Self {
        self.image_digest = Some(digest.into());
        self
    }

    /// Sets the human-readable reason for the transition.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Sets the exit code.
    ///
    /// Exit codes only exist for containers that have exited; on a
    /// non-terminal status the code is dropped.
    #[must_use]
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        if self.status.is_terminal() {
            self.exit_code = Some(exit_code);
        } else {
            tracing::debug!(
                container = %self.container_name,
                status = %self.status,
                exit_code,
                "ignoring exit code for non-terminal container status"
            );
        }
        self
    }

    /// Sets the host port bindings.
    #[must_use]
    pub fn with_network_bindings(mut self, bindings: Vec<NetworkBinding>) -> Self {
        self.network_bindings = bindings;
        self
    }

    /// Attaches a metadata getter without taking ownership of it.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Weak<dyn ContainerMetadataGetter>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Task the container belongs to.
    pub fn task_arn(&self) -> &str {
        &self.task_arn
    }

    /// Runtime identifier, empty when not yet known.
    pub fn runtime_id(&self) -> &str {
        &self.runtime_id
    }

    /// Name of the container within its task.
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Status being reported.
    pub const fn status(&self) -> ContainerStatus {
        self.status
    }

    /// Digest of the image, if known.
    pub fn image_digest(&self) -> Option<&str> {
        self.image_digest.as_deref()
    }

    /// Reason for the transition, if any.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Exit code, set only for exited containers.
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Host port bindings, in the order they were reported.
    pub fn network_bindings(&self) -> &[NetworkBinding] {
        &self.network_bindings
    }

    /// Resolves the metadata getter.
    ///
    /// Returns `None` both when no getter was supplied and when the
    /// container behind it no longer exists.
    pub fn metadata(&self) -> Option<Arc<dyn ContainerMetadataGetter>> {
        self.metadata.as_ref().and_then(Weak::upgrade)
    }

    /// Renders the single-line diagnostic summary of this event.
    #[must_use]
    pub fn render(&self) -> String {
        let mut clauses = Clauses::new(
            " ",
            format_args!(
                "containerName={} containerStatus={}",
                self.container_name, self.status
            ),
        );
        clauses.push_opt(self.exit_code.map(|code| format!("containerExitCode={code}")));
        clauses.push_opt(
            self.reason()
                .filter(|reason| !reason.is_empty())
                .map(|reason| format!("containerReason={reason}")),
        );
        if !self.network_bindings.is_empty() {
            clauses.push(format_args!(
                "containerNetworkBindings={}",
                format_bindings(&self.network_bindings)
            ));
        }
        if let Some(metadata) = self.metadata() {
            clauses.push(format_args!(
                "containerKnownSentStatus={} containerRuntimeID={} containerIsEssential={}",
                metadata.known_sent_status(),
                metadata.runtime_id(),
                metadata.is_essential()
            ));
        }
        clauses.finish()
    }
}

impl fmt::Display for ContainerStateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
