//! Domain primitive types used across the fleetagent workspace.
//!
//! The status enums are snapshots of externally defined domains: transition
//! rules belong to the task engine, so nothing here validates whether one
//! status may follow another.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a container as tracked by the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerStatus {
    /// No status has been observed yet.
    #[default]
    None,
    /// The image manifest has been resolved.
    ManifestPulled,
    /// The image has been pulled.
    Pulled,
    /// The container has been created.
    Created,
    /// The container process is running.
    Running,
    /// Resources the container depends on have been provisioned.
    ResourcesProvisioned,
    /// The container has exited.
    Stopped,
    /// The container is gone and no longer tracked by the runtime.
    Zombie,
}

impl ContainerStatus {
    /// Returns `true` for statuses after which the container never runs again.
    ///
    /// An exit code is only meaningful for these.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Zombie)
    }

    /// Maps the status onto the coarse status the control plane accepts.
    #[must_use]
    pub const fn backend_status(self) -> &'static str {
        match self {
            Self::Running | Self::ResourcesProvisioned => "RUNNING",
            Self::Stopped | Self::Zombie => "STOPPED",
            Self::None | Self::ManifestPulled | Self::Pulled | Self::Created => "PENDING",
        }
    }

    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::ManifestPulled => "MANIFEST_PULLED",
            Self::Pulled => "PULLED",
            Self::Created => "CREATED",
            Self::Running => "RUNNING",
            Self::ResourcesProvisioned => "RESOURCES_PROVISIONED",
            Self::Stopped => "STOPPED",
            Self::Zombie => "ZOMBIE",
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a task as tracked by the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// No status has been observed yet.
    #[default]
    None,
    /// Image manifests for all containers have been resolved.
    ManifestPulled,
    /// Images for all containers have been pulled.
    Pulled,
    /// All containers have been created.
    Created,
    /// The task is running.
    Running,
    /// The task has stopped.
    Stopped,
    /// The task is gone and no longer tracked.
    Zombie,
}

impl TaskStatus {
    /// Returns `true` once the task can no longer transition back to running.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Zombie)
    }

    /// Maps the status onto the coarse status the control plane accepts.
    #[must_use]
    pub const fn backend_status(self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Stopped | Self::Zombie => "STOPPED",
            Self::None | Self::ManifestPulled | Self::Pulled | Self::Created => "PENDING",
        }
    }

    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::ManifestPulled => "MANIFEST_PULLED",
            Self::Pulled => "PULLED",
            Self::Created => "CREATED",
            Self::Running => "RUNNING",
            Self::Stopped => "STOPPED",
            Self::Zombie => "ZOMBIE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provisioning status of a network attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentStatus {
    /// Not yet attached.
    #[default]
    None,
    /// The interface is attached to the instance.
    Attached,
    /// The interface has been detached.
    Detached,
}

impl AttachmentStatus {
    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Attached => "ATTACHED",
            Self::Detached => "DETACHED",
        }
    }
}

impl fmt::Display for AttachmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport protocol of a port binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportProtocol {
    /// TCP.
    #[default]
    Tcp,
    /// UDP.
    Udp,
}

impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => f.write_str("tcp"),
            Self::Udp => f.write_str("udp"),
        }
    }
}

/// Inclusive range of ports, as used by range bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRange {
    /// First port of the range.
    pub start: u16,
    /// Last port of the range.
    pub end: u16,
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A host port picked for a container port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkBinding {
    /// Host address the port is bound on.
    #[serde(rename = "bindIP")]
    pub bind_ip: String,
    /// Port inside the container.
    pub container_port: u16,
    /// Port on the host.
    pub host_port: u16,
    /// Transport protocol.
    pub protocol: TransportProtocol,
    /// Container port range, for range bindings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_port_range: Option<PortRange>,
    /// Host port range, for range bindings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_port_range: Option<PortRange>,
}

impl fmt::Display for NetworkBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.host_port_range, self.container_port_range) {
            (Some(host), Some(container)) => {
                write!(f, "{}:{host}->{container}/{}", self.bind_ip, self.protocol)
            }
            _ => write!(
                f,
                "{}:{}->{}/{}",
                self.bind_ip, self.host_port, self.container_port, self.protocol
            ),
        }
    }
}

/// Renders a list of bindings as `[a b c]`.
#[must_use]
pub fn format_bindings(bindings: &[NetworkBinding]) -> String {
    let parts: Vec<String> = bindings.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(" "))
}

/// Status change of an agent supervised inside a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedAgentStateChange {
    /// Task the container belongs to.
    pub task_arn: String,
    /// Container the agent runs in.
    pub container_name: String,
    /// Name of the managed agent, e.g. `ExecuteCommandAgent`.
    pub managed_agent_name: String,
    /// Status of the agent.
    pub status: String,
    /// Why the agent changed status, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl fmt::Display for ManagedAgentStateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "managedAgentName={} status={}",
            self.managed_agent_name, self.status
        )?;
        if let Some(reason) = self.reason.as_deref().filter(|r| !r.is_empty()) {
            write!(f, " reason={reason}")?;
        }
        Ok(())
    }
}
