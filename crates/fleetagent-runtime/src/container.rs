//! Live container object.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use fleetagent_common::types::{ContainerStatus, NetworkBinding};

#[derive(Debug, Default)]
pub(crate) struct ContainerState {
    pub(crate) runtime_id: String,
    pub(crate) known_status: ContainerStatus,
    pub(crate) sent_status: ContainerStatus,
    pub(crate) exit_code: Option<i32>,
    pub(crate) reason: Option<String>,
    pub(crate) network_bindings: Vec<NetworkBinding>,
}

/// A container tracked by the agent.
///
/// Identity fields are fixed at construction; everything the runtime
/// learns later sits behind a lock so that event rendering can read it
/// while the agent updates it.
#[derive(Debug)]
pub struct Container {
    name: String,
    essential: bool,
    image_digest: Option<String>,
    state: RwLock<ContainerState>,
}

impl Container {
    /// Creates a container that has not been observed yet.
    #[must_use]
    pub fn new(name: impl Into<String>, essential: bool) -> Self {
        Self {
            name: name.into(),
            essential,
            image_digest: None,
            state: RwLock::new(ContainerState::default()),
        }
    }

    /// Records the digest of the image the container was created from.
    #[must_use]
    pub fn with_image_digest(mut self, digest: impl Into<String>) -> Self {
        self.image_digest = Some(digest.into());
        self
    }

    /// Container name within its task.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the task stops when this container stops.
    pub const fn is_essential(&self) -> bool {
        self.essential
    }

    /// Image digest, if recorded.
    pub fn image_digest(&self) -> Option<&str> {
        self.image_digest.as_deref()
    }

    /// Records the runtime identifier once the container is created.
    pub fn set_runtime_id(&self, runtime_id: impl Into<String>) {
        self.write().runtime_id = runtime_id.into();
    }

    /// Records a newly observed status.
    pub fn set_known_status(&self, status: ContainerStatus) {
        let mut state = self.write();
        tracing::debug!(
            container = %self.name,
            from = %state.known_status,
            to = %status,
            "container status changed"
        );
        state.known_status = status;
    }

    /// Records the exit code and reason of an exited container.
    pub fn set_exited(&self, exit_code: i32, reason: Option<String>) {
        let mut state = self.write();
        state.exit_code = Some(exit_code);
        state.reason = reason;
    }

    /// Records the host ports picked for the container.
    pub fn set_network_bindings(&self, bindings: Vec<NetworkBinding>) {
        self.write().network_bindings = bindings;
    }

    /// Records that the control plane acknowledged `status`.
    pub fn mark_sent(&self, status: ContainerStatus) {
        self.write().sent_status = status;
    }

    /// Runtime identifier, empty until created.
    pub fn runtime_id(&self) -> String {
        self.read().runtime_id.clone()
    }

    /// Last observed status.
    pub fn known_status(&self) -> ContainerStatus {
        self.read().known_status
    }

    /// Last status acknowledged by the control plane.
    pub fn sent_status(&self) -> ContainerStatus {
        self.read().sent_status
    }

    /// Whether the observed status has not been reported yet.
    pub fn has_unsent_change(&self) -> bool {
        let state = self.read();
        state.known_status != state.sent_status
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, ContainerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ContainerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_container_has_no_status() {
        let c = Container::new("web", true);
        assert_eq!(c.known_status(), ContainerStatus::None);
        assert_eq!(c.sent_status(), ContainerStatus::None);
        assert!(c.runtime_id().is_empty());
        assert!(!c.has_unsent_change());
    }

    #[test]
    fn status_change_is_unsent_until_marked() {
        let c = Container::new("web", false);
        c.set_known_status(ContainerStatus::Running);
        assert!(c.has_unsent_change());
        c.mark_sent(ContainerStatus::Running);
        assert!(!c.has_unsent_change());
    }

    #[test]
    fn image_digest_is_fixed_at_construction() {
        let c = Container::new("web", true).with_image_digest("sha256:abc");
        assert_eq!(c.image_digest(), Some("sha256:abc"));
        assert!(c.is_essential());
    }
}
