//! # fleetagent-statechange
//!
//! Lifecycle state-change events destined for the control plane.
//!
//! Three event kinds exist:
//! - [`ContainerStateChange`](container::ContainerStateChange): one container's transition.
//! - [`TaskStateChange`](task::TaskStateChange): one task's transition, aggregating container
//!   and managed-agent sub-events.
//! - [`AttachmentStateChange`](attachment::AttachmentStateChange): a network attachment's transition.
//!
//! Events never hold the agent's live task or container objects. Instead
//! they keep a non-owning [`Weak`](std::sync::Weak) handle to a narrow
//! metadata getter (see [`getter`]) that is only consulted when the event is
//! rendered. A getter whose backing object has been dropped behaves exactly
//! like a getter that was never supplied.
//!
//! The [`wire`] module maps events onto the request bodies of the three
//! submission operations.

pub mod attachment;
pub mod container;
pub mod getter;
pub mod render;
pub mod task;
pub mod wire;

pub use attachment::AttachmentStateChange;
pub use container::ContainerStateChange;
pub use getter::{ContainerMetadataGetter, TaskMetadataGetter};
pub use task::TaskStateChange;
