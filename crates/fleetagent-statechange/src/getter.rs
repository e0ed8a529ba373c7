//! Read-only capability traits over live task and container objects.
//!
//! The task engine implements these on its own types; the reporting side
//! only ever sees the trait. Implementations must not cache: every call
//! reflects the backing object at the time of the call, and must be safe to
//! invoke while the engine concurrently mutates that object.
//!
//! There is no "is void" accessor. Events hold getters as
//! `Weak<dyn …Getter>`, so a getter that outlived its object simply fails to
//! upgrade.

use chrono::{DateTime, Utc};

/// Container fields the reporting layer needs beyond the event itself.
pub trait ContainerMetadataGetter: Send + Sync {
    /// Last status the control plane is known to have acknowledged.
    fn known_sent_status(&self) -> String;

    /// Runtime (e.g. Docker) identifier of the container.
    fn runtime_id(&self) -> String;

    /// Whether the task stops when this container stops.
    fn is_essential(&self) -> bool;
}

/// Task fields the reporting layer needs beyond the event itself.
pub trait TaskMetadataGetter: Send + Sync {
    /// Last status the control plane is known to have acknowledged.
    fn known_sent_status(&self) -> String;

    /// When image pulls for the task started.
    fn pull_started_at(&self) -> Option<DateTime<Utc>>;

    /// When image pulls for the task finished.
    fn pull_stopped_at(&self) -> Option<DateTime<Utc>>;

    /// When the task's essential container stopped.
    fn execution_stopped_at(&self) -> Option<DateTime<Utc>>;
}
