//! Metadata getter adapters for the live objects.
//!
//! Each accessor takes the object's read lock for the duration of one read,
//! so rendering an event never observes a half-applied update of a single
//! field.

use chrono::{DateTime, Utc};
use fleetagent_statechange::getter::{ContainerMetadataGetter, TaskMetadataGetter};

use crate::container::Container;
use crate::task::Task;

impl ContainerMetadataGetter for Container {
    fn known_sent_status(&self) -> String {
        self.read().sent_status.to_string()
    }

    fn runtime_id(&self) -> String {
        self.read().runtime_id.clone()
    }

    fn is_essential(&self) -> bool {
        Self::is_essential(self)
    }
}

impl TaskMetadataGetter for Task {
    fn known_sent_status(&self) -> String {
        self.read().sent_status.to_string()
    }

    fn pull_started_at(&self) -> Option<DateTime<Utc>> {
        self.read().pull_started_at
    }

    fn pull_stopped_at(&self) -> Option<DateTime<Utc>> {
        self.read().pull_stopped_at
    }

    fn execution_stopped_at(&self) -> Option<DateTime<Utc>> {
        self.read().execution_stopped_at
    }
}
