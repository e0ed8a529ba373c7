//! ENI attachment model shared between the attachment subsystem and task
//! state changes.
//!
//! An attachment is held behind an `Arc`: the attachment subsystem keeps
//! updating its status and sent flag while task events that reference it
//! are still being logged or submitted.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::types::AttachmentStatus;

#[derive(Debug, Clone, Copy, Default)]
struct AttachmentState {
    status: AttachmentStatus,
    sent: bool,
}

/// An elastic network interface attached to a task.
#[derive(Debug, Serialize, Deserialize)]
#[serde(from = "EniAttachmentRecord", into = "EniAttachmentRecord")]
pub struct EniAttachment {
    /// Task the interface belongs to.
    pub task_arn: String,
    /// Identifier of the attachment.
    pub attachment_arn: String,
    /// MAC address of the interface.
    pub mac_address: String,
    /// Deadline for the attachment to be acknowledged.
    pub expires_at: DateTime<Utc>,
    state: RwLock<AttachmentState>,
}

impl EniAttachment {
    /// Creates an attachment in the `NONE` status that has not been sent.
    #[must_use]
    pub fn new(
        task_arn: impl Into<String>,
        attachment_arn: impl Into<String>,
        mac_address: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_arn: task_arn.into(),
            attachment_arn: attachment_arn.into(),
            mac_address: mac_address.into(),
            expires_at,
            state: RwLock::new(AttachmentState::default()),
        }
    }

    /// Returns the current status.
    pub fn status(&self) -> AttachmentStatus {
        self.read_state().status
    }

    /// Updates the status.
    pub fn set_status(&self, status: AttachmentStatus) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .status = status;
    }

    /// Returns whether the current status has been acknowledged upstream.
    pub fn is_sent(&self) -> bool {
        self.read_state().sent
    }

    /// Records whether the current status has been acknowledged upstream.
    pub fn set_sent(&self, sent: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .sent = sent;
    }

    fn read_state(&self) -> AttachmentState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for EniAttachment {
    fn clone(&self) -> Self {
        Self {
            task_arn: self.task_arn.clone(),
            attachment_arn: self.attachment_arn.clone(),
            mac_address: self.mac_address.clone(),
            expires_at: self.expires_at,
            state: RwLock::new(self.read_state()),
        }
    }
}

impl fmt::Display for EniAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        write!(
            f,
            "ENI Attachment: task: {}; attachment: {}; attachmentSent: {}; status: {}; expiresAt: {}",
            self.task_arn,
            self.attachment_arn,
            state.sent,
            state.status,
            self.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Plain serde form of an [`EniAttachment`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EniAttachmentRecord {
    task_arn: String,
    attachment_arn: String,
    mac_address: String,
    expires_at: DateTime<Utc>,
    #[serde(default)]
    status: AttachmentStatus,
    #[serde(default)]
    sent: bool,
}

impl From<EniAttachmentRecord> for EniAttachment {
    fn from(record: EniAttachmentRecord) -> Self {
        Self {
            task_arn: record.task_arn,
            attachment_arn: record.attachment_arn,
            mac_address: record.mac_address,
            expires_at: record.expires_at,
            state: RwLock::new(AttachmentState {
                status: record.status,
                sent: record.sent,
            }),
        }
    }
}

impl From<EniAttachment> for EniAttachmentRecord {
    fn from(attachment: EniAttachment) -> Self {
        let state = attachment.read_state();
        Self {
            task_arn: attachment.task_arn,
            attachment_arn: attachment.attachment_arn,
            mac_address: attachment.mac_address,
            expires_at: attachment.expires_at,
            status: state.status,
            sent: state.sent,
        }
    }
}
