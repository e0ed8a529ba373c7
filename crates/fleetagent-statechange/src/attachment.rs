//! Attachment state change event.

use std::fmt;
use std::sync::Arc;

use fleetagent_common::attachment::EniAttachment;
use serde::{Deserialize, Serialize};

/// A network attachment's transition, as submitted through
/// `SubmitAttachmentStateChanges`.
///
/// An event without an attachment is legal but carries nothing: it renders
/// as the empty string and maps to no request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentStateChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attachment: Option<Arc<EniAttachment>>,
}

impl AttachmentStateChange {
    /// Creates an event for the given attachment.
    #[must_use]
    pub const fn new(attachment: Arc<EniAttachment>) -> Self {
        Self {
            attachment: Some(attachment),
        }
    }

    /// The attachment, if any.
    pub const fn attachment(&self) -> Option<&Arc<EniAttachment>> {
        self.attachment.as_ref()
    }

    /// Renders `<attachmentARN> -> <status>, <attachment detail>`, or an
    /// empty string when there is no attachment.
    #[must_use]
    pub fn render(&self) -> String {
        self.attachment.as_ref().map_or_else(String::new, |attachment| {
            format!(
                "{} -> {}, {attachment}",
                attachment.attachment_arn,
                attachment.status()
            )
        })
    }
}

impl fmt::Display for AttachmentStateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
