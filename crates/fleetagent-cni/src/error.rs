//! Error types for plugin configuration and network setup.

use thiserror::Error;

/// Errors raised while preparing or retrying task network setup.
#[derive(Debug, Error)]
pub enum CniError {
    /// A plugin configuration field is invalid.
    #[error("invalid plugin config field {field}: {message}")]
    InvalidConfig {
        /// Name of the offending field, as serialized.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// A single setup attempt failed.
    #[error("network setup attempt {attempt} failed: {message}")]
    SetupFailed {
        /// One-based attempt number.
        attempt: u32,
        /// Description of the failure.
        message: String,
    },

    /// Every allowed setup attempt failed. This is terminal for the task.
    #[error("network setup failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Error returned by the final attempt.
        #[source]
        last: Box<CniError>,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl CniError {
    /// Returns `true` if the task engine must give up on the task.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. } | Self::InvalidConfig { .. })
    }
}

/// Convenience alias for this crate.
pub type Result<T> = std::result::Result<T, CniError>;
