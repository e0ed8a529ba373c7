//! Global configuration model for the agent.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

/// Root configuration for the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentConfig {
    /// Cluster the node reports to.
    pub cluster: String,
    /// Base directory for agent state and data.
    pub data_dir: PathBuf,
    /// Backoff applied when setting up a task network namespace.
    pub setup_backoff: BackoffConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            cluster: crate::constants::DEFAULT_CLUSTER.to_owned(),
            data_dir: PathBuf::from(crate::constants::DEFAULT_DATA_DIR),
            setup_backoff: BackoffConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Loads the configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults, and the cluster name can
    /// be overridden through [`CLUSTER_ENV_VAR`](crate::constants::CLUSTER_ENV_VAR).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading agent configuration");
        let content = std::fs::read_to_string(path).map_err(|source| AgentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = serde_json::from_str(&content)?;
        config.override_cluster(std::env::var(crate::constants::CLUSTER_ENV_VAR).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from `path` if given, otherwise starts from
    /// the defaults. The environment cluster override applies either way.
    ///
    /// # Errors
    ///
    /// Returns an error if a given file cannot be loaded.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.override_cluster(std::env::var(crate::constants::CLUSTER_ENV_VAR).ok());
        Ok(config)
    }

    /// Replaces the cluster name with `cluster` unless it is missing or empty.
    pub fn override_cluster(&mut self, cluster: Option<String>) {
        if let Some(cluster) = cluster.filter(|c| !c.is_empty()) {
            tracing::debug!(%cluster, "cluster overridden from environment");
            self.cluster = cluster;
        }
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.cluster.is_empty() {
            return Err(AgentError::Config {
                message: "cluster name must not be empty".into(),
            });
        }
        self.setup_backoff.validate()
    }
}

/// Exponential backoff parameters for a bounded retry loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackoffConfig {
    /// Delay before the first retry.
    #[serde(rename = "minMs", with = "duration_ms")]
    pub min: Duration,
    /// Upper bound on any single delay.
    #[serde(rename = "maxMs", with = "duration_ms")]
    pub max: Duration,
    /// Fraction of each delay that is randomized, in `[0, 1]`.
    pub jitter: f64,
    /// Growth factor between consecutive delays.
    pub multiple: f64,
    /// Total number of attempts before giving up.
    pub max_retries: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
            jitter: 0.2,
            multiple: 1.3,
            max_retries: 3,
        }
    }
}

impl BackoffConfig {
    /// Checks that the parameters describe a finite, non-degenerate backoff.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let message = if self.min > self.max {
            "backoff min must not exceed max"
        } else if !(0.0..=1.0).contains(&self.jitter) {
            "backoff jitter must be within [0, 1]"
        } else if !self.multiple.is_finite() || self.multiple < 1.0 {
            "backoff multiple must be at least 1"
        } else if self.max_retries == 0 {
            "backoff max retries must be at least 1"
        } else {
            return Ok(());
        };
        Err(AgentError::Config {
            message: message.into(),
        })
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
