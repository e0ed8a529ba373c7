//! System-wide constants and defaults.

/// Default base directory for agent data.
pub const DEFAULT_DATA_DIR: &str = "/var/lib/fleetagent";

/// Cluster name used when none is configured.
pub const DEFAULT_CLUSTER: &str = "default";

/// Environment variable that overrides the configured cluster name.
pub const CLUSTER_ENV_VAR: &str = "FLEETAGENT_CLUSTER";

/// Maximum length in bytes of a reason string accepted by the control plane.
pub const MAX_REASON_LENGTH: usize = 255;
