//! Constants and environment variable names.

/// Config key listing the cluster's virtual IPs, whitespace separated.
pub const VIP_KEY: &str = "vip";

/// Context name that switches the canonical URL to https.
pub const HTTPS_CONTEXT: &str = "https";

/// Relation the HA cluster charm joins on.
pub const HA_RELATION: &str = "ha";

/// Relation key set by the HA cluster charm once the cluster is up.
pub const CLUSTERED_KEY: &str = "clustered";

/// Largest hook tool stdout accepted, in bytes.
pub const MAX_TOOL_OUTPUT: usize = 500_000;

/// Default log4rs config file.
pub const LOG_CONFIG_FILE: &str = "log4rs.yml";

pub const ENV_SNAPSHOT: &str = "CHARM_ADDRESS_SNAPSHOT";
pub const ENV_TOOL_DIR: &str = "CHARM_ADDRESS_TOOL_DIR";
pub const ENV_LOG_CONFIG: &str = "CHARM_ADDRESS_LOG_CONFIG";
