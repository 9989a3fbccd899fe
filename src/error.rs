//! Error types for address resolution.

use crate::models::NetworkRole;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for charm-address operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Cluster/VIP/CIDR configuration does not yield exactly one address.
    #[error(
        "unable to resolve {role} address: {reason} (network={}, vip={})",
        .network.as_deref().unwrap_or("<unset>"),
        .vip.as_deref().unwrap_or("<unset>")
    )]
    AddressNotResolvable {
        role: NetworkRole,
        network: Option<String>,
        vip: Option<String>,
        reason: &'static str,
    },

    /// A network override could not be parsed as CIDR.
    #[error("invalid network '{network}': {reason}")]
    InvalidNetwork { network: String, reason: String },

    /// A hook tool could not be run or returned unusable output.
    #[error("hook tool `{command}` failed: {message}")]
    HookTool { command: String, message: String },

    /// The unit inventory has no address for the attribute.
    #[error("unit has no value for '{0}'")]
    MissingAttribute(String),

    /// The snapshot file could not be read or parsed.
    #[error("snapshot {path}: {message}")]
    Snapshot { path: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid network error for `network`.
    pub fn invalid_network(network: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNetwork {
            network: network.into(),
            reason: reason.into(),
        }
    }

    /// Create a hook tool error for `command`.
    pub fn hook_tool(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HookTool {
            command: command.into(),
            message: message.into(),
        }
    }

    /// True for the configuration contradiction raised by the resolver.
    pub fn is_not_resolvable(&self) -> bool {
        matches!(self, Self::AddressNotResolvable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_resolvable_message_names_inputs() {
        let err = Error::AddressNotResolvable {
            role: NetworkRole::Public,
            network: Some("192.168.20.0/24".to_string()),
            vip: Some("10.5.3.1".to_string()),
            reason: "no vip in network",
        };
        assert!(err.is_not_resolvable());
        assert_eq!(
            err.to_string(),
            "unable to resolve public address: no vip in network \
             (network=192.168.20.0/24, vip=10.5.3.1)"
        );
    }

    #[test]
    fn test_not_resolvable_message_unset_values() {
        let err = Error::AddressNotResolvable {
            role: NetworkRole::Admin,
            network: None,
            vip: None,
            reason: "no vip configured",
        };
        assert!(err.to_string().contains("network=<unset>, vip=<unset>"));
    }

    #[test]
    fn test_other_errors_are_not_resolution_failures() {
        let err = Error::invalid_network("10.0.0.0/33", "prefix too long");
        assert!(!err.is_not_resolvable());
        assert_eq!(
            err.to_string(),
            "invalid network '10.0.0.0/33': prefix too long"
        );
        let err = Error::hook_tool("unit-get public-address", "exit status 1");
        assert_eq!(
            err.to_string(),
            "hook tool `unit-get public-address` failed: exit status 1"
        );
    }
}
