//! Recorded unit state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::net::IpAddr;

/// Everything the resolver asks of a unit, captured in one document.
///
/// ```json
/// {
///   "config": {"vip": "192.168.20.100 10.5.3.1", "os-public-network": "192.168.20.0/24"},
///   "unit": {"public-address": "unit1", "private-address": "10.0.0.5"},
///   "clustered": true,
///   "local_addresses": ["192.168.20.5"],
///   "complete_contexts": ["https"]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Charm configuration as printed by `config-get --format=json`.
    #[serde(default)]
    pub config: HashMap<String, Value>,
    /// Unit inventory attributes (`public-address`, `private-address`, ...).
    #[serde(default)]
    pub unit: HashMap<String, String>,
    #[serde(default)]
    pub clustered: bool,
    /// Addresses bound to the unit's interfaces.
    #[serde(default)]
    pub local_addresses: Vec<IpAddr>,
    #[serde(default)]
    pub complete_contexts: Vec<String>,
}

impl Snapshot {
    /// Config value as a string; JSON null and missing keys are `None`.
    pub fn config_value(&self, key: &str) -> Option<String> {
        json_config_value(self.config.get(key)?)
    }
}

/// Render a config value the way the resolver consumes it.
pub fn json_config_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
