//! Hook tool backed environment.
//!
//! Answers the environment traits by running `config-get`, `unit-get` and the
//! `relation-*` tools and parsing their `--format=json` output.

use super::cli::run_in;
use super::{ClusterStatus, ConfigSource, LocalInterfaces, NetworkLookup, UnitInventory};
use crate::config::{CLUSTERED_KEY, ENV_TOOL_DIR, HA_RELATION};
use crate::error::{Error, Result};
use crate::models::json_config_value;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;

/// Environment backed by the orchestrator's hook tools.
#[derive(Debug, Clone, Default)]
pub struct HookTools {
    tool_dir: Option<PathBuf>,
    interfaces: LocalInterfaces,
}

impl HookTools {
    /// Tools from `PATH`, no local addresses.
    pub fn new() -> HookTools {
        HookTools::default()
    }

    /// Tools from `CHARM_ADDRESS_TOOL_DIR` (or `PATH`) and the host's
    /// interface addresses.
    pub fn from_env() -> Result<HookTools> {
        let tool_dir = std::env::var_os(ENV_TOOL_DIR).map(PathBuf::from);
        if let Some(dir) = &tool_dir {
            log::info!("Using hook tools from {}", dir.display());
        }
        Ok(HookTools {
            tool_dir,
            interfaces: LocalInterfaces::from_system()?,
        })
    }

    pub fn with_tool_dir(mut self, dir: impl Into<PathBuf>) -> HookTools {
        self.tool_dir = Some(dir.into());
        self
    }

    pub fn with_interfaces(mut self, interfaces: LocalInterfaces) -> HookTools {
        self.interfaces = interfaces;
        self
    }

    /// Run a tool and parse its JSON output.
    fn run_json<T: DeserializeOwned>(&self, cmd: &str) -> Result<T> {
        let output = run_in(self.tool_dir.as_deref(), cmd)?;
        let mut deserializer = serde_json::Deserializer::from_str(&output);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
            log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
            Error::hook_tool(cmd, format!("path={} error={}", e.path(), e))
        })
    }
}

impl ConfigSource for HookTools {
    fn config_get(&self, key: &str) -> Result<Option<String>> {
        let value: Value = self.run_json(&format!("config-get --format=json {key}"))?;
        Ok(json_config_value(&value))
    }
}

impl UnitInventory for HookTools {
    fn unit_get(&self, attribute: &str) -> Result<String> {
        let value: Option<String> = self.run_json(&format!("unit-get --format=json {attribute}"))?;
        value.ok_or_else(|| Error::MissingAttribute(attribute.to_string()))
    }
}

impl NetworkLookup for HookTools {
    fn address_in_network(&self, network: Option<&str>, fallback: &str) -> Result<String> {
        self.interfaces.address_in_network(network, fallback)
    }
}

impl ClusterStatus for HookTools {
    /// Clustered once any unit on the `ha` relation has set `clustered`.
    fn is_clustered(&self) -> Result<bool> {
        let relation_ids: Option<Vec<String>> =
            self.run_json(&format!("relation-ids --format=json {HA_RELATION}"))?;
        for rid in relation_ids.unwrap_or_default() {
            let units: Option<Vec<String>> =
                self.run_json(&format!("relation-list --format=json -r {rid}"))?;
            for unit in units.unwrap_or_default() {
                let value: Value = self.run_json(&format!(
                    "relation-get --format=json -r {rid} {CLUSTERED_KEY} {unit}"
                ))?;
                if json_config_value(&value).is_some_and(|v| !v.is_empty()) {
                    log::debug!("{unit} on {rid} reports {CLUSTERED_KEY}={value}");
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}
