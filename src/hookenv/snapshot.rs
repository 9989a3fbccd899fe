//! Snapshot file loading.
//!
//! A snapshot answers every environment trait from recorded unit state, so a
//! resolution can be replayed outside a hook.

use super::{ClusterStatus, ConfigSource, ContextSet, LocalInterfaces, NetworkLookup, UnitInventory};
use crate::error::{Error, Result};
use crate::models::Snapshot;
use std::path::Path;

/// Read a unit snapshot from a JSON file.
///
/// # Returns
/// * `Ok(Snapshot)` - The recorded unit state
/// * `Err` - If the file doesn't exist or a field doesn't parse
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Snapshot> {
    let path = path.as_ref();
    let display = path.display().to_string();

    if !path.exists() {
        return Err(Error::Snapshot {
            path: display,
            message: "file does not exist".to_string(),
        });
    }
    log::info!("Reading snapshot file: {display}");

    let json = std::fs::read_to_string(path)?;
    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let snapshot: Snapshot = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        Error::Snapshot {
            path: display.clone(),
            message: format!("path={} error={}", e.path(), e),
        }
    })?;

    log::debug!(
        "snapshot: {} config keys, {} unit attributes, clustered={}",
        snapshot.config.len(),
        snapshot.unit.len(),
        snapshot.clustered
    );
    Ok(snapshot)
}

impl ConfigSource for Snapshot {
    fn config_get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.config_value(key))
    }
}

impl UnitInventory for Snapshot {
    fn unit_get(&self, attribute: &str) -> Result<String> {
        self.unit
            .get(attribute)
            .cloned()
            .ok_or_else(|| Error::MissingAttribute(attribute.to_string()))
    }
}

impl NetworkLookup for Snapshot {
    fn address_in_network(&self, network: Option<&str>, fallback: &str) -> Result<String> {
        LocalInterfaces::new(self.local_addresses.clone()).address_in_network(network, fallback)
    }
}

impl ClusterStatus for Snapshot {
    fn is_clustered(&self) -> Result<bool> {
        Ok(self.clustered)
    }
}

impl ContextSet for Snapshot {
    fn complete_contexts(&self) -> Vec<String> {
        self.complete_contexts.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_snapshot(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(json.as_bytes()).expect("write snapshot");
        file
    }

    #[test]
    fn test_read_snapshot() {
        let file = write_snapshot(
            r#"{
                "config": {"vip": "10.5.3.1", "os-public-network": null},
                "unit": {"public-address": "unit1"},
                "clustered": true,
                "local_addresses": ["10.5.3.7"],
                "complete_contexts": ["https"]
            }"#,
        );
        let snapshot = read_snapshot(file.path()).expect("Error reading snapshot");
        assert_eq!(snapshot.config_get("vip").unwrap().as_deref(), Some("10.5.3.1"));
        assert_eq!(snapshot.config_get("os-public-network").unwrap(), None);
        assert_eq!(snapshot.unit_get("public-address").unwrap(), "unit1");
        assert!(snapshot.is_clustered().unwrap());
        assert!(snapshot.is_complete("https"));
        assert_eq!(
            snapshot
                .address_in_network(Some("10.5.3.0/24"), "unit1")
                .unwrap(),
            "10.5.3.7"
        );
    }

    #[test]
    fn test_missing_attribute() {
        let snapshot = Snapshot::default();
        assert!(matches!(
            snapshot.unit_get("private-address"),
            Err(Error::MissingAttribute(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = read_snapshot("src/tests/test_data/no_such_snapshot.json").unwrap_err();
        assert!(err.to_string().contains("file does not exist"));
    }

    #[test]
    fn test_bad_field_reports_path() {
        let file = write_snapshot(r#"{"local_addresses": ["10.0.0.1", "not-an-ip"]}"#);
        let err = read_snapshot(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("local_addresses"), "{message}");
    }
}
