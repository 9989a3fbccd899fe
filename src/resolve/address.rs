//! Address resolution for a network role.

use super::select::{select_one, Selection};
use crate::config::VIP_KEY;
use crate::error::{Error, Result};
use crate::hookenv::{ClusterStatus, ConfigSource, NetworkLookup, UnitEnvironment, UnitInventory};
use crate::models::{parse_networks, NetworkRole};

/// Picks the address clients should use to reach this unit.
///
/// Collaborators are borrowed for the resolver's lifetime; resolution reads
/// them and nothing else, so repeated calls over unchanged state agree.
#[derive(Clone, Copy)]
pub struct AddressResolver<'a> {
    config: &'a dyn ConfigSource,
    inventory: &'a dyn UnitInventory,
    network: &'a dyn NetworkLookup,
    cluster: &'a dyn ClusterStatus,
}

impl<'a> AddressResolver<'a> {
    pub fn new(
        config: &'a dyn ConfigSource,
        inventory: &'a dyn UnitInventory,
        network: &'a dyn NetworkLookup,
        cluster: &'a dyn ClusterStatus,
    ) -> AddressResolver<'a> {
        AddressResolver {
            config,
            inventory,
            network,
            cluster,
        }
    }

    /// Resolver over a single environment implementing every collaborator.
    pub fn from_environment<E: UnitEnvironment>(env: &'a E) -> AddressResolver<'a> {
        AddressResolver::new(env, env, env, env)
    }

    /// Resolve the address for `role`.
    ///
    /// Outside a cluster this is the unit's own address, mapped onto the
    /// role's network when one is configured. Inside a cluster it is the one
    /// VIP that belongs to the role: the only VIP when no network is
    /// configured, or the only VIP inside the configured network.
    ///
    /// # Errors
    /// [`Error::AddressNotResolvable`] when the cluster configuration does
    /// not single out one VIP. Collaborator failures are passed through.
    pub fn resolve_address(&self, role: NetworkRole) -> Result<String> {
        let binding = role.binding();
        let network = self
            .config
            .config_get(binding.config_key)?
            .filter(|n| !n.trim().is_empty());

        if !self.cluster.is_clustered()? {
            let raw = self.inventory.unit_get(binding.inventory_attribute)?;
            let address = match network.as_deref() {
                Some(net) => self.network.address_in_network(Some(net), &raw)?,
                None => raw,
            };
            log::debug!("resolved {role} address {address} (not clustered)");
            return Ok(address);
        }

        // a malformed override is reported before any vip is looked at
        if let Some(net) = network.as_deref() {
            parse_networks(net)?;
        }

        let vip = self.config.config_get(VIP_KEY)?;
        let candidates: Vec<&str> = vip.as_deref().unwrap_or_default().split_whitespace().collect();

        let not_resolvable = |reason: &'static str| {
            log::warn!("cannot resolve {role} address: {reason} (network={network:?}, vip={vip:?})");
            Error::AddressNotResolvable {
                role,
                network: network.clone(),
                vip: vip.clone(),
                reason,
            }
        };

        let selection = match network.as_deref() {
            None => match select_one(candidates.iter().copied()) {
                Selection::Ambiguous(_) => return Err(not_resolvable("multiple vips without a network")),
                other => other,
            },
            Some(net) => {
                let mut matching = Vec::with_capacity(candidates.len());
                for candidate in &candidates {
                    if self.network.is_address_in_network(net, candidate)? {
                        matching.push(*candidate);
                    }
                }
                match select_one(matching) {
                    Selection::Empty if !candidates.is_empty() => {
                        return Err(not_resolvable("no vip in network"))
                    }
                    Selection::Ambiguous(_) => return Err(not_resolvable("multiple vips in network")),
                    other => other,
                }
            }
        };

        match selection {
            Selection::One(address) => {
                log::debug!("resolved {role} address {address} (clustered)");
                Ok(address.to_string())
            }
            _ => Err(not_resolvable("no vip configured")),
        }
    }

    /// Resolve the public address.
    pub fn resolve_default(&self) -> Result<String> {
        self.resolve_address(NetworkRole::default())
    }
}

/// Resolve `role` over a single environment.
pub fn resolve_address<E: UnitEnvironment>(env: &E, role: NetworkRole) -> Result<String> {
    AddressResolver::from_environment(env).resolve_address(role)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::hookenv::{ClusterStatus, ConfigSource, NetworkLookup, UnitInventory};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory unit that records the network lookups made against it.
    #[derive(Default)]
    pub(crate) struct FakeUnit {
        pub config: HashMap<String, String>,
        pub inventory: HashMap<String, String>,
        pub clustered: bool,
        /// Answer for `address_in_network` when a network is given.
        pub in_network: Option<String>,
        pub lookups: Mutex<Vec<(Option<String>, String)>>,
    }

    impl FakeUnit {
        pub(crate) fn new() -> FakeUnit {
            let mut unit = FakeUnit::default();
            for role in NetworkRole::ALL {
                unit.inventory
                    .insert(role.inventory_attribute().to_string(), "unit1".to_string());
            }
            unit
        }

        pub(crate) fn set(mut self, key: &str, value: &str) -> FakeUnit {
            self.config.insert(key.to_string(), value.to_string());
            self
        }

        pub(crate) fn clustered(mut self) -> FakeUnit {
            self.clustered = true;
            self
        }

        fn lookups(&self) -> Vec<(Option<String>, String)> {
            self.lookups.lock().unwrap().clone()
        }
    }

    impl ConfigSource for FakeUnit {
        fn config_get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.config.get(key).cloned())
        }
    }

    impl UnitInventory for FakeUnit {
        fn unit_get(&self, attribute: &str) -> Result<String> {
            self.inventory
                .get(attribute)
                .cloned()
                .ok_or_else(|| Error::MissingAttribute(attribute.to_string()))
        }
    }

    impl NetworkLookup for FakeUnit {
        fn address_in_network(&self, network: Option<&str>, fallback: &str) -> Result<String> {
            self.lookups
                .lock()
                .unwrap()
                .push((network.map(str::to_string), fallback.to_string()));
            Ok(match (network, &self.in_network) {
                (Some(_), Some(addr)) => addr.clone(),
                _ => fallback.to_string(),
            })
        }
    }

    impl ClusterStatus for FakeUnit {
        fn is_clustered(&self) -> Result<bool> {
            Ok(self.clustered)
        }
    }

    #[test]
    fn test_resolve_address_default() {
        let unit = FakeUnit::new();
        assert_eq!(resolve_address(&unit, NetworkRole::default()).unwrap(), "unit1");
        assert!(unit.lookups().is_empty());
    }

    #[test]
    fn test_resolve_address_uses_role_attribute() {
        let mut unit = FakeUnit::new();
        unit.inventory
            .insert("private-address".to_string(), "10.0.0.5".to_string());
        unit.inventory
            .insert("admin-address".to_string(), "10.1.0.5".to_string());
        let resolver = AddressResolver::from_environment(&unit);
        assert_eq!(resolver.resolve_address(NetworkRole::Public).unwrap(), "unit1");
        assert_eq!(resolver.resolve_address(NetworkRole::Internal).unwrap(), "10.0.0.5");
        assert_eq!(resolver.resolve_address(NetworkRole::Admin).unwrap(), "10.1.0.5");
    }

    #[test]
    fn test_resolve_address_public_not_clustered() {
        let mut unit = FakeUnit::new().set("os-public-network", "192.168.20.0/24");
        unit.in_network = Some("192.168.20.1".to_string());
        assert_eq!(resolve_address(&unit, NetworkRole::Public).unwrap(), "192.168.20.1");
        assert_eq!(
            unit.lookups(),
            vec![(Some("192.168.20.0/24".to_string()), "unit1".to_string())]
        );
    }

    #[test]
    fn test_resolve_address_network_only_for_its_role() {
        let mut unit = FakeUnit::new().set("os-internal-network", "10.0.0.0/24");
        unit.in_network = Some("10.0.0.9".to_string());
        assert_eq!(resolve_address(&unit, NetworkRole::Public).unwrap(), "unit1");
        assert_eq!(resolve_address(&unit, NetworkRole::Internal).unwrap(), "10.0.0.9");
    }

    #[test]
    fn test_resolve_address_empty_network_is_unset() {
        let mut unit = FakeUnit::new().set("os-public-network", "  ");
        unit.in_network = Some("192.168.20.1".to_string());
        assert_eq!(resolve_address(&unit, NetworkRole::Public).unwrap(), "unit1");
        assert!(unit.lookups().is_empty());
    }

    #[test]
    fn test_resolve_address_default_clustered() {
        let unit = FakeUnit::new().clustered().set("vip", "10.5.3.1");
        assert_eq!(resolve_address(&unit, NetworkRole::Public).unwrap(), "10.5.3.1");
    }

    #[test]
    fn test_resolve_address_clustered_multiple_vips_without_network() {
        let unit = FakeUnit::new()
            .clustered()
            .set("vip", "192.168.20.100 10.5.3.1");
        let err = resolve_address(&unit, NetworkRole::Public).unwrap_err();
        assert!(err.is_not_resolvable());
        match err {
            Error::AddressNotResolvable { role, network, vip, reason } => {
                assert_eq!(role, NetworkRole::Public);
                assert_eq!(network, None);
                assert_eq!(vip.as_deref(), Some("192.168.20.100 10.5.3.1"));
                assert_eq!(reason, "multiple vips without a network");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_resolve_address_public_clustered() {
        let unit = FakeUnit::new()
            .clustered()
            .set("os-public-network", "192.168.20.0/24")
            .set("vip", "192.168.20.100 10.5.3.1");
        assert_eq!(resolve_address(&unit, NetworkRole::Public).unwrap(), "192.168.20.100");
    }

    #[test]
    fn test_resolve_address_internal_clustered_picks_its_vip() {
        let unit = FakeUnit::new()
            .clustered()
            .set("os-public-network", "192.168.20.0/24")
            .set("os-internal-network", "10.5.3.0/24")
            .set("vip", "192.168.20.100 10.5.3.1");
        assert_eq!(resolve_address(&unit, NetworkRole::Internal).unwrap(), "10.5.3.1");
    }

    #[test]
    fn test_resolve_address_public_clustered_inresolvable() {
        let unit = FakeUnit::new()
            .clustered()
            .set("os-public-network", "192.168.20.0/24")
            .set("vip", "10.5.3.1");
        let err = resolve_address(&unit, NetworkRole::Public).unwrap_err();
        assert!(matches!(
            err,
            Error::AddressNotResolvable { reason: "no vip in network", .. }
        ));
    }

    #[test]
    fn test_resolve_address_clustered_two_vips_in_network() {
        let unit = FakeUnit::new()
            .clustered()
            .set("os-public-network", "192.168.20.0/24")
            .set("vip", "192.168.20.100 192.168.20.101");
        let err = resolve_address(&unit, NetworkRole::Public).unwrap_err();
        assert!(matches!(
            err,
            Error::AddressNotResolvable { reason: "multiple vips in network", .. }
        ));
    }

    #[test]
    fn test_resolve_address_clustered_without_vip() {
        let unit = FakeUnit::new().clustered();
        let err = resolve_address(&unit, NetworkRole::Public).unwrap_err();
        assert!(matches!(
            err,
            Error::AddressNotResolvable { reason: "no vip configured", .. }
        ));

        let unit = FakeUnit::new()
            .clustered()
            .set("os-public-network", "192.168.20.0/24")
            .set("vip", " ");
        let err = resolve_address(&unit, NetworkRole::Public).unwrap_err();
        assert!(matches!(
            err,
            Error::AddressNotResolvable { reason: "no vip configured", .. }
        ));
    }

    #[test]
    fn test_resolve_address_clustered_invalid_network() {
        let unit = FakeUnit::new()
            .clustered()
            .set("os-public-network", "192.168.20.0/99")
            .set("vip", "192.168.20.100");
        let err = resolve_address(&unit, NetworkRole::Public).unwrap_err();
        assert!(matches!(err, Error::InvalidNetwork { .. }));
    }

    #[test]
    fn test_resolve_address_clustered_invalid_network_without_vip() {
        let unit = FakeUnit::new()
            .clustered()
            .set("os-public-network", "192.168.20.0/99");
        let err = resolve_address(&unit, NetworkRole::Public).unwrap_err();
        assert!(matches!(err, Error::InvalidNetwork { .. }));

        let unit = FakeUnit::new()
            .clustered()
            .set("os-public-network", "192.168.20.0/99")
            .set("vip", "  ");
        let err = resolve_address(&unit, NetworkRole::Public).unwrap_err();
        assert!(matches!(err, Error::InvalidNetwork { .. }));
    }

    #[test]
    fn test_resolve_address_clustered_several_networks() {
        let unit = FakeUnit::new()
            .clustered()
            .set("os-public-network", "192.168.20.0/24 10.5.3.0/24")
            .set("vip", "10.5.3.1");
        assert_eq!(resolve_address(&unit, NetworkRole::Public).unwrap(), "10.5.3.1");

        let unit = FakeUnit::new()
            .clustered()
            .set("os-public-network", "192.168.20.0/24 10.5.3.0/24")
            .set("vip", "192.168.20.100 10.5.3.1");
        let err = resolve_address(&unit, NetworkRole::Public).unwrap_err();
        assert!(matches!(
            err,
            Error::AddressNotResolvable { reason: "multiple vips in network", .. }
        ));
    }

    #[test]
    fn test_resolve_address_several_networks_either_cluster_state() {
        let local = crate::hookenv::LocalInterfaces::new(vec!["10.5.3.7".parse().unwrap()]);
        let standalone = FakeUnit::new().set("os-public-network", "192.168.20.0/24 10.5.3.0/24");
        let resolver = AddressResolver::new(&standalone, &standalone, &local, &standalone);
        assert_eq!(resolver.resolve_default().unwrap(), "10.5.3.7");

        let clustered = FakeUnit::new()
            .clustered()
            .set("os-public-network", "192.168.20.0/24 10.5.3.0/24")
            .set("vip", "10.5.3.1");
        let resolver = AddressResolver::new(&clustered, &clustered, &local, &clustered);
        assert_eq!(resolver.resolve_default().unwrap(), "10.5.3.1");
    }

    #[test]
    fn test_resolve_address_vip_whitespace() {
        let unit = FakeUnit::new()
            .clustered()
            .set("os-admin-network", "10.9.0.0/16")
            .set("vip", "\t192.168.20.100   10.9.1.1 \n");
        assert_eq!(resolve_address(&unit, NetworkRole::Admin).unwrap(), "10.9.1.1");
    }

    #[test]
    fn test_resolve_address_is_idempotent() {
        let unit = FakeUnit::new()
            .clustered()
            .set("os-public-network", "192.168.20.0/24")
            .set("vip", "192.168.20.100 10.5.3.1");
        let resolver = AddressResolver::from_environment(&unit);
        let first = resolver.resolve_default().unwrap();
        let second = resolver.resolve_default().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_inventory_attribute_propagates() {
        let mut unit = FakeUnit::new();
        unit.inventory.clear();
        let err = resolve_address(&unit, NetworkRole::Public).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute(attr) if attr == "public-address"));
    }
}
