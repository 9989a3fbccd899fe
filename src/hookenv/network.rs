//! Network lookup over the unit's local addresses.

use super::NetworkLookup;
use crate::error::{Error, Result};
use crate::models::{is_link_local_v6, parse_networks, Cidr};
use std::net::IpAddr;

/// Local interface addresses, in interface order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalInterfaces {
    addresses: Vec<IpAddr>,
}

impl LocalInterfaces {
    pub fn new(addresses: Vec<IpAddr>) -> LocalInterfaces {
        LocalInterfaces { addresses }
    }

    /// Addresses bound to the host's interfaces.
    #[cfg(unix)]
    pub fn from_system() -> Result<LocalInterfaces> {
        let ifaddrs = nix::ifaddrs::getifaddrs()
            .map_err(|e| Error::Io(std::io::Error::from(e)))?;

        let mut addresses = Vec::new();
        for ifaddr in ifaddrs {
            let Some(address) = ifaddr.address else {
                continue;
            };
            let ip = if let Some(v4) = address.as_sockaddr_in() {
                IpAddr::V4(v4.ip())
            } else if let Some(v6) = address.as_sockaddr_in6() {
                IpAddr::V6(v6.ip())
            } else {
                continue;
            };
            log::trace!("interface {} has {ip}", ifaddr.interface_name);
            if !addresses.contains(&ip) {
                addresses.push(ip);
            }
        }
        log::debug!("found {} local addresses", addresses.len());
        Ok(LocalInterfaces { addresses })
    }

    #[cfg(not(unix))]
    pub fn from_system() -> Result<LocalInterfaces> {
        log::warn!("interface enumeration is not supported on this platform");
        Ok(LocalInterfaces::default())
    }

    pub fn addresses(&self) -> &[IpAddr] {
        &self.addresses
    }

    /// First local address inside `cidr`, skipping IPv6 link-local addresses.
    fn first_in(&self, cidr: &Cidr) -> Option<IpAddr> {
        self.addresses
            .iter()
            .filter(|addr| !is_link_local_v6(addr))
            .find(|addr| cidr.contains(addr))
            .copied()
    }
}

impl NetworkLookup for LocalInterfaces {
    /// `networks` may list several CIDRs; the first one holding a local
    /// address wins.
    fn address_in_network(&self, networks: Option<&str>, fallback: &str) -> Result<String> {
        let Some(networks) = networks.filter(|n| !n.trim().is_empty()) else {
            return Ok(fallback.to_string());
        };

        let cidrs = parse_networks(networks)?;

        for cidr in &cidrs {
            if let Some(addr) = self.first_in(cidr) {
                log::debug!("{addr} is in {cidr}");
                return Ok(addr.to_string());
            }
        }

        log::warn!("No local address found in {networks}, using {fallback}");
        Ok(fallback.to_string())
    }
}
