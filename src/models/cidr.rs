//! IP network (CIDR notation) utilities.
//!
//! Provides [`Cidr`] for representing IPv4 and IPv6 networks with a prefix
//! length, along with the mask helpers used for membership tests.

use crate::error::{Error, Result};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Maximum prefix length for an IPv4 network (32 bits).
const MAX_LENGTH_V4: u8 = 32;
/// Maximum prefix length for an IPv6 network (128 bits).
const MAX_LENGTH_V6: u8 = 128;

/// Maximum prefix length for the family of `addr`.
fn max_length(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => MAX_LENGTH_V4,
        IpAddr::V6(_) => MAX_LENGTH_V6,
    }
}

/// Convert an IPv4 prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use charm_address::models::get_cidr_mask_v4;
/// assert_eq!(get_cidr_mask_v4(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask_v4(len: u8) -> Result<u32> {
    if len > MAX_LENGTH_V4 {
        Err(Error::invalid_network(
            format!("/{len}"),
            "Network length is too long",
        ))
    } else if len == 0 {
        Ok(0)
    } else {
        Ok(u32::MAX << (MAX_LENGTH_V4 - len))
    }
}

/// Convert an IPv6 prefix length to a subnet mask as u128.
fn get_cidr_mask_v6(len: u8) -> Result<u128> {
    if len > MAX_LENGTH_V6 {
        Err(Error::invalid_network(
            format!("/{len}"),
            "Network length is too long",
        ))
    } else if len == 0 {
        Ok(0)
    } else {
        Ok(u128::MAX << (MAX_LENGTH_V6 - len))
    }
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: IpAddr, len: u8) -> Result<IpAddr> {
    match addr {
        IpAddr::V4(v4) => {
            let bits = u32::from(v4) & get_cidr_mask_v4(len)?;
            Ok(IpAddr::V4(Ipv4Addr::from(bits)))
        }
        IpAddr::V6(v6) => {
            let bits = u128::from(v6) & get_cidr_mask_v6(len)?;
            Ok(IpAddr::V6(Ipv6Addr::from(bits)))
        }
    }
}

/// Parse a whitespace separated list of networks, as found in the
/// `os-*-network` config keys.
pub fn parse_networks(networks: &str) -> Result<Vec<Cidr>> {
    networks.split_whitespace().map(Cidr::new).collect()
}

/// True if `addr` lies inside any of `cidrs`.
pub fn contains_any(cidrs: &[Cidr], addr: &str) -> bool {
    cidrs.iter().any(|cidr| cidr.contains_str(addr))
}

/// True for IPv6 link-local addresses (fe80::/10).
pub fn is_link_local_v6(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V6(v6) => (v6.segments()[0] & 0xffc0) == 0xfe80,
        IpAddr::V4(_) => false,
    }
}

/// IP network with CIDR notation support.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub struct Cidr {
    /// The address as written; host bits may be set.
    pub addr: IpAddr,
    /// The prefix length (0-32 for IPv4, 0-128 for IPv6).
    pub mask: u8,
}

impl Cidr {
    /// Create a new [`Cidr`] from a string such as "10.0.0.0/24" or
    /// "2001:db8::/64". A bare address is a host network (/32 or /128).
    pub fn new(addr_cidr: &str) -> Result<Cidr> {
        let addr_cidr = addr_cidr.trim();
        let (addr_part, mask_part) = match addr_cidr.split_once('/') {
            Some((addr, mask)) => (addr, Some(mask)),
            None => (addr_cidr, None),
        };
        let addr: IpAddr = addr_part
            .parse()
            .map_err(|_| Error::invalid_network(addr_cidr, format!("Invalid address {addr_part}")))?;
        let max = max_length(&addr);
        let mask = match mask_part {
            Some(mask) => mask
                .parse::<u8>()
                .map_err(|_| Error::invalid_network(addr_cidr, format!("Invalid mask {mask}")))?,
            None => max,
        };
        if mask > max {
            return Err(Error::invalid_network(
                addr_cidr,
                "Network length is too long",
            ));
        }
        Ok(Cidr { addr, mask })
    }

    /// Get the network address (host bits cleared).
    pub fn network(&self) -> IpAddr {
        // mask is bounded by the constructor
        cut_addr(self.addr, self.mask).unwrap_or(self.addr)
    }

    /// True if `addr` lies inside this network. Families never mix.
    pub fn contains(&self, addr: &IpAddr) -> bool {
        if self.addr.is_ipv4() != addr.is_ipv4() {
            return false;
        }
        match cut_addr(*addr, self.mask) {
            Ok(net) => net == self.network(),
            Err(_) => false,
        }
    }

    /// Like [`Cidr::contains`] for a textual address; anything that is not an
    /// IP literal (a hostname, say) is never inside a network.
    pub fn contains_str(&self, addr: &str) -> bool {
        match addr.trim().parse::<IpAddr>() {
            Ok(ip) => self.contains(&ip),
            Err(_) => {
                log::debug!("'{addr}' is not an IP address, not in {self}");
                false
            }
        }
    }
}

impl FromStr for Cidr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Cidr::new(s)
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
