//! Canonical URL construction.

use super::address::AddressResolver;
use crate::config::HTTPS_CONTEXT;
use crate::error::Result;
use crate::hookenv::ContextSet;
use crate::models::NetworkRole;
use std::net::Ipv6Addr;

/// Base URL (scheme + host) clients should use for the public endpoint.
pub fn canonical_url<C>(resolver: &AddressResolver<'_>, contexts: &C) -> Result<String>
where
    C: ContextSet + ?Sized,
{
    canonical_url_for(resolver, contexts, NetworkRole::Public)
}

/// Base URL for the endpoint on `role`.
pub fn canonical_url_for<C>(
    resolver: &AddressResolver<'_>,
    contexts: &C,
    role: NetworkRole,
) -> Result<String>
where
    C: ContextSet + ?Sized,
{
    let address = resolver.resolve_address(role)?;
    let url = format_url(&address, contexts.is_complete(HTTPS_CONTEXT));
    log::debug!("canonical {role} url {url}");
    Ok(url)
}

/// Join scheme and host; IPv6 literals are bracketed. A zone ID
/// (`fe80::1%eth0`) stays inside the brackets with its `%` encoded as `%25`.
pub fn format_url(address: &str, https: bool) -> String {
    let scheme = if https { "https" } else { "http" };
    let (host, zone) = match address.split_once('%') {
        Some((host, zone)) => (host, Some(zone)),
        None => (address, None),
    };
    if host.parse::<Ipv6Addr>().is_err() {
        return format!("{scheme}://{address}");
    }
    match zone {
        Some(zone) => format!("{scheme}://[{host}%25{zone}]"),
        None => format!("{scheme}://[{host}]"),
    }
}
