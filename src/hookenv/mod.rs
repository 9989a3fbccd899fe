//! Unit environment access.
//!
//! The resolver only talks to the traits defined here:
//! - [`ConfigSource`] - charm configuration values
//! - [`UnitInventory`] - the unit's own addresses
//! - [`NetworkLookup`] - mapping addresses onto configured networks
//! - [`ClusterStatus`] - HA cluster membership
//! - [`ContextSet`] - already evaluated configuration contexts
//!
//! Implementations:
//! - [`HookTools`] - runs the orchestrator's hook tools
//! - [`Snapshot`](crate::models::Snapshot) - recorded state, see [`read_snapshot`]
//! - [`LocalInterfaces`] - network lookup over a set of local addresses

mod cli;
mod network;
mod snapshot;
mod tools;

use crate::error::Result;
use crate::models::{contains_any, parse_networks};
use std::collections::{BTreeSet, HashSet};

pub use cli::run;
pub use network::LocalInterfaces;
pub use snapshot::read_snapshot;
pub use tools::HookTools;

/// Reads named charm configuration values.
pub trait ConfigSource: Send + Sync {
    /// `Ok(None)` when the key is unset.
    fn config_get(&self, key: &str) -> Result<Option<String>>;
}

/// Reads this unit's inventory addresses.
pub trait UnitInventory: Send + Sync {
    /// Address for an attribute such as `public-address`.
    fn unit_get(&self, attribute: &str) -> Result<String>;
}

/// Maps addresses onto configured networks.
pub trait NetworkLookup: Send + Sync {
    /// The unit's address inside `network`, or `fallback` when there is no
    /// network or no local address inside it.
    fn address_in_network(&self, network: Option<&str>, fallback: &str) -> Result<String>;

    /// Whether `address` lies inside `network`, which may list several
    /// whitespace separated CIDRs.
    fn is_address_in_network(&self, network: &str, address: &str) -> Result<bool> {
        Ok(contains_any(&parse_networks(network)?, address))
    }
}

/// Reports HA cluster membership.
pub trait ClusterStatus: Send + Sync {
    fn is_clustered(&self) -> Result<bool>;
}

/// Names of the configuration contexts that are complete.
pub trait ContextSet {
    fn complete_contexts(&self) -> Vec<String>;

    fn is_complete(&self, name: &str) -> bool {
        self.complete_contexts().iter().any(|c| c == name)
    }
}

/// Everything the resolver needs from one place.
pub trait UnitEnvironment: ConfigSource + UnitInventory + NetworkLookup + ClusterStatus {}

impl<T> UnitEnvironment for T where T: ConfigSource + UnitInventory + NetworkLookup + ClusterStatus {}

impl ContextSet for [String] {
    fn complete_contexts(&self) -> Vec<String> {
        self.to_vec()
    }
}

impl ContextSet for [&str] {
    fn complete_contexts(&self) -> Vec<String> {
        self.iter().map(|c| c.to_string()).collect()
    }
}

impl ContextSet for Vec<String> {
    fn complete_contexts(&self) -> Vec<String> {
        self.clone()
    }
}

impl ContextSet for HashSet<String> {
    fn complete_contexts(&self) -> Vec<String> {
        self.iter().cloned().collect()
    }

    fn is_complete(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl ContextSet for BTreeSet<String> {
    fn complete_contexts(&self) -> Vec<String> {
        self.iter().cloned().collect()
    }

    fn is_complete(&self, name: &str) -> bool {
        self.contains(name)
    }
}
