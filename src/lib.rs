//! Resolve the address a deployed unit is reached on.
//!
//! Given a [`NetworkRole`], the unit's cluster state and its configuration,
//! [`AddressResolver`] picks the one address clients should use, and
//! [`canonical_url`] turns it into the unit's base URL.
//!
//! The unit is reached through the traits in [`hookenv`]; use [`HookTools`]
//! inside a hook, a [`Snapshot`] for recorded state, or your own types.

pub mod config;
pub mod error;
pub mod hookenv;
pub mod models;
pub mod resolve;

pub use error::{Error, Result};
pub use hookenv::{
    read_snapshot, ClusterStatus, ConfigSource, ContextSet, HookTools, LocalInterfaces,
    NetworkLookup, UnitEnvironment, UnitInventory,
};
pub use models::{Cidr, NetworkRole, Snapshot};
pub use resolve::{canonical_url, canonical_url_for, resolve_address, AddressResolver};
