//! Domain models for address resolution.
//!
//! - [`Cidr`] - IPv4/IPv6 network with prefix length
//! - [`NetworkRole`] - public/internal/admin role and its config bindings
//! - [`Snapshot`] - recorded unit state for offline resolution

mod cidr;
mod role;
mod snapshot;

// Re-export public types
pub use cidr::{contains_any, cut_addr, get_cidr_mask_v4, is_link_local_v6, parse_networks, Cidr};
pub use role::{NetworkRole, RoleBinding};
pub use snapshot::{json_config_value, Snapshot};
