//! Network roles a unit can be reached on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration key and inventory attribute backing a [`NetworkRole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleBinding {
    /// Config key holding the CIDR override for the role.
    pub config_key: &'static str,
    /// Inventory attribute holding the unit's raw address for the role.
    pub inventory_attribute: &'static str,
}

const PUBLIC_BINDING: RoleBinding = RoleBinding {
    config_key: "os-public-network",
    inventory_attribute: "public-address",
};

const INTERNAL_BINDING: RoleBinding = RoleBinding {
    config_key: "os-internal-network",
    inventory_attribute: "private-address",
};

const ADMIN_BINDING: RoleBinding = RoleBinding {
    config_key: "os-admin-network",
    inventory_attribute: "admin-address",
};

/// Logical network an endpoint is advertised on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkRole {
    Admin,
    Internal,
    #[default]
    Public,
}

impl NetworkRole {
    pub const ALL: [NetworkRole; 3] = [NetworkRole::Admin, NetworkRole::Internal, NetworkRole::Public];

    pub fn binding(self) -> &'static RoleBinding {
        match self {
            NetworkRole::Admin => &ADMIN_BINDING,
            NetworkRole::Internal => &INTERNAL_BINDING,
            NetworkRole::Public => &PUBLIC_BINDING,
        }
    }

    pub fn config_key(self) -> &'static str {
        self.binding().config_key
    }

    pub fn inventory_attribute(self) -> &'static str {
        self.binding().inventory_attribute
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NetworkRole::Admin => "admin",
            NetworkRole::Internal => "internal",
            NetworkRole::Public => "public",
        }
    }
}

impl fmt::Display for NetworkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(NetworkRole::Admin),
            "internal" => Ok(NetworkRole::Internal),
            "public" => Ok(NetworkRole::Public),
            other => Err(format!(
                "unknown network role '{other}' (expected admin, internal or public)"
            )),
        }
    }
}
