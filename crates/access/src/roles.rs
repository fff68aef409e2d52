use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use outpost_core::DomainError;

/// Privilege level held at a location.
///
/// The set is closed and totally ordered by [`Role::rank`]. Ordering and
/// comparison go through the rank only, never through the role name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Staff,
    Manager,
    LocationAdmin,
    OrgAdmin,
    /// Ceiling rank. Also carried as a bypass flag on the context, since a
    /// super-admin may hold no location assignment at all.
    SuperAdmin,
}

impl Role {
    /// All roles, least privileged first.
    pub const ALL: [Role; 5] = [
        Role::Staff,
        Role::Manager,
        Role::LocationAdmin,
        Role::OrgAdmin,
        Role::SuperAdmin,
    ];

    /// The ceiling of the hierarchy.
    pub const TOP: Role = Role::SuperAdmin;

    /// Numeric privilege level; higher is more privileged.
    pub const fn rank(self) -> u8 {
        match self {
            Role::Staff => 1,
            Role::Manager => 2,
            Role::LocationAdmin => 3,
            Role::OrgAdmin => 4,
            Role::SuperAdmin => 5,
        }
    }

    pub fn compare(self, other: Role) -> Ordering {
        self.rank().cmp(&other.rank())
    }

    /// `true` when this role meets or exceeds `required`.
    pub fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Manager => "manager",
            Role::LocationAdmin => "location_admin",
            Role::OrgAdmin => "org_admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Human-readable label for pickers and badges.
    pub const fn label(self) -> &'static str {
        match self {
            Role::Staff => "Staff",
            Role::Manager => "Manager",
            Role::LocationAdmin => "Location Admin",
            Role::OrgAdmin => "Org Admin",
            Role::SuperAdmin => "Super Admin",
        }
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(*other)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| DomainError::validation(format!("unknown role '{normalized}'")))
    }
}
