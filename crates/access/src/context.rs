use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use outpost_core::{IdentityId, LocationId, ValueObject};

use crate::Role;

/// One identity's granted role at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRoleAssignment {
    pub location_id: LocationId,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
}

impl LocationRoleAssignment {
    pub fn new(location_id: impl Into<LocationId>, role: Role) -> Self {
        Self {
            location_id: location_id.into(),
            role,
            location_name: None,
            org_name: None,
        }
    }

    /// Attach the denormalized display names carried by the assignment row.
    pub fn with_names(mut self, location_name: Option<String>, org_name: Option<String>) -> Self {
        self.location_name = location_name;
        self.org_name = org_name;
        self
    }
}

/// Presentation fields of an identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub display_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,
}

/// Which signal(s) granted super-admin status.
///
/// Two sources exist: a top-rank location assignment, and an explicit flag from
/// the identity provider. Either one is sufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuperAdminSource {
    None,
    Assignment,
    Claim,
    Both,
}

impl SuperAdminSource {
    pub fn from_signals(assignment: bool, claim: bool) -> Self {
        match (assignment, claim) {
            (false, false) => Self::None,
            (true, false) => Self::Assignment,
            (false, true) => Self::Claim,
            (true, true) => Self::Both,
        }
    }

    pub fn is_super_admin(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Resolved, immutable snapshot of an identity's privileges and profile.
///
/// Built once per resolution and replaced wholesale on re-resolution; there
/// are no setters. Assignments are keyed by location id, so at most one
/// assignment exists per location and iteration order is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationContext {
    identity_id: IdentityId,
    super_admin: SuperAdminSource,
    assignments: BTreeMap<LocationId, LocationRoleAssignment>,
    profile: Profile,
    display_role: Role,
}

impl AuthorizationContext {
    /// Build a context from fetched rows.
    ///
    /// `super_admin_claim` is the identity provider's explicit flag (`false`
    /// when the provider supplies none). Duplicate rows for the same location
    /// keep the higher-ranked role.
    pub fn new(
        identity_id: IdentityId,
        super_admin_claim: bool,
        assignments: impl IntoIterator<Item = LocationRoleAssignment>,
        profile: Profile,
    ) -> Self {
        let mut by_location: BTreeMap<LocationId, LocationRoleAssignment> = BTreeMap::new();
        for assignment in assignments {
            let existing = by_location.get(&assignment.location_id).map(|a| a.role);
            match existing {
                Some(existing) => {
                    tracing::warn!(
                        identity_id = %identity_id,
                        location_id = %assignment.location_id,
                        kept = %existing.max(assignment.role),
                        "duplicate location assignment; keeping the higher role"
                    );
                    if assignment.role > existing {
                        by_location.insert(assignment.location_id.clone(), assignment);
                    }
                }
                None => {
                    by_location.insert(assignment.location_id.clone(), assignment);
                }
            }
        }

        let legacy_super_admin = by_location.values().any(|a| a.role == Role::SuperAdmin);
        let super_admin = SuperAdminSource::from_signals(legacy_super_admin, super_admin_claim);
        let display_role = derive_display_role(super_admin.is_super_admin(), by_location.values());

        Self {
            identity_id,
            super_admin,
            assignments: by_location,
            profile,
            display_role,
        }
    }

    pub fn identity_id(&self) -> IdentityId {
        self.identity_id
    }

    pub fn is_super_admin(&self) -> bool {
        self.super_admin.is_super_admin()
    }

    pub fn super_admin_source(&self) -> SuperAdminSource {
        self.super_admin
    }

    /// Assignments ordered by location id.
    pub fn assignments(&self) -> impl ExactSizeIterator<Item = &LocationRoleAssignment> {
        self.assignments.values()
    }

    pub fn assignment(&self, location_id: &LocationId) -> Option<&LocationRoleAssignment> {
        self.assignments.get(location_id)
    }

    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Coarse label for presentation only.
    ///
    /// Never use this for gating decisions; those always consult the full
    /// assignment set.
    pub fn display_role(&self) -> Role {
        self.display_role
    }
}

impl ValueObject for AuthorizationContext {}

/// Highest of {super_admin, org_admin, location_admin, manager} found; staff otherwise.
fn derive_display_role<'a>(
    super_admin: bool,
    assignments: impl Iterator<Item = &'a LocationRoleAssignment>,
) -> Role {
    if super_admin {
        return Role::SuperAdmin;
    }
    assignments.map(|a| a.role).max().unwrap_or(Role::Staff)
}
