use serde::{Deserialize, Serialize};

use outpost_core::LocationId;

use crate::evaluate::can_assign_role;
use crate::guard::Requirement;
use crate::{AccessError, AuthorizationContext, Role};

/// Action-side authorization contract (checked before invoking a privileged action).
///
/// Implement this on actions that require a role. Callers enforce these
/// requirements before handing the request to the backend.
pub trait ActionAuthorization {
    fn requirements(&self) -> Vec<Requirement>;
}

/// Privileged server-side actions this layer gates.
///
/// Execution happens elsewhere; this layer only decides whether an attempt is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PrivilegedAction {
    /// Grant `role` at `location_id` to another identity.
    AssignRole { location_id: LocationId, role: Role },
    CreateLocation,
    CreateOrganization,
}

/// Minimum role at a location for granting roles there.
pub const ROLE_GRANTER_MIN: Role = Role::Manager;

impl ActionAuthorization for PrivilegedAction {
    fn requirements(&self) -> Vec<Requirement> {
        match self {
            PrivilegedAction::AssignRole { location_id, .. } => {
                vec![Requirement::min_role_at(ROLE_GRANTER_MIN, location_id.clone())]
            }
            PrivilegedAction::CreateLocation => vec![Requirement::min_role(Role::OrgAdmin)],
            PrivilegedAction::CreateOrganization => vec![Requirement::SuperAdmin],
        }
    }
}

/// Enforce every requirement an action declares.
///
/// - No IO
/// - No panics
pub fn authorize<A: ActionAuthorization>(
    ctx: &AuthorizationContext,
    action: &A,
) -> Result<(), AccessError> {
    for requirement in action.requirements() {
        requirement.enforce(ctx)?;
    }
    Ok(())
}

/// Authorize a privileged action, including the grant-hierarchy rule for role assignment.
pub fn authorize_action(
    ctx: &AuthorizationContext,
    action: &PrivilegedAction,
) -> Result<(), AccessError> {
    authorize(ctx, action)?;

    if let PrivilegedAction::AssignRole { location_id, role } = action {
        let assigner = acting_role(ctx, location_id)
            .ok_or_else(|| AccessError::UnknownLocation(location_id.clone()))?;
        if !can_assign_role(assigner, *role) {
            return Err(AccessError::RoleNotAssignable {
                assigner,
                target: *role,
            });
        }
    }

    tracing::debug!(identity_id = %ctx.identity_id(), ?action, "privileged action authorized");
    Ok(())
}

/// The role an identity acts with at a location.
fn acting_role(ctx: &AuthorizationContext, location_id: &LocationId) -> Option<Role> {
    if ctx.is_super_admin() {
        return Some(Role::TOP);
    }
    ctx.assignment(location_id).map(|a| a.role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpost_core::IdentityId;

    use crate::{LocationRoleAssignment, Profile};

    fn ctx_with(super_admin: bool, assignments: &[(&str, Role)]) -> AuthorizationContext {
        AuthorizationContext::new(
            IdentityId::new(),
            super_admin,
            assignments
                .iter()
                .map(|(id, role)| LocationRoleAssignment::new(*id, *role)),
            Profile::default(),
        )
    }

    fn assign(location: &str, role: Role) -> PrivilegedAction {
        PrivilegedAction::AssignRole {
            location_id: LocationId::new(location),
            role,
        }
    }

    #[test]
    fn manager_can_add_staff_at_own_location_only() {
        let ctx = ctx_with(false, &[("a", Role::Manager), ("b", Role::Staff)]);

        assert!(authorize_action(&ctx, &assign("a", Role::Staff)).is_ok());
        assert_eq!(
            authorize_action(&ctx, &assign("a", Role::Manager)).unwrap_err(),
            AccessError::RoleNotAssignable {
                assigner: Role::Manager,
                target: Role::Manager
            }
        );
        assert!(matches!(
            authorize_action(&ctx, &assign("b", Role::Staff)),
            Err(AccessError::InsufficientPermission { required: Role::Manager, .. })
        ));
        assert!(matches!(
            authorize_action(&ctx, &assign("c", Role::Staff)),
            Err(AccessError::UnknownLocation(_))
        ));
    }

    #[test]
    fn super_admin_can_grant_anything_but_super_admin() {
        let ctx = ctx_with(true, &[]);
        assert!(authorize_action(&ctx, &assign("anywhere", Role::OrgAdmin)).is_ok());
        assert!(matches!(
            authorize_action(&ctx, &assign("anywhere", Role::SuperAdmin)),
            Err(AccessError::RoleNotAssignable { .. })
        ));
    }

    #[test]
    fn creating_locations_and_organizations() {
        let org_admin = ctx_with(false, &[("hq", Role::OrgAdmin)]);
        let location_admin = ctx_with(false, &[("a", Role::LocationAdmin)]);

        assert!(authorize_action(&org_admin, &PrivilegedAction::CreateLocation).is_ok());
        assert!(authorize_action(&location_admin, &PrivilegedAction::CreateLocation).is_err());
        assert!(authorize_action(&org_admin, &PrivilegedAction::CreateOrganization).is_err());
        assert!(
            authorize_action(&ctx_with(true, &[]), &PrivilegedAction::CreateOrganization).is_ok()
        );
    }
}
