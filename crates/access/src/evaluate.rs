//! Permission evaluator.
//!
//! - No IO
//! - No panics
//! - Deterministic over an [`AuthorizationContext`] snapshot
//!
//! A `false` answer is a normal result. Only [`require_role`] turns it into an error.

use outpost_core::LocationId;

use crate::{AccessError, AuthorizationContext, LocationRoleAssignment, Role};

/// Does the identity hold at least `required`?
///
/// With a `location`, the check is scoped to the assignment at that location;
/// an unknown location is simply `false`. Without one, any assignment that
/// meets the requirement is enough ("can this identity do X somewhere").
/// Super-admins always pass.
pub fn has_role(ctx: &AuthorizationContext, required: Role, location: Option<&LocationId>) -> bool {
    if ctx.is_super_admin() {
        return true;
    }

    match location {
        Some(location_id) => ctx
            .assignment(location_id)
            .is_some_and(|a| a.role.satisfies(required)),
        None => ctx.assignments().any(|a| a.role.satisfies(required)),
    }
}

/// Visibility, not capability: any assignment at the location grants access.
pub fn can_access_location(ctx: &AuthorizationContext, location_id: &LocationId) -> bool {
    ctx.is_super_admin() || ctx.assignment(location_id).is_some()
}

/// May a holder of `assigner` grant `target` to someone else?
///
/// The assigner must rank strictly above the target, and super-admin is never
/// grantable through this path.
pub fn can_assign_role(assigner: Role, target: Role) -> bool {
    if target == Role::TOP {
        return false;
    }
    assigner.rank() > target.rank()
}

/// Every role `assigner` may grant, least privileged first.
pub fn assignable_roles(assigner: Role) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|target| can_assign_role(assigner, *target))
        .collect()
}

pub fn get_highest_role(ctx: &AuthorizationContext) -> Option<Role> {
    if ctx.is_super_admin() {
        return Some(Role::TOP);
    }
    highest_assignment(ctx).map(|a| a.role)
}

/// The assignment backing [`get_highest_role`].
///
/// Ties at the maximum rank resolve to the lowest location id.
pub fn highest_assignment(ctx: &AuthorizationContext) -> Option<&LocationRoleAssignment> {
    ctx.assignments().fold(None, |best, current| match best {
        Some(best) if best.role >= current.role => Some(best),
        _ => Some(current),
    })
}

/// Hard-stop variant of [`has_role`].
pub fn require_role(
    ctx: &AuthorizationContext,
    required: Role,
    location: Option<&LocationId>,
) -> Result<(), AccessError> {
    if has_role(ctx, required, location) {
        return Ok(());
    }

    tracing::debug!(
        identity_id = %ctx.identity_id(),
        required = %required,
        location_id = location.map(LocationId::as_str),
        "role requirement not met"
    );
    Err(AccessError::insufficient(required, location))
}
