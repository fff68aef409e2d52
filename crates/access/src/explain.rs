// ─────────────────────────────────────────────────────────────────────────────
// Role Check Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

use serde::Serialize;

use outpost_core::{IdentityId, LocationId};

use crate::evaluate::{get_highest_role, has_role};
use crate::{AuthorizationContext, LocationRoleAssignment, Role, SuperAdminSource};

/// Detailed explanation of a role check.
///
/// Answers "why was this allowed/denied?" without changing the decision:
/// `granted` always equals [`has_role`] for the same inputs.
#[derive(Debug, Clone, Serialize)]
pub struct RoleCheckExplanation {
    pub required_role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
    pub granted: bool,
    /// Human-readable reason for the decision.
    pub reason: String,
    pub identity: IdentityState,
    /// If denied, this explains what was missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denial_reason: Option<DenialReason>,
}

/// Snapshot of the identity's privileges at decision time.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityState {
    pub identity_id: IdentityId,
    pub super_admin: SuperAdminSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_role: Option<Role>,
    pub assignments: Vec<LocationRoleAssignment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    NoAssignments,
    NoAssignmentAtLocation,
    RankTooLow,
}

pub fn explain_role_check(
    ctx: &AuthorizationContext,
    required: Role,
    location: Option<&LocationId>,
) -> RoleCheckExplanation {
    let identity = IdentityState {
        identity_id: ctx.identity_id(),
        super_admin: ctx.super_admin_source(),
        highest_role: get_highest_role(ctx),
        assignments: ctx.assignments().cloned().collect(),
    };
    let granted = has_role(ctx, required, location);

    let (reason, denial_reason) = if granted {
        (grant_reason(ctx, required, location), None)
    } else {
        let denial = denial(ctx, required, location);
        (denial.message.clone(), Some(denial))
    };

    RoleCheckExplanation {
        required_role: required,
        location_id: location.cloned(),
        granted,
        reason,
        identity,
        denial_reason,
    }
}

fn grant_reason(
    ctx: &AuthorizationContext,
    required: Role,
    location: Option<&LocationId>,
) -> String {
    if ctx.is_super_admin() {
        let source = match ctx.super_admin_source() {
            SuperAdminSource::Claim => "identity provider flag",
            SuperAdminSource::Assignment => "super_admin assignment",
            _ => "identity provider flag and super_admin assignment",
        };
        return format!("Super-admin ({source}) bypasses role checks");
    }

    match location {
        Some(location_id) => {
            let held = ctx.assignment(location_id).map(|a| a.role).unwrap_or(required);
            format!("Holds '{held}' at location {location_id}, which meets '{required}'")
        }
        None => match ctx.assignments().find(|a| a.role.satisfies(required)) {
            Some(a) => format!(
                "Holds '{}' at location {}, which meets '{required}'",
                a.role, a.location_id
            ),
            None => format!("Meets '{required}'"),
        },
    }
}

fn denial(
    ctx: &AuthorizationContext,
    required: Role,
    location: Option<&LocationId>,
) -> DenialReason {
    if ctx.assignment_count() == 0 {
        return DenialReason {
            kind: DenialKind::NoAssignments,
            message: "Identity holds no location assignments".to_string(),
            suggestions: vec![format!(
                "Ask an administrator to assign a '{required}' role at a location"
            )],
        };
    }

    match location.map(|id| (id, ctx.assignment(id))) {
        Some((location_id, None)) => DenialReason {
            kind: DenialKind::NoAssignmentAtLocation,
            message: format!("No assignment at location {location_id}"),
            suggestions: vec![
                format!("Assign a '{required}' role at location {location_id}"),
                "Switch to a location you are assigned to".to_string(),
            ],
        },
        Some((location_id, Some(held))) => DenialReason {
            kind: DenialKind::RankTooLow,
            message: format!(
                "Holds '{}' at location {location_id}, below required '{required}'",
                held.role
            ),
            suggestions: vec![format!(
                "Assign a role of at least '{required}' at location {location_id}"
            )],
        },
        None => {
            let mut suggestions = vec![format!(
                "Assign a role of at least '{required}' at any location"
            )];
            if let Some(highest) = get_highest_role(ctx) {
                suggestions.push(format!("Highest role currently held is '{highest}'"));
            }
            DenialReason {
                kind: DenialKind::RankTooLow,
                message: format!("No assignment meets required '{required}'"),
                suggestions,
            }
        }
    }
}
