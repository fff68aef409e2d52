use serde::Serialize;

use outpost_access::{
    ActiveLocation, AuthorizationContext, LocationRoleAssignment, LocationSelection, MutationGate,
    PrivilegedAction, Role, RoleCheckExplanation, SuperAdminSource, SwitchOption, active_location,
    assignable_roles, authorize_action, compute_mutation_gate, compute_selection,
    explain_role_check, get_highest_role, request_switch, selectable_locations,
};
use outpost_core::IdentityId;

use crate::nav::visible_sections;

#[derive(Debug, Clone, Serialize)]
pub struct ActionCheck {
    pub action: PrivilegedAction,
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

/// Everything the inspect tool prints for one identity.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub identity_id: IdentityId,
    pub display_name: String,
    pub email: String,
    pub super_admin: SuperAdminSource,
    pub display_role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_role: Option<Role>,
    pub assignments: Vec<LocationRoleAssignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_hint: Option<String>,
    /// Whether a switch to the requested hint would be accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint_accepted: Option<bool>,
    pub selection: LocationSelection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_location: Option<ActiveLocation>,
    pub mutation_gate: MutationGate,
    pub switch_options: Vec<SwitchOption>,
    pub assignable_roles: Vec<Role>,
    pub navigation: Vec<&'static str>,
    pub actions: Vec<ActionCheck>,
    pub role_checks: Vec<RoleCheckExplanation>,
}

pub fn build_report(ctx: &AuthorizationContext, hint: Option<&str>) -> InspectReport {
    let selection = compute_selection(hint, ctx);
    let mutation_gate = compute_mutation_gate(&selection);
    let acting_role = if ctx.is_super_admin() {
        Some(Role::TOP)
    } else {
        selection
            .location_id()
            .and_then(|id| ctx.assignment(id))
            .map(|a| a.role)
    };

    InspectReport {
        identity_id: ctx.identity_id(),
        display_name: ctx.profile().display_name.clone(),
        email: ctx.profile().email.clone(),
        super_admin: ctx.super_admin_source(),
        display_role: ctx.display_role(),
        highest_role: get_highest_role(ctx),
        assignments: ctx.assignments().cloned().collect(),
        requested_hint: hint.map(str::to_string),
        hint_accepted: hint.map(|h| request_switch(h, ctx).is_ok()),
        active_location: active_location(ctx, &selection),
        mutation_gate,
        switch_options: selectable_locations(ctx),
        assignable_roles: acting_role.map(assignable_roles).unwrap_or_default(),
        navigation: visible_sections(ctx),
        actions: action_checks(ctx, &selection),
        role_checks: Role::ALL
            .into_iter()
            .map(|role| explain_role_check(ctx, role, selection.location_id()))
            .collect(),
        selection,
    }
}

fn action_checks(ctx: &AuthorizationContext, selection: &LocationSelection) -> Vec<ActionCheck> {
    let mut actions = vec![PrivilegedAction::CreateLocation, PrivilegedAction::CreateOrganization];
    if let Some(location_id) = selection.location_id() {
        actions.extend([Role::Staff, Role::Manager].map(|role| PrivilegedAction::AssignRole {
            location_id: location_id.clone(),
            role,
        }));
    }

    actions
        .into_iter()
        .map(|action| {
            let result = authorize_action(ctx, &action);
            ActionCheck {
                allowed: result.is_ok(),
                reason: result.err().map(|e| e.user_message()),
                action,
            }
        })
        .collect()
}
