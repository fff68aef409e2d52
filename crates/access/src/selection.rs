//! Location selection state machine.
//!
//! The selection is never ground truth. It is recomputed from an external hint
//! (a query value, or whatever the client last chose) and the current context
//! every time either changes. This module only computes; persisting the hint
//! is the caller's job.

use serde::Serialize;

use outpost_core::LocationId;

use crate::evaluate::{can_access_location, has_role};
use crate::{AccessError, AuthorizationContext, Role};

/// Hint value selecting the aggregate "all locations" view.
pub const ALL_LOCATIONS: &str = "all";

/// Minimum role (held anywhere) for the aggregate view.
pub const AGGREGATE_VIEW_ROLE: Role = Role::OrgAdmin;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "location_id", rename_all = "snake_case")]
pub enum LocationSelection {
    /// Several locations are available and none was validly chosen.
    /// Callers must force an explicit choice before proceeding.
    Unselected,
    Single(LocationId),
    /// Aggregate view across every visible location.
    All,
    /// No assignments and no super-admin status. A presentational dead end.
    NoAccess,
}

impl LocationSelection {
    pub fn location_id(&self) -> Option<&LocationId> {
        match self {
            LocationSelection::Single(id) => Some(id),
            _ => None,
        }
    }

    /// Hint value that reproduces this selection, if any.
    pub fn to_hint(&self) -> Option<String> {
        match self {
            LocationSelection::Single(id) => Some(id.as_str().to_string()),
            LocationSelection::All => Some(ALL_LOCATIONS.to_string()),
            LocationSelection::Unselected | LocationSelection::NoAccess => None,
        }
    }
}

/// Can this identity enter the aggregate view?
pub fn can_view_all(ctx: &AuthorizationContext) -> bool {
    has_role(ctx, AGGREGATE_VIEW_ROLE, None)
}

pub fn compute_selection(hint: Option<&str>, ctx: &AuthorizationContext) -> LocationSelection {
    let hint = hint.map(str::trim).filter(|h| !h.is_empty());

    if let Some(hint) = hint {
        if hint == ALL_LOCATIONS {
            if can_view_all(ctx) {
                return LocationSelection::All;
            }
        } else {
            let candidate = LocationId::new(hint);
            if can_access_location(ctx, &candidate) {
                return LocationSelection::Single(candidate);
            }
        }
        tracing::debug!(identity_id = %ctx.identity_id(), hint, "ignoring unusable selection hint");
    }

    let mut assignments = ctx.assignments();
    match assignments.len() {
        0 if ctx.is_super_admin() => LocationSelection::All,
        0 => LocationSelection::NoAccess,
        1 => match assignments.next() {
            Some(only) => LocationSelection::Single(only.location_id.clone()),
            None => LocationSelection::NoAccess,
        },
        _ => LocationSelection::Unselected,
    }
}

/// Validate a switch target and return the hint the caller should persist.
///
/// A rejected switch leaves the prior selection in place.
pub fn request_switch(candidate: &str, ctx: &AuthorizationContext) -> Result<String, AccessError> {
    let candidate = candidate.trim();

    if candidate.is_empty() {
        return Err(AccessError::InvalidSelection("empty location".to_string()));
    }

    if candidate == ALL_LOCATIONS {
        if can_view_all(ctx) {
            return Ok(ALL_LOCATIONS.to_string());
        }
        return Err(AccessError::InvalidSelection(format!(
            "aggregate view requires {AGGREGATE_VIEW_ROLE}"
        )));
    }

    let location_id = LocationId::new(candidate);
    if !can_access_location(ctx, &location_id) {
        return Err(AccessError::UnknownLocation(location_id));
    }
    Ok(location_id.as_str().to_string())
}

/// Scoped view of a single selected location, for location-scoped queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveLocation {
    pub identity_id: outpost_core::IdentityId,
    pub location_id: LocationId,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
}

/// Resolve the active location for a `Single` selection.
///
/// Super-admins may select a location they hold no assignment at; they act
/// there as super-admin.
pub fn active_location(
    ctx: &AuthorizationContext,
    selection: &LocationSelection,
) -> Option<ActiveLocation> {
    let location_id = selection.location_id()?;

    match ctx.assignment(location_id) {
        Some(assignment) => Some(ActiveLocation {
            identity_id: ctx.identity_id(),
            location_id: location_id.clone(),
            role: if ctx.is_super_admin() { Role::TOP } else { assignment.role },
            location_name: assignment.location_name.clone(),
            org_name: assignment.org_name.clone(),
        }),
        None if ctx.is_super_admin() => Some(ActiveLocation {
            identity_id: ctx.identity_id(),
            location_id: location_id.clone(),
            role: Role::TOP,
            location_name: None,
            org_name: None,
        }),
        None => None,
    }
}

/// An entry in a location switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchOption {
    pub hint: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Switcher entries: the aggregate view first (when allowed), then each assignment.
pub fn selectable_locations(ctx: &AuthorizationContext) -> Vec<SwitchOption> {
    let mut options = Vec::with_capacity(ctx.assignment_count() + 1);

    if can_view_all(ctx) {
        options.push(SwitchOption {
            hint: ALL_LOCATIONS.to_string(),
            label: "All Locations".to_string(),
            role: None,
        });
    }

    options.extend(ctx.assignments().map(|a| SwitchOption {
        hint: a.location_id.as_str().to_string(),
        label: a
            .location_name
            .clone()
            .unwrap_or_else(|| a.location_id.as_str().to_string()),
        role: Some(a.role),
    }));

    options
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

    #[test]
    fn all_hint_requires_org_admin() {
        let org_admin = ctx_with(false, &[("a", Role::OrgAdmin), ("b", Role::Staff)]);
        assert_eq!(compute_selection(Some("all"), &org_admin), LocationSelection::All);

        let staff_multi = ctx_with(false, &[("a", Role::Staff), ("b", Role::Staff)]);
        assert_eq!(compute_selection(Some("all"), &staff_multi), LocationSelection::Unselected);

        let staff_single = ctx_with(false, &[("a", Role::Staff)]);
        assert_eq!(
            compute_selection(Some("all"), &staff_single),
            LocationSelection::Single(LocationId::new("a"))
        );
    }

    #[test]
    fn valid_concrete_hint_is_selected() {
        let ctx = ctx_with(false, &[("a", Role::Staff), ("b", Role::Manager)]);
        assert_eq!(
            compute_selection(Some("b"), &ctx),
            LocationSelection::Single(LocationId::new("b"))
        );
    }

    #[test]
    fn stale_hint_falls_back() {
        let multi = ctx_with(false, &[("a", Role::Staff), ("b", Role::Manager)]);
        assert_eq!(compute_selection(Some("gone"), &multi), LocationSelection::Unselected);

        let single = ctx_with(false, &[("a", Role::Staff)]);
        assert_eq!(
            compute_selection(Some("gone"), &single),
            LocationSelection::Single(LocationId::new("a"))
        );
    }

    #[test]
    fn single_assignment_auto_selects_without_hint() {
        let ctx = ctx_with(false, &[("only", Role::Staff)]);
        assert_eq!(
            compute_selection(None, &ctx),
            LocationSelection::Single(LocationId::new("only"))
        );
        assert_eq!(
            compute_selection(Some("  "), &ctx),
            LocationSelection::Single(LocationId::new("only"))
        );
    }

    #[test]
    fn zero_assignments() {
        assert_eq!(compute_selection(None, &ctx_with(true, &[])), LocationSelection::All);
        assert_eq!(compute_selection(None, &ctx_with(false, &[])), LocationSelection::NoAccess);
        assert_eq!(
            compute_selection(Some("all"), &ctx_with(false, &[])),
            LocationSelection::NoAccess
        );
    }

    #[test]
    fn super_admin_may_select_unassigned_location() {
        let ctx = ctx_with(true, &[]);
        let selection = compute_selection(Some("anywhere"), &ctx);
        assert_eq!(selection, LocationSelection::Single(LocationId::new("anywhere")));

        let active = active_location(&ctx, &selection).unwrap();
        assert_eq!(active.role, Role::SuperAdmin);
    }

    #[test]
    fn switch_validation() {
        let ctx = ctx_with(false, &[("a", Role::Manager), ("b", Role::Staff)]);

        assert_eq!(request_switch("b", &ctx).unwrap(), "b");
        assert_eq!(
            request_switch("zzz", &ctx).unwrap_err(),
            AccessError::UnknownLocation(LocationId::new("zzz"))
        );
        assert!(matches!(request_switch("all", &ctx), Err(AccessError::InvalidSelection(_))));
        assert!(matches!(request_switch(" ", &ctx), Err(AccessError::InvalidSelection(_))));

        let org_admin = ctx_with(false, &[("a", Role::OrgAdmin)]);
        assert_eq!(request_switch("all", &org_admin).unwrap(), ALL_LOCATIONS);
    }

    #[test]
    fn accepted_switch_round_trips_through_selection() {
        let ctx = ctx_with(false, &[("a", Role::OrgAdmin), ("b", Role::Staff)]);
        for candidate in ["a", "b", "all"] {
            let hint = request_switch(candidate, &ctx).unwrap();
            let selection = compute_selection(Some(&hint), &ctx);
            assert_eq!(selection.to_hint().as_deref(), Some(candidate));
        }
    }

    #[test]
    fn active_location_carries_assignment_details() {
        let ctx = AuthorizationContext::new(
            IdentityId::new(),
            false,
            vec![LocationRoleAssignment::new("a", Role::Manager)
                .with_names(Some("Downtown".to_string()), Some("Acme".to_string()))],
            Profile::default(),
        );
        let selection = compute_selection(None, &ctx);
        let active = active_location(&ctx, &selection).unwrap();
        assert_eq!(active.role, Role::Manager);
        assert_eq!(active.location_name.as_deref(), Some("Downtown"));
        assert_eq!(active.org_name.as_deref(), Some("Acme"));

        assert!(active_location(&ctx, &LocationSelection::All).is_none());
    }

    #[test]
    fn switch_options_put_aggregate_first() {
        let ctx = ctx_with(false, &[("b", Role::Staff), ("a", Role::OrgAdmin)]);
        let hints: Vec<String> = selectable_locations(&ctx).into_iter().map(|o| o.hint).collect();
        assert_eq!(hints, vec!["all", "a", "b"]);

        let staff = ctx_with(false, &[("a", Role::Staff)]);
        assert_eq!(selectable_locations(&staff).len(), 1);
    }

    #[test]
    fn selection_serializes_with_state_tag() {
        let json = serde_json::to_value(LocationSelection::Single(LocationId::new("a"))).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "single", "location_id": "a" }));
        let json = serde_json::to_value(LocationSelection::All).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "all" }));
    }
}
