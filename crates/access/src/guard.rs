//! Minimum-role requirements for page guards and navigation entries.
//!
//! Filtering navigation is advisory; page guards call [`Requirement::enforce`]
//! before rendering anything location- or role-scoped.

use serde::Serialize;

use outpost_core::LocationId;

use crate::evaluate::{can_access_location, require_role};
use crate::{AccessError, AuthorizationContext, Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    /// Any resolved identity.
    Authenticated,
    /// The role held at any location.
    MinRole { role: Role },
    /// The role held at a specific location.
    MinRoleAt { role: Role, location_id: LocationId },
    /// Any assignment at the location.
    LocationAccess { location_id: LocationId },
    SuperAdmin,
}

impl Requirement {
    pub fn min_role(role: Role) -> Self {
        Self::MinRole { role }
    }

    pub fn min_role_at(role: Role, location_id: impl Into<LocationId>) -> Self {
        Self::MinRoleAt {
            role,
            location_id: location_id.into(),
        }
    }

    pub fn location_access(location_id: impl Into<LocationId>) -> Self {
        Self::LocationAccess {
            location_id: location_id.into(),
        }
    }

    pub fn is_met(&self, ctx: &AuthorizationContext) -> bool {
        self.enforce(ctx).is_ok()
    }

    pub fn enforce(&self, ctx: &AuthorizationContext) -> Result<(), AccessError> {
        match self {
            Requirement::Authenticated => Ok(()),
            Requirement::MinRole { role } => require_role(ctx, *role, None),
            Requirement::MinRoleAt { role, location_id } => {
                // Visibility first: an inaccessible location reads as unknown.
                if !can_access_location(ctx, location_id) {
                    return Err(AccessError::UnknownLocation(location_id.clone()));
                }
                require_role(ctx, *role, Some(location_id))
            }
            Requirement::LocationAccess { location_id } => {
                if can_access_location(ctx, location_id) {
                    Ok(())
                } else {
                    Err(AccessError::UnknownLocation(location_id.clone()))
                }
            }
            Requirement::SuperAdmin => {
                if ctx.is_super_admin() {
                    Ok(())
                } else {
                    Err(AccessError::insufficient(Role::TOP, None))
                }
            }
        }
    }
}

/// Anything gated by a [`Requirement`] (navigation entries, tabs, page routes).
pub trait Guarded {
    fn requirement(&self) -> &Requirement;
}

impl Guarded for Requirement {
    fn requirement(&self) -> &Requirement {
        self
    }
}

/// Items whose requirement the identity meets, in input order.
pub fn visible<'a, T: Guarded>(ctx: &AuthorizationContext, items: &'a [T]) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| item.requirement().is_met(ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpost_core::IdentityId;

    use crate::{LocationRoleAssignment, Profile};

    struct NavItem {
        label: &'static str,
        requirement: Requirement,
    }

    impl Guarded for NavItem {
        fn requirement(&self) -> &Requirement {
            &self.requirement
        }
    }

    fn nav() -> Vec<NavItem> {
        vec![
            NavItem { label: "Locations", requirement: Requirement::min_role(Role::OrgAdmin) },
            NavItem { label: "Users", requirement: Requirement::min_role(Role::Manager) },
            NavItem { label: "My Activity", requirement: Requirement::Authenticated },
            NavItem { label: "Settings", requirement: Requirement::SuperAdmin },
        ]
    }

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

    fn labels(ctx: &AuthorizationContext) -> Vec<&'static str> {
        let items = nav();
        visible(ctx, &items).into_iter().map(|i| i.label).collect()
    }

    #[test]
    fn navigation_filters_by_role() {
        assert_eq!(labels(&ctx_with(false, &[("a", Role::Staff)])), vec!["My Activity"]);
        assert_eq!(
            labels(&ctx_with(false, &[("a", Role::Manager)])),
            vec!["Users", "My Activity"]
        );
        assert_eq!(
            labels(&ctx_with(false, &[("a", Role::OrgAdmin)])),
            vec!["Locations", "Users", "My Activity"]
        );
        assert_eq!(labels(&ctx_with(true, &[])).len(), 4);
    }

    #[test]
    fn location_page_guard_checks_visibility_before_role() {
        let ctx = ctx_with(false, &[("a", Role::Staff)]);

        let err = Requirement::min_role_at(Role::LocationAdmin, "b").enforce(&ctx).unwrap_err();
        assert_eq!(err, AccessError::UnknownLocation(LocationId::new("b")));

        let err = Requirement::min_role_at(Role::LocationAdmin, "a").enforce(&ctx).unwrap_err();
        assert!(matches!(
            err,
            AccessError::InsufficientPermission { required: Role::LocationAdmin, .. }
        ));

        assert!(Requirement::location_access("a").is_met(&ctx));
    }

    #[test]
    fn super_admin_requirement_reports_top_role() {
        let err = Requirement::SuperAdmin
            .enforce(&ctx_with(false, &[("a", Role::OrgAdmin)]))
            .unwrap_err();
        assert_eq!(err, AccessError::insufficient(Role::SuperAdmin, None));
    }
}
