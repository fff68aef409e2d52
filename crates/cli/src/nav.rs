use serde::Serialize;

use outpost_access::{AuthorizationContext, Guarded, Requirement, Role, visible};

/// A navigation entry gated by a minimum role.
#[derive(Debug, Clone, Serialize)]
pub struct NavSection {
    pub label: &'static str,
    pub href: &'static str,
    pub requirement: Requirement,
}

impl Guarded for NavSection {
    fn requirement(&self) -> &Requirement {
        &self.requirement
    }
}

pub fn sections() -> Vec<NavSection> {
    vec![
        NavSection {
            label: "Locations",
            href: "/locations",
            requirement: Requirement::min_role(Role::OrgAdmin),
        },
        NavSection {
            label: "Users",
            href: "/users",
            requirement: Requirement::min_role(Role::Manager),
        },
        NavSection {
            label: "My Activity",
            href: "/audit",
            requirement: Requirement::Authenticated,
        },
        NavSection {
            label: "Settings",
            href: "/settings",
            requirement: Requirement::SuperAdmin,
        },
        NavSection {
            label: "Organizations",
            href: "/organizations",
            requirement: Requirement::SuperAdmin,
        },
    ]
}

/// Labels of the sections `ctx` may see, in menu order.
pub fn visible_sections(ctx: &AuthorizationContext) -> Vec<&'static str> {
    visible(ctx, &sections()).into_iter().map(|s| s.label).collect()
}
