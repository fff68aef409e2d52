//! `outpost-access`: pure role-based authorization over per-location assignments.
//!
//! This crate is intentionally decoupled from transport and storage: every
//! decision is a function of an [`AuthorizationContext`] snapshot.

pub mod authorize;
pub mod claims;
pub mod context;
pub mod error;
pub mod evaluate;
pub mod explain;
pub mod gate;
pub mod guard;
pub mod roles;
pub mod selection;

pub use authorize::{ActionAuthorization, PrivilegedAction, authorize, authorize_action};
pub use claims::{IdentityClaims, IdentityMetadata};
pub use context::{AuthorizationContext, LocationRoleAssignment, Profile, SuperAdminSource};
pub use error::{AccessError, FailureKind};
pub use evaluate::{
    assignable_roles, can_access_location, can_assign_role, get_highest_role, has_role,
    highest_assignment, require_role,
};
pub use explain::{RoleCheckExplanation, explain_role_check};
pub use gate::{MutationGate, compute_mutation_gate};
pub use guard::{Guarded, Requirement, visible};
pub use roles::Role;
pub use selection::{
    ALL_LOCATIONS, ActiveLocation, LocationSelection, SwitchOption, active_location,
    compute_selection, request_switch, selectable_locations,
};
