use serde::Serialize;
use thiserror::Error;

use outpost_core::LocationId;

use crate::Role;

/// Failure kinds surfaced to callers.
///
/// UI-visible text is derived from the kind alone (see [`FailureKind::user_message`]),
/// never from transport or backend error strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    AuthenticationMissing,
    ProfileResolutionFailed,
    RoleAssignmentQueryFailed,
    InsufficientPermission,
    UnknownLocation,
    InvalidSelection,
    MutationsDisabled,
}

impl FailureKind {
    pub fn user_message(self) -> &'static str {
        match self {
            FailureKind::AuthenticationMissing => "Please sign in to continue.",
            FailureKind::ProfileResolutionFailed => {
                "Your account profile could not be loaded. Please contact your administrator."
            }
            FailureKind::RoleAssignmentQueryFailed => {
                "Your access could not be loaded right now. Please try again."
            }
            FailureKind::InsufficientPermission => "You do not have permission to do that.",
            FailureKind::UnknownLocation => "That location is not available to you.",
            FailureKind::InvalidSelection => "That selection is not available to you.",
            FailureKind::MutationsDisabled => "Select a specific location to perform this action.",
        }
    }
}

/// Authorization failure raised by enforcement points.
///
/// Evaluator queries never produce this for a plain "no"; only the `require_*`
/// / `enforce` / `check` style entry points convert a false answer into an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("insufficient permissions: requires {required}{}", for_location(.location))]
    InsufficientPermission {
        required: Role,
        location: Option<LocationId>,
    },

    #[error("role '{target}' cannot be granted by '{assigner}'")]
    RoleNotAssignable { assigner: Role, target: Role },

    #[error("unknown location '{0}'")]
    UnknownLocation(LocationId),

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("mutations disabled: {0}")]
    MutationsDisabled(String),
}

impl AccessError {
    pub fn insufficient(required: Role, location: Option<&LocationId>) -> Self {
        Self::InsufficientPermission {
            required,
            location: location.cloned(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            AccessError::InsufficientPermission { .. } | AccessError::RoleNotAssignable { .. } => {
                FailureKind::InsufficientPermission
            }
            AccessError::UnknownLocation(_) => FailureKind::UnknownLocation,
            AccessError::InvalidSelection(_) => FailureKind::InvalidSelection,
            AccessError::MutationsDisabled(_) => FailureKind::MutationsDisabled,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}

fn for_location(location: &Option<LocationId>) -> String {
    match location {
        Some(id) => format!(" for location {id}"),
        None => String::new(),
    }
}
