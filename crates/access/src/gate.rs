//! Mutation gating: may writes be attempted under the current selection?
//!
//! The gate is a pure function of [`LocationSelection`]. Derive it again after
//! every selection change; never cache it across a transition.

use serde::Serialize;

use crate::{AccessError, LocationSelection};

pub const REASON_AGGREGATE: &str = "Select a specific location to perform this action";
pub const REASON_UNSELECTED: &str = "No location selected";
pub const REASON_NO_ACCESS: &str = "You have not been assigned to any locations";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationGate {
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MutationGate {
    pub fn enabled() -> Self {
        Self {
            disabled: false,
            reason: None,
        }
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            disabled: true,
            reason: Some(reason.into()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Convert a closed gate into an error for callers that must hard-stop.
    pub fn check(&self) -> Result<(), AccessError> {
        if !self.disabled {
            return Ok(());
        }
        let reason = self.reason.as_deref().unwrap_or(REASON_UNSELECTED);
        Err(AccessError::MutationsDisabled(reason.to_string()))
    }
}

pub fn compute_mutation_gate(selection: &LocationSelection) -> MutationGate {
    match selection {
        LocationSelection::Single(_) => MutationGate::enabled(),
        LocationSelection::All => MutationGate::disabled(REASON_AGGREGATE),
        LocationSelection::Unselected => MutationGate::disabled(REASON_UNSELECTED),
        LocationSelection::NoAccess => MutationGate::disabled(REASON_NO_ACCESS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpost_core::LocationId;

    #[test]
    fn aggregate_view_blocks_writes_with_reason() {
        let gate = compute_mutation_gate(&LocationSelection::All);
        assert!(gate.disabled);
        assert!(!gate.reason.as_deref().unwrap_or_default().is_empty());
        assert!(matches!(gate.check(), Err(AccessError::MutationsDisabled(_))));
    }

    #[test]
    fn single_location_allows_writes() {
        let gate = compute_mutation_gate(&LocationSelection::Single(LocationId::new("a")));
        assert!(gate.is_enabled());
        assert_eq!(gate.reason, None);
        assert!(gate.check().is_ok());
    }

    #[test]
    fn unresolved_states_block_writes() {
        let unselected = compute_mutation_gate(&LocationSelection::Unselected);
        assert_eq!(unselected.reason.as_deref(), Some(REASON_UNSELECTED));

        let no_access = compute_mutation_gate(&LocationSelection::NoAccess);
        assert!(no_access.disabled);
        assert_eq!(no_access.reason.as_deref(), Some(REASON_NO_ACCESS));
    }
}
