use std::sync::Arc;

use outpost_access::{IdentityClaims, LocationSelection, PrivilegedAction, Role};
use outpost_cli::build_report;
use outpost_core::IdentityId;
use outpost_session::{ContextResolver, InMemoryDirectory, ResolverConfig, Session};

const FIXTURE: &str = include_str!("../../../demos/fixture.json");

const MANAGER: &str = "0192f3a0-0000-7000-8000-000000000001";
const ORG_ADMIN: &str = "0192f3a0-0000-7000-8000-000000000002";
const SUPER_ADMIN: &str = "0192f3a0-0000-7000-8000-000000000003";
const NEW_HIRE: &str = "0192f3a0-0000-7000-8000-000000000004";

struct Harness {
    resolver: ContextResolver<Arc<InMemoryDirectory>>,
    session: Session,
}

impl Harness {
    fn new() -> Self {
        let directory = InMemoryDirectory::from_json(FIXTURE).expect("fixture parses");
        Self {
            resolver: ContextResolver::new(Arc::new(directory), ResolverConfig::default()),
            session: Session::new(),
        }
    }

    async fn report(&self, identity: &str, hint: Option<&str>) -> outpost_cli::InspectReport {
        let id: IdentityId = identity.parse().unwrap();
        let ctx = self
            .session
            .resolve_with(&self.resolver, Some(&IdentityClaims::new(id)))
            .await
            .unwrap();
        build_report(&ctx, hint)
    }
}

#[tokio::test]
async fn manager_must_pick_a_location() {
    let harness = Harness::new();

    let report = harness.report(MANAGER, None).await;
    assert_eq!(report.selection, LocationSelection::Unselected);
    assert!(!report.mutation_gate.is_enabled());
    assert_eq!(report.switch_options.len(), 2);

    let report = harness.report(MANAGER, Some("outlet-harbor")).await;
    assert!(report.mutation_gate.is_enabled());
    assert_eq!(report.active_location.unwrap().role, Role::Staff);
    assert!(report.assignable_roles.is_empty());
}

#[tokio::test]
async fn org_admin_aggregate_view_blocks_mutations() {
    let harness = Harness::new();
    let report = harness.report(ORG_ADMIN, Some("all")).await;

    assert_eq!(report.selection, LocationSelection::All);
    assert_eq!(report.switch_options[0].label, "All Locations");
    assert_eq!(
        report.mutation_gate.reason.as_deref(),
        Some("Select a specific location to perform this action")
    );
    let create_location = report
        .actions
        .iter()
        .find(|c| c.action == PrivilegedAction::CreateLocation)
        .unwrap();
    assert!(create_location.allowed);
}

#[tokio::test]
async fn legacy_super_admin_assignment_grants_everything() {
    let harness = Harness::new();
    let report = harness.report(SUPER_ADMIN, None).await;

    assert_eq!(report.display_role, Role::SuperAdmin);
    assert_eq!(report.highest_role, Some(Role::SuperAdmin));
    assert!(report.role_checks.iter().all(|check| check.granted));
    assert!(report.actions.iter().all(|check| check.allowed));
}

#[tokio::test]
async fn identity_without_assignments_has_no_access() {
    let harness = Harness::new();
    let report = harness.report(NEW_HIRE, Some("outlet-downtown")).await;

    assert_eq!(report.selection, LocationSelection::NoAccess);
    assert_eq!(report.hint_accepted, Some(false));
    assert_eq!(
        report.mutation_gate.reason.as_deref(),
        Some("You have not been assigned to any locations")
    );
    assert_eq!(report.navigation, vec!["My Activity"]);
}
