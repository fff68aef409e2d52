//! Read contract of the external data service, plus an in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use outpost_core::IdentityId;

/// Profile row as stored by the data service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Location-role assignment row, with denormalized location/organization names.
///
/// The role is kept as the raw stored string; the resolver parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub location_id: String,
    pub role: String,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub org_name: Option<String>,
}

impl AssignmentRow {
    pub fn new(location_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            role: role.into(),
            location_name: None,
            org_name: None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Transport or availability failure.
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of identities and their assignments.
///
/// Row-level visibility is enforced by the service itself; implementations
/// return whatever the service lets the caller see.
#[async_trait::async_trait]
pub trait AccessDirectory: Send + Sync {
    /// `Ok(None)` when no profile row exists.
    async fn get_profile(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<ProfileRow>, DirectoryError>;

    async fn get_assignments(
        &self,
        identity_id: IdentityId,
    ) -> Result<Vec<AssignmentRow>, DirectoryError>;
}

#[async_trait::async_trait]
impl<D> AccessDirectory for Arc<D>
where
    D: AccessDirectory + ?Sized,
{
    async fn get_profile(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<ProfileRow>, DirectoryError> {
        (**self).get_profile(identity_id).await
    }

    async fn get_assignments(
        &self,
        identity_id: IdentityId,
    ) -> Result<Vec<AssignmentRow>, DirectoryError> {
        (**self).get_assignments(identity_id).await
    }
}

/// One identity's rows in a directory fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureIdentity {
    pub id: IdentityId,
    #[serde(default)]
    pub profile: Option<ProfileRow>,
    #[serde(default)]
    pub assignments: Vec<AssignmentRow>,
}

/// Serialized directory contents, for dev fixtures and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryFixture {
    pub identities: Vec<FixtureIdentity>,
}

/// In-memory directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    profiles: RwLock<HashMap<IdentityId, ProfileRow>>,
    assignments: RwLock<HashMap<IdentityId, Vec<AssignmentRow>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: DirectoryFixture) -> Self {
        let directory = Self::new();
        for identity in fixture.identities {
            if let Some(profile) = identity.profile {
                directory.upsert_profile(identity.id, profile);
            }
            for row in identity.assignments {
                directory.add_assignment(identity.id, row);
            }
        }
        directory
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let fixture: DirectoryFixture = serde_json::from_str(json)?;
        Ok(Self::from_fixture(fixture))
    }

    pub fn upsert_profile(&self, identity_id: IdentityId, profile: ProfileRow) {
        if let Ok(mut map) = self.profiles.write() {
            map.insert(identity_id, profile);
        }
    }

    pub fn add_assignment(&self, identity_id: IdentityId, row: AssignmentRow) {
        if let Ok(mut map) = self.assignments.write() {
            map.entry(identity_id).or_default().push(row);
        }
    }
}

#[async_trait::async_trait]
impl AccessDirectory for InMemoryDirectory {
    async fn get_profile(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<ProfileRow>, DirectoryError> {
        let map = self
            .profiles
            .read()
            .map_err(|_| DirectoryError::Unavailable("profile store lock poisoned".to_string()))?;
        Ok(map.get(&identity_id).cloned())
    }

    async fn get_assignments(
        &self,
        identity_id: IdentityId,
    ) -> Result<Vec<AssignmentRow>, DirectoryError> {
        let map = self
            .assignments
            .read()
            .map_err(|_| {
                DirectoryError::Unavailable("assignment store lock poisoned".to_string())
            })?;
        Ok(map.get(&identity_id).cloned().unwrap_or_default())
    }
}
