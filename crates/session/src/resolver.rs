//! Context resolution: authenticated identity → [`AuthorizationContext`].
//!
//! Fetching is delegated to an [`AccessDirectory`]; this module owns the
//! protocol around it: which failures are fatal, how super-admin status is
//! derived, and how raw rows become assignments.

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use outpost_access::{
    AuthorizationContext, FailureKind, IdentityClaims, LocationRoleAssignment, Profile, Role,
    SuperAdminSource,
};
use outpost_core::{IdentityId, LocationId};

use crate::config::{ResolutionMode, ResolverConfig};
use crate::directory::{AccessDirectory, AssignmentRow, DirectoryError, ProfileRow};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No (or an expired) identity. Callers redirect to sign-in.
    #[error("no authenticated identity")]
    AuthenticationMissing,

    /// The store was reachable but the profile row is absent or malformed. Not retried.
    #[error("profile resolution failed: {detail}")]
    ProfileResolutionFailed { detail: String },

    /// Transport failure while fetching assignments. Retryable by the caller.
    #[error("role assignment query failed: {detail}")]
    RoleAssignmentQueryFailed { detail: String },
}

impl ResolveError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ResolveError::AuthenticationMissing => FailureKind::AuthenticationMissing,
            ResolveError::ProfileResolutionFailed { .. } => FailureKind::ProfileResolutionFailed,
            ResolveError::RoleAssignmentQueryFailed { .. } => {
                FailureKind::RoleAssignmentQueryFailed
            }
        }
    }

    /// Text safe to show users; never includes backend detail.
    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ResolveError::RoleAssignmentQueryFailed { .. })
    }
}

pub struct ContextResolver<D> {
    directory: D,
    config: ResolverConfig,
}

impl<D: AccessDirectory> ContextResolver<D> {
    pub fn new(directory: D, config: ResolverConfig) -> Self {
        Self { directory, config }
    }

    /// Resolve the full context for an authenticated identity.
    ///
    /// Profile and assignments are fetched concurrently; the context only
    /// exists once both have arrived. When both fetches fail, the profile
    /// failure is reported.
    #[instrument(
        skip(self, identity),
        fields(identity_id = ?identity.map(|c| c.sub), mode = ?self.config.mode),
        err
    )]
    pub async fn resolve(
        &self,
        identity: Option<&IdentityClaims>,
    ) -> Result<AuthorizationContext, ResolveError> {
        let claims = identity.ok_or(ResolveError::AuthenticationMissing)?;
        if claims.is_expired(Utc::now()) {
            tracing::warn!("identity expired before resolution");
            return Err(ResolveError::AuthenticationMissing);
        }

        let identity_id = claims.sub;
        let (profile, assignments) = tokio::join!(
            self.directory.get_profile(identity_id),
            self.directory.get_assignments(identity_id),
        );

        let profile = self.profile_from(claims, profile)?;
        let rows = assignments.map_err(|e| ResolveError::RoleAssignmentQueryFailed {
            detail: e.to_string(),
        })?;
        let assignments = parse_assignments(identity_id, rows);

        let ctx = AuthorizationContext::new(
            identity_id,
            claims.super_admin.unwrap_or(false),
            assignments,
            profile,
        );
        report_super_admin_sources(claims, &ctx);

        tracing::info!(
            assignments = ctx.assignment_count(),
            super_admin = ?ctx.super_admin_source(),
            "authorization context resolved"
        );
        Ok(ctx)
    }

    fn profile_from(
        &self,
        claims: &IdentityClaims,
        fetched: Result<Option<ProfileRow>, DirectoryError>,
    ) -> Result<Profile, ResolveError> {
        let row = fetched.map_err(|e| ResolveError::ProfileResolutionFailed {
            detail: e.to_string(),
        })?;

        match (row, self.config.mode) {
            (Some(row), ResolutionMode::Strict) => strict_profile(row),
            (Some(row), ResolutionMode::Lenient) => Ok(lenient_profile(row, claims)),
            (None, ResolutionMode::Strict) => Err(ResolveError::ProfileResolutionFailed {
                detail: "profile row not found".to_string(),
            }),
            (None, ResolutionMode::Lenient) => {
                tracing::warn!("profile row missing; using identity provider fields");
                Ok(claims.fallback_profile())
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn strict_profile(row: ProfileRow) -> Result<Profile, ResolveError> {
    let email = non_blank(row.email).ok_or_else(|| ResolveError::ProfileResolutionFailed {
        detail: "profile row has no email".to_string(),
    })?;
    Ok(Profile {
        display_name: non_blank(row.full_name).unwrap_or_default(),
        email,
        avatar_ref: non_blank(row.avatar_url),
    })
}

fn lenient_profile(row: ProfileRow, claims: &IdentityClaims) -> Profile {
    let fallback = claims.fallback_profile();
    Profile {
        display_name: non_blank(row.full_name).unwrap_or(fallback.display_name),
        email: non_blank(row.email).unwrap_or(fallback.email),
        avatar_ref: non_blank(row.avatar_url).or(fallback.avatar_ref),
    }
}

/// Turn raw rows into assignments.
///
/// Rows with an unknown role or a blank location id are dropped: granting
/// nothing for a row we cannot read is the least-privilege reading.
fn parse_assignments(
    identity_id: IdentityId,
    rows: Vec<AssignmentRow>,
) -> Vec<LocationRoleAssignment> {
    rows.into_iter()
        .filter_map(|row| {
            let location_id = match LocationId::parse(&row.location_id) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(
                        identity_id = %identity_id,
                        error = %e,
                        "dropping assignment row"
                    );
                    return None;
                }
            };
            let role: Role = match row.role.parse() {
                Ok(role) => role,
                Err(e) => {
                    tracing::warn!(
                        identity_id = %identity_id,
                        location_id = %location_id,
                        error = %e,
                        "dropping assignment row"
                    );
                    return None;
                }
            };
            Some(
                LocationRoleAssignment::new(location_id, role)
                    .with_names(row.location_name, row.org_name),
            )
        })
        .collect()
}

/// Neither super-admin source takes precedence; note when they disagree.
fn report_super_admin_sources(claims: &IdentityClaims, ctx: &AuthorizationContext) {
    match (claims.super_admin, ctx.super_admin_source()) {
        (Some(false), SuperAdminSource::Assignment) => tracing::warn!(
            "identity provider denies super-admin but a super_admin assignment grants it"
        ),
        (None, SuperAdminSource::Assignment) | (Some(true), SuperAdminSource::Claim) => {
            tracing::debug!(
                source = ?ctx.super_admin_source(),
                "super-admin granted by a single source"
            )
        }
        _ => {}
    }
}
