use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use outpost_core::IdentityId;

use crate::Profile;

/// Authenticated identity handle, as supplied by the identity provider.
///
/// This is the minimal set of claims the resolver expects once a session has
/// been established by whatever identity layer is in use. Token issuance,
/// signature checks and renewal happen upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject / identity identifier.
    pub sub: IdentityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Display metadata the provider keeps alongside the identity.
    #[serde(default)]
    pub metadata: IdentityMetadata,

    /// Explicit super-admin flag, when the provider supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_admin: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Name shown when neither the profile row nor the provider has one.
pub const UNKNOWN_DISPLAY_NAME: &str = "Unknown User";

impl IdentityClaims {
    pub fn new(sub: IdentityId) -> Self {
        Self {
            sub,
            email: None,
            metadata: IdentityMetadata::default(),
            super_admin: None,
            expires_at: None,
        }
    }

    /// An identity without an expiry never expires at this layer.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Profile built from provider-supplied fields only.
    ///
    /// Used as a fallback when the profile row is missing and the caller opted
    /// into lenient resolution.
    pub fn fallback_profile(&self) -> Profile {
        Profile {
            display_name: self
                .metadata
                .full_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_DISPLAY_NAME.to_string()),
            email: self.email.clone().unwrap_or_default(),
            avatar_ref: self.metadata.avatar_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn expiry_is_inclusive() {
        let now = Utc::now();
        let mut claims = IdentityClaims::new(IdentityId::new());
        assert!(!claims.is_expired(now));

        claims.expires_at = Some(now);
        assert!(claims.is_expired(now));
        assert!(!claims.is_expired(now - Duration::seconds(1)));
    }

    #[test]
    fn fallback_profile_uses_provider_fields() {
        let mut claims = IdentityClaims::new(IdentityId::new());
        assert_eq!(claims.fallback_profile().display_name, UNKNOWN_DISPLAY_NAME);

        claims.email = Some("ada@example.com".to_string());
        claims.metadata.full_name = Some("Ada".to_string());
        claims.metadata.avatar_url = Some("avatars/ada.png".to_string());

        let profile = claims.fallback_profile();
        assert_eq!(profile.display_name, "Ada");
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.avatar_ref.as_deref(), Some("avatars/ada.png"));
    }

    #[test]
    fn deserializes_minimal_claims() {
        let id = IdentityId::new();
        let claims: IdentityClaims =
            serde_json::from_str(&format!("{{\"sub\":\"{id}\"}}")).unwrap();
        assert_eq!(claims, IdentityClaims::new(id));
    }
}
