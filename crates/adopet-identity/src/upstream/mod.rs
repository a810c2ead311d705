//! Upstream directory collaborators.
//!
//! The identity layer talks to two upstream services: the user
//! directory (profile of the credential's owner) and the institution
//! directory (kind of the institution an administrator belongs to).
//! Both are traits so tests and alternative transports can stand in;
//! [`http`] provides the production `reqwest` implementations.

pub mod http;

use adopet_core::InstitutionKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::IdentityResult;

pub use http::{HttpInstitutionDirectory, HttpUserDirectory};

/// Profile of a user, as reported by the user directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    /// Platform user id.
    pub id: String,

    /// Username.
    pub username: String,

    /// Email address, when the directory has one on file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Profile biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// Avatar reference (URL or storage key).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,
}

/// Fetches the profile of the user a credential belongs to.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetches the current user's profile.
    ///
    /// The raw credential is passed through for upstream authorization.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IdentityError::Upstream`] if the directory
    /// fails or cannot be reached.
    async fn fetch_current_user(&self, credential: &str) -> IdentityResult<AccountProfile>;
}

/// Looks up the kind of the institution a user administers.
#[async_trait]
pub trait InstitutionDirectory: Send + Sync {
    /// Looks up the institution kind for a user id.
    ///
    /// The raw credential is passed through for upstream authorization.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IdentityError::Upstream`] if the directory
    /// fails, cannot be reached, or reports an unknown kind. Callers
    /// treat all of these as "refinement unavailable".
    async fn institution_kind(
        &self,
        user_id: &str,
        credential: &str,
    ) -> IdentityResult<InstitutionKind>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserializes_camel_case() {
        let json = r#"{
            "id": "42",
            "username": "ana",
            "email": "ana@x.com",
            "bio": "Cuido gatos",
            "avatarRef": "https://cdn.adopet.example/a/42.png"
        }"#;

        let profile: AccountProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, "42");
        assert_eq!(profile.username, "ana");
        assert_eq!(
            profile.avatar_ref.as_deref(),
            Some("https://cdn.adopet.example/a/42.png")
        );
    }

    #[test]
    fn test_profile_optional_fields_default() {
        let json = r#"{"id": "7", "username": "bruno"}"#;
        let profile: AccountProfile = serde_json::from_str(json).unwrap();
        assert!(profile.email.is_none());
        assert!(profile.bio.is_none());
        assert!(profile.avatar_ref.is_none());
    }
}
