//! Resolved identity output type.

use adopet_core::Role;
use serde::{Deserialize, Serialize};

/// A validated, role-enriched user identity.
///
/// This is the success output of the identity layer, consumed by
/// role-gating wrappers and route guards. Once constructed it is never
/// mutated; a new resolution produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    /// Platform user id, taken from the verified credential.
    pub id: String,

    /// Username for display and logging.
    pub username: String,

    /// Email address.
    pub email: String,

    /// Effective role, possibly refined from the generic administrator
    /// claim.
    pub role: Role,

    /// Profile biography, when the directory has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// Avatar reference (URL or storage key).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,
}

impl ResolvedIdentity {
    /// Returns `true` if this identity carries the given role.
    #[must_use]
    pub fn has_role(&self, role: &Role) -> bool {
        &self.role == role
    }
}
