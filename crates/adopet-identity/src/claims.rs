//! Decoded credential claims.
//!
//! [`ClaimSet`] is the normalized payload produced by the token codec.
//! Required-claim validation lives here as a pure function so it can be
//! exercised without any token machinery.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::IdentityError;

/// The decoded payload of a bearer credential.
///
/// The identity fields are optional at this level because the wire
/// payload may omit them; [`ClaimSet::validate`] is what enforces the
/// contract. Unknown claims are preserved in `extra` rather than
/// dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Platform user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Subject (username).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Base role, wire format (`ROLE_*`), already normalized by the
    /// codec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not valid before (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Extension claims this layer does not interpret.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ClaimSet {
    /// Creates a claim set with all required fields, expiring after
    /// `valid_for` seconds. Mainly useful for fixtures.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        sub: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        valid_for: i64,
    ) -> Self {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Self {
            id: Some(id.into()),
            sub: Some(sub.into()),
            email: Some(email.into()),
            role: Some(role.into()),
            exp: now + valid_for,
            iat: Some(now),
            nbf: None,
            extra: HashMap::new(),
        }
    }

    /// Validates that every required claim is present and non-empty.
    ///
    /// Pure check, no I/O. Required claims: `id`, `sub`, `email`,
    /// `role`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::MissingClaims`] naming the first
    /// missing claim.
    pub fn validate(&self) -> Result<(), IdentityError> {
        for (name, value) in [
            ("id", &self.id),
            ("sub", &self.sub),
            ("email", &self.email),
            ("role", &self.role),
        ] {
            match value {
                Some(v) if !v.is_empty() => {}
                _ => return Err(IdentityError::missing_claims(name)),
            }
        }
        Ok(())
    }
}
