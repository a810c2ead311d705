//! Bearer credential verification.
//!
//! [`TokenCodec`] verifies HS256-signed credentials against the
//! server-held secret and produces a normalized [`ClaimSet`]. Expiry
//! and not-before violations surface as distinct error codes so callers
//! can tell "ask the user to sign in again" apart from garbage input.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};

use crate::claims::ClaimSet;
use crate::config::TokenConfig;
use crate::error::IdentityError;

const ROLE_PREFIX: &str = "ROLE_";

/// Verifies bearer credentials and decodes their claims.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec from token configuration.
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway.as_secs();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Verifies a raw credential and returns its normalized claims.
    ///
    /// The role claim is run through [`normalize_role`] before the
    /// claim set is returned.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::Expired`] — past `exp`
    /// - [`IdentityError::NotYetValid`] — `nbf` in the future
    /// - [`IdentityError::VerificationFailed`] — signature mismatch
    /// - [`IdentityError::Malformed`] — anything else that is not a
    ///   verifiable token
    pub fn decode(&self, raw: &str) -> Result<ClaimSet, IdentityError> {
        let data =
            decode::<ClaimSet>(raw, &self.decoding_key, &self.validation).map_err(map_jwt_error)?;

        let mut claims = data.claims;
        claims.role = claims.role.map(|r| normalize_role(&r));
        Ok(claims)
    }

    /// Signs a claim set with the server secret.
    ///
    /// Credential issuance belongs to the upstream API; this exists for
    /// fixtures and local tooling.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Malformed`] if the claims cannot be
    /// serialized.
    pub fn encode(&self, claims: &ClaimSet) -> Result<String, IdentityError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| IdentityError::malformed(e.to_string()))
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> IdentityError {
    match err.kind() {
        ErrorKind::ExpiredSignature => IdentityError::Expired,
        ErrorKind::ImmatureSignature => IdentityError::NotYetValid,
        ErrorKind::InvalidSignature => IdentityError::VerificationFailed,
        _ => IdentityError::malformed(err.to_string()),
    }
}

/// Collapses duplicated `ROLE_` prefixes in a role string.
///
/// Upstream occasionally emits the prefix twice (`ROLE_ROLE_TUTOR`).
/// Redundant occurrences are stripped until none remain, so the
/// operation is idempotent for every input; well-formed values pass
/// through unchanged. This corrects an upstream data-quality defect, it
/// is not a business rule.
#[must_use]
pub fn normalize_role(role: &str) -> String {
    let mut current = role;
    while let Some(rest) = current.strip_prefix(ROLE_PREFIX) {
        if rest.starts_with(ROLE_PREFIX) {
            current = rest;
        } else {
            break;
        }
    }
    current.to_string()
}
