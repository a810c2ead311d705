//! Identity resolution error types.
//!
//! Every failure the identity layer can surface is one of the variants
//! here; callers match exhaustively and never see an untyped error.
//! Institution-lookup failures are deliberately absent: they are
//! absorbed by the role resolver's fallback and never become a
//! top-level outcome.

use std::fmt;

/// Errors produced by identity resolution.
///
/// All variants except [`IdentityError::Upstream`] describe the
/// credential itself and are safe to cache alongside successful
/// resolutions; `Upstream` is transient and must be retried on the next
/// request instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// No bearer credential was present on the request.
    #[error("No credential present on the request")]
    NoCredential,

    /// The credential is not a well-formed token.
    #[error("Malformed credential: {message}")]
    Malformed {
        /// Description of what failed to parse.
        message: String,
    },

    /// The credential's signature does not verify against the server key.
    #[error("Credential signature verification failed")]
    VerificationFailed,

    /// The credential is syntactically valid but past its expiry.
    #[error("Credential expired")]
    Expired,

    /// The credential's not-before claim is in the future.
    #[error("Credential not yet valid")]
    NotYetValid,

    /// Decoding succeeded but a required claim is absent or empty.
    ///
    /// This indicates an upstream contract violation, not a user error.
    #[error("Missing required claim: {claim}")]
    MissingClaims {
        /// Name of the first missing claim.
        claim: String,
    },

    /// The identity-fetch collaborator failed or timed out.
    #[error("Upstream identity service failed: {message}")]
    Upstream {
        /// Description of the upstream failure.
        message: String,
    },
}

impl IdentityError {
    /// Creates a new `Malformed` error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a new `MissingClaims` error.
    #[must_use]
    pub fn missing_claims(claim: impl Into<String>) -> Self {
        Self::MissingClaims {
            claim: claim.into(),
        }
    }

    /// Creates a new `Upstream` error.
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Returns the stable string code for this error.
    ///
    /// Codes are what the rest of the platform (and telemetry) key on;
    /// they never change even if messages do.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoCredential => "NO_CREDENTIAL",
            Self::Malformed { .. } => "MALFORMED",
            Self::VerificationFailed => "VERIFICATION_FAILED",
            Self::Expired => "EXPIRED",
            Self::NotYetValid => "NOT_YET_VALID",
            Self::MissingClaims { .. } => "MISSING_CLAIMS",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
        }
    }

    /// Returns `true` if the caller may retry on the next request.
    ///
    /// Only upstream failures are transient; every other variant is a
    /// property of the credential and retrying without a new credential
    /// cannot help.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }

    /// Returns `true` if this outcome may be stored in the identity
    /// cache.
    ///
    /// Upstream failures are never cached as negative results.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, Self::Upstream { .. })
    }

    /// Returns `true` if the user-visible handling is "treat the caller
    /// as unauthenticated".
    #[must_use]
    pub fn treat_as_anonymous(&self) -> bool {
        !matches!(self, Self::Upstream { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoCredential => ErrorCategory::Anonymous,
            Self::Malformed { .. } | Self::VerificationFailed => ErrorCategory::Credential,
            Self::Expired | Self::NotYetValid => ErrorCategory::Validity,
            Self::MissingClaims { .. } => ErrorCategory::Contract,
            Self::Upstream { .. } => ErrorCategory::Upstream,
        }
    }
}

/// Categories of identity errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// No credential at all; the caller is anonymous.
    Anonymous,
    /// The credential failed integrity checks.
    Credential,
    /// The credential is outside its validity window.
    Validity,
    /// The upstream issuer violated the claim contract.
    Contract,
    /// A collaborator service failed.
    Upstream,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::Credential => write!(f, "credential"),
            Self::Validity => write!(f, "validity"),
            Self::Contract => write!(f, "contract"),
            Self::Upstream => write!(f, "upstream"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IdentityError::malformed("not a token");
        assert_eq!(err.to_string(), "Malformed credential: not a token");

        let err = IdentityError::missing_claims("email");
        assert_eq!(err.to_string(), "Missing required claim: email");

        let err = IdentityError::Expired;
        assert_eq!(err.to_string(), "Credential expired");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(IdentityError::NoCredential.code(), "NO_CREDENTIAL");
        assert_eq!(IdentityError::malformed("x").code(), "MALFORMED");
        assert_eq!(
            IdentityError::VerificationFailed.code(),
            "VERIFICATION_FAILED"
        );
        assert_eq!(IdentityError::Expired.code(), "EXPIRED");
        assert_eq!(IdentityError::NotYetValid.code(), "NOT_YET_VALID");
        assert_eq!(IdentityError::missing_claims("id").code(), "MISSING_CLAIMS");
        assert_eq!(IdentityError::upstream("down").code(), "UPSTREAM_ERROR");
    }

    #[test]
    fn test_only_upstream_is_retryable() {
        assert!(IdentityError::upstream("timeout").is_retryable());
        assert!(!IdentityError::Expired.is_retryable());
        assert!(!IdentityError::NoCredential.is_retryable());
    }

    #[test]
    fn test_upstream_never_cacheable() {
        assert!(!IdentityError::upstream("timeout").is_cacheable());
        assert!(IdentityError::NoCredential.is_cacheable());
        assert!(IdentityError::VerificationFailed.is_cacheable());
        assert!(IdentityError::missing_claims("sub").is_cacheable());
    }

    #[test]
    fn test_anonymous_handling() {
        assert!(IdentityError::Expired.treat_as_anonymous());
        assert!(IdentityError::NoCredential.treat_as_anonymous());
        assert!(!IdentityError::upstream("down").treat_as_anonymous());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            IdentityError::NoCredential.category(),
            ErrorCategory::Anonymous
        );
        assert_eq!(
            IdentityError::VerificationFailed.category(),
            ErrorCategory::Credential
        );
        assert_eq!(IdentityError::Expired.category(), ErrorCategory::Validity);
        assert_eq!(
            IdentityError::missing_claims("role").category(),
            ErrorCategory::Contract
        );
        assert_eq!(
            IdentityError::upstream("x").category(),
            ErrorCategory::Upstream
        );
        assert_eq!(ErrorCategory::Upstream.to_string(), "upstream");
    }
}
