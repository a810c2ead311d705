//! Effective role derivation.
//!
//! A generic administrator claim is refined into a specific operator
//! role by asking the institution directory what kind of institution
//! the user administers. Refinement is best-effort: a failed or
//! timed-out lookup keeps the unrefined base role and never fails the
//! overall resolution.

use std::sync::Arc;
use std::time::Duration;

use adopet_core::Role;
use tokio::time::timeout;

use crate::claims::ClaimSet;
use crate::upstream::InstitutionDirectory;

/// Derives a user's effective role from their claims.
pub struct RoleResolver {
    institutions: Arc<dyn InstitutionDirectory>,
    lookup_timeout: Duration,
}

impl RoleResolver {
    /// Creates a resolver.
    ///
    /// `lookup_timeout` bounds the institution lookup; on expiry the
    /// base role is kept.
    #[must_use]
    pub fn new(institutions: Arc<dyn InstitutionDirectory>, lookup_timeout: Duration) -> Self {
        Self {
            institutions,
            lookup_timeout,
        }
    }

    /// Resolves the effective role for a validated claim set.
    ///
    /// Performs at most one institution lookup, and only when the base
    /// role is the generic administrator marker. This operation cannot
    /// fail: lookup errors degrade to the unrefined base role.
    pub async fn resolve(&self, claims: &ClaimSet, credential: &str) -> Role {
        let base = Role::from_wire(claims.role.as_deref().unwrap_or_default());
        if !base.is_administrador() {
            return base;
        }

        let user_id = claims.id.as_deref().unwrap_or_default();
        let lookup = self.institutions.institution_kind(user_id, credential);

        match timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(kind)) => {
                let refined = kind.operator_role();
                tracing::debug!(user_id, kind = %kind, role = %refined, "Refined administrator role");
                refined
            }
            Ok(Err(err)) => {
                tracing::warn!(
                    user_id,
                    error = %err,
                    "Institution lookup failed; keeping unrefined administrator role"
                );
                base
            }
            Err(_) => {
                tracing::warn!(
                    user_id,
                    timeout = ?self.lookup_timeout,
                    "Institution lookup timed out; keeping unrefined administrator role"
                );
                base
            }
        }
    }
}
