//! Identity resolution orchestration.
//!
//! [`IdentityService`] ties the layer together: verify the credential,
//! validate its claims, fetch the owner's profile, refine the role, and
//! cache the outcome. One call, one resolved identity or one error from
//! the closed taxonomy.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::IdentityResult;
use crate::cache::{CacheKey, CacheLookup, CacheStats, IdentityCache};
use crate::config::IdentityConfig;
use crate::error::IdentityError;
use crate::resolver::RoleResolver;
use crate::token::TokenCodec;
use crate::types::ResolvedIdentity;
use crate::upstream::{InstitutionDirectory, UserDirectory};

/// Resolves bearer credentials into cached, role-enriched identities.
pub struct IdentityService {
    codec: TokenCodec,
    resolver: RoleResolver,
    cache: Arc<IdentityCache>,
    users: Arc<dyn UserDirectory>,
    fetch_timeout: Duration,
}

impl IdentityService {
    /// Creates a service over the given cache and directories.
    ///
    /// The cache is injected rather than owned so several services (or
    /// a service and an admin surface) can share one instance.
    #[must_use]
    pub fn new(
        config: &IdentityConfig,
        cache: Arc<IdentityCache>,
        users: Arc<dyn UserDirectory>,
        institutions: Arc<dyn InstitutionDirectory>,
    ) -> Self {
        Self {
            codec: TokenCodec::new(&config.token),
            resolver: RoleResolver::new(institutions, config.upstream.request_timeout),
            cache,
            users,
            fetch_timeout: config.upstream.request_timeout,
        }
    }

    /// Resolves the identity behind a presented credential.
    ///
    /// Outcomes other than [`IdentityError::Upstream`] are cached under
    /// the hashed credential (or the anonymous sentinel when no
    /// credential was presented), so repeated presentations within the
    /// TTL cost no verification or upstream traffic. Upstream failures
    /// are transient and never cached.
    ///
    /// # Errors
    ///
    /// Any variant of [`IdentityError`]; see each variant for when it
    /// applies.
    pub async fn resolve(&self, credential: Option<&str>) -> IdentityResult<ResolvedIdentity> {
        let credential = credential.filter(|c| !c.is_empty());

        let key = match credential {
            Some(raw) => CacheKey::from_credential(raw),
            None => CacheKey::anonymous(),
        };

        match self.cache.fetch(&key).await {
            CacheLookup::Hit(outcome) | CacheLookup::Suppressed(outcome) => return outcome,
            CacheLookup::Miss => {}
        }

        let outcome = match credential {
            Some(raw) => self.resolve_fresh(raw).await,
            None => Err(IdentityError::NoCredential),
        };

        let cacheable = match &outcome {
            Ok(_) => true,
            Err(err) => err.is_cacheable(),
        };
        if cacheable {
            self.cache.store(key, outcome.clone()).await;
        }

        outcome
    }

    /// Invalidates the cached identity for one credential.
    ///
    /// Called on logout; the rest of the cache is untouched.
    pub async fn logout(&self, credential: &str) {
        self.cache.invalidate(&CacheKey::from_credential(credential)).await;
    }

    /// Drops every cached identity.
    ///
    /// Administrative operation for incident response (for example
    /// after rotating the token secret).
    pub async fn flush_cache(&self) {
        self.cache.invalidate_all().await;
    }

    /// Returns a snapshot of the identity cache counters.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    async fn resolve_fresh(&self, raw: &str) -> IdentityResult<ResolvedIdentity> {
        let claims = self.codec.decode(raw)?;
        claims.validate()?;

        let profile = match timeout(self.fetch_timeout, self.users.fetch_current_user(raw)).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(timeout = ?self.fetch_timeout, "User directory request timed out");
                return Err(IdentityError::upstream("user directory request timed out"));
            }
        };

        let role = self.resolver.resolve(&claims, raw).await;

        // The id always comes from the verified credential; the profile
        // fills in display fields, with claims as the fallback.
        let identity = ResolvedIdentity {
            id: claims.id.clone().unwrap_or_default(),
            username: if profile.username.is_empty() {
                claims.sub.clone().unwrap_or_default()
            } else {
                profile.username
            },
            email: profile
                .email
                .or_else(|| claims.email.clone())
                .unwrap_or_default(),
            role,
            bio: profile.bio,
            avatar_ref: profile.avatar_ref,
        };

        tracing::debug!(user_id = %identity.id, role = %identity.role, "Resolved identity");
        Ok(identity)
    }
}
