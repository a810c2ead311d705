//! Identity resolution and caching for the AdoPet platform.
//!
//! Resolves bearer credentials into role-enriched identities:
//!
//! - [`token::TokenCodec`] verifies the credential and normalizes its
//!   claims
//! - [`claims::ClaimSet::validate`] enforces the required-claim
//!   contract
//! - [`resolver::RoleResolver`] refines the generic administrator claim
//!   into a shelter or clinic operator role
//! - [`cache::IdentityCache`] keeps outcomes warm under hashed keys,
//!   with duplicate-call suppression
//! - [`service::IdentityService`] orchestrates the above behind a
//!   single `resolve` call
//!
//! Every failure is an [`IdentityError`] from a closed taxonomy, so
//! callers can exhaustively decide between "treat as anonymous" and
//! "report upstream trouble".
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use adopet_identity::cache::IdentityCache;
//! use adopet_identity::config::IdentityConfig;
//! use adopet_identity::service::IdentityService;
//! use adopet_identity::upstream::{HttpInstitutionDirectory, HttpUserDirectory};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = IdentityConfig::default();
//! config.token.secret = std::env::var("ADOPET_TOKEN_SECRET")?;
//! config.validate()?;
//!
//! let cache = Arc::new(IdentityCache::new(&config.cache));
//! let service = IdentityService::new(
//!     &config,
//!     cache,
//!     Arc::new(HttpUserDirectory::new(&config.upstream)),
//!     Arc::new(HttpInstitutionDirectory::new(&config.upstream)),
//! );
//!
//! let identity = service.resolve(Some("eyJhbGciOi...")).await?;
//! println!("{} is {}", identity.username, identity.role);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod claims;
pub mod config;
pub mod error;
pub mod resolver;
pub mod service;
pub mod token;
pub mod types;
pub mod upstream;

pub use cache::{CacheKey, CacheStats, IdentityCache};
pub use claims::ClaimSet;
pub use config::{CacheConfig, ConfigError, IdentityConfig, TokenConfig, UpstreamConfig};
pub use error::{ErrorCategory, IdentityError};
pub use resolver::RoleResolver;
pub use service::IdentityService;
pub use token::TokenCodec;
pub use types::ResolvedIdentity;

/// Result type used throughout the identity layer.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::cache::IdentityCache;
    pub use crate::config::IdentityConfig;
    pub use crate::error::IdentityError;
    pub use crate::service::IdentityService;
    pub use crate::types::ResolvedIdentity;
    pub use crate::{IdentityResult, upstream::InstitutionDirectory, upstream::UserDirectory};
    pub use adopet_core::{InstitutionKind, Role};
}
