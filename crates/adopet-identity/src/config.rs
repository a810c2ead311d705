//! Identity layer configuration.
//!
//! Configuration for token verification, the identity cache, and the
//! upstream directory collaborators. All durations are human-readable
//! in TOML (`"2m"`, `"500ms"`).
//!
//! # Example (TOML)
//!
//! ```toml
//! [identity.token]
//! secret = "..."
//! leeway = "30s"
//!
//! [identity.cache]
//! ttl = "2m"
//! suppression_window = "500ms"
//!
//! [identity.upstream]
//! base_url = "https://api.adopet.example"
//! request_timeout = "10s"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration for the identity resolution layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Token verification settings.
    pub token: TokenConfig,

    /// Identity cache settings.
    pub cache: CacheConfig,

    /// Upstream directory settings.
    pub upstream: UpstreamConfig,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            token: TokenConfig::default(),
            cache: CacheConfig::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

/// Token verification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Shared secret the upstream issuer signs credentials with.
    ///
    /// Must be set; there is no usable default.
    pub secret: String,

    /// Clock-skew leeway applied to expiry and not-before checks.
    #[serde(with = "humantime_serde")]
    pub leeway: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            leeway: Duration::from_secs(30),
        }
    }
}

/// Identity cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a cached resolution stays valid for reads.
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,

    /// Window within which a repeated resolution of the same credential
    /// is served a stale entry instead of hitting upstream again.
    ///
    /// Zero disables duplicate-call suppression.
    #[serde(with = "humantime_serde")]
    pub suppression_window: Duration,

    /// How often the background sweep removes old duplicate-call
    /// markers.
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(120),                // 2 minutes
            suppression_window: Duration::from_millis(500),
            sweep_interval: Duration::from_secs(5),
        }
    }
}

/// Upstream directory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the upstream AdoPet API.
    pub base_url: Url,

    /// Timeout applied to each upstream call.
    ///
    /// A timeout on the identity fetch fails the resolution; a timeout
    /// on the institution lookup only degrades role refinement.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:8080").expect("static URL is valid"),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl IdentityConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the token secret is unset, and
    /// `ConfigError::InvalidValue` if:
    /// - the cache TTL is zero
    /// - the sweep interval is zero
    /// - the upstream request timeout is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.secret.is_empty() {
            return Err(ConfigError::Missing("token.secret".to_string()));
        }

        if self.cache.ttl.is_zero() {
            return Err(ConfigError::InvalidValue(
                "cache.ttl must be > 0".to_string(),
            ));
        }

        if self.cache.sweep_interval.is_zero() {
            return Err(ConfigError::InvalidValue(
                "cache.sweep_interval must be > 0".to_string(),
            ));
        }

        if self.upstream.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "upstream.request_timeout must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> IdentityConfig {
        let mut config = IdentityConfig::default();
        config.token.secret = "local-test-secret".to_string();
        config
    }

    #[test]
    fn test_default_durations() {
        let config = IdentityConfig::default();
        assert_eq!(config.cache.ttl, Duration::from_secs(120));
        assert_eq!(config.cache.suppression_window, Duration::from_millis(500));
        assert_eq!(config.upstream.request_timeout, Duration::from_secs(10));
        assert_eq!(config.token.leeway, Duration::from_secs(30));
    }

    #[test]
    fn test_configured_validates() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_missing_secret_fails_validation() {
        let config = IdentityConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
        assert!(err.to_string().contains("token.secret"));
    }

    #[test]
    fn test_zero_ttl_fails_validation() {
        let mut config = configured();
        config.cache.ttl = Duration::ZERO;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cache.ttl"));
    }

    #[test]
    fn test_zero_sweep_interval_fails_validation() {
        let mut config = configured();
        config.cache.sweep_interval = Duration::ZERO;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sweep_interval"));
    }

    #[test]
    fn test_zero_request_timeout_fails_validation() {
        let mut config = configured();
        config.upstream.request_timeout = Duration::ZERO;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout"));
    }

    #[test]
    fn test_zero_suppression_window_is_allowed() {
        // Zero disables suppression; that is a valid deployment choice.
        let mut config = configured();
        config.cache.suppression_window = Duration::ZERO;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = configured();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: IdentityConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.token.secret, config.token.secret);
        assert_eq!(parsed.cache.ttl, config.cache.ttl);
        assert_eq!(parsed.upstream.base_url, config.upstream.base_url);
    }

    #[test]
    fn test_humantime_deserialization() {
        let json = r#"{
            "token": { "secret": "s3cret", "leeway": "10s" },
            "cache": { "ttl": "5m", "suppression_window": "250ms" }
        }"#;

        let config: IdentityConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.token.leeway, Duration::from_secs(10));
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
        assert_eq!(config.cache.suppression_window, Duration::from_millis(250));
        // Unset section falls back to defaults.
        assert_eq!(config.upstream.request_timeout, Duration::from_secs(10));
    }
}
