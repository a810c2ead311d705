//! TTL cache for resolved identities.
//!
//! Keys are derived by hashing the raw credential, so the cache never
//! holds bearer tokens in lookable-up form. Both successful identities
//! and cacheable failures are stored, which lets repeated presentations
//! of the same bad credential short-circuit without re-verification.
//!
//! A lightweight attempt-marker map implements duplicate-call
//! suppression: when a fresh resolution for a key started moments ago,
//! a stale entry is served instead of triggering a second upstream
//! round trip.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::config::CacheConfig;
use crate::error::IdentityError;
use crate::types::ResolvedIdentity;

// ============================================================================
// Cache Key
// ============================================================================

/// Key for one cached resolution outcome.
///
/// Built from the SHA-256 digest of the raw credential; the credential
/// itself is never stored. Requests without a credential share a single
/// sentinel key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for a presented credential.
    #[must_use]
    pub fn from_credential(credential: &str) -> Self {
        let digest = Sha256::digest(credential.as_bytes());
        Self(hex::encode(digest))
    }

    /// The shared key for credential-less requests.
    #[must_use]
    pub fn anonymous() -> Self {
        Self("anonymous".to_string())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Cache Entry
// ============================================================================

/// One cached resolution outcome.
#[derive(Debug, Clone)]
struct CacheEntry {
    outcome: Result<ResolvedIdentity, IdentityError>,
    created_at: Instant,
}

impl CacheEntry {
    fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

/// Result of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// A fresh entry was found.
    Hit(Result<ResolvedIdentity, IdentityError>),

    /// A stale entry was served because another resolution for the same
    /// key started within the suppression window.
    Suppressed(Result<ResolvedIdentity, IdentityError>),

    /// No usable entry; the caller must resolve and [`IdentityCache::store`].
    Miss,
}

/// Cache counters for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub suppressed: u64,
}

// ============================================================================
// Identity Cache
// ============================================================================

/// TTL map of resolution outcomes keyed by hashed credential.
///
/// The cache is a plain injected value; callers share one instance by
/// wrapping it in an [`Arc`].
pub struct IdentityCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    /// Start times of recent resolution attempts, for suppression.
    markers: RwLock<HashMap<CacheKey, Instant>>,
    counters: RwLock<CacheStats>,
    ttl: Duration,
    suppression_window: Duration,
}

impl IdentityCache {
    /// Creates an empty cache with the given TTL and suppression window.
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            markers: RwLock::new(HashMap::new()),
            counters: RwLock::new(CacheStats::default()),
            ttl: config.ttl,
            suppression_window: config.suppression_window,
        }
    }

    /// Looks up `key` and records that a resolution attempt is starting.
    ///
    /// A fresh entry is a [`CacheLookup::Hit`]. An expired entry is
    /// served as [`CacheLookup::Suppressed`] when another attempt for
    /// the same key began within the suppression window; otherwise the
    /// expired entry is removed and the lookup is a miss.
    pub async fn fetch(&self, key: &CacheKey) -> CacheLookup {
        let now = Instant::now();
        let previous_attempt = {
            let mut markers = self.markers.write().await;
            markers.insert(key.clone(), now)
        };

        let entry = {
            let entries = self.entries.read().await;
            entries.get(key).cloned()
        };

        match entry {
            Some(entry) if entry.age() < self.ttl => {
                self.counters.write().await.hits += 1;
                tracing::debug!(key = %key, age = ?entry.age(), "Identity cache hit");
                CacheLookup::Hit(entry.outcome)
            }
            Some(entry) => {
                let in_flight = previous_attempt
                    .is_some_and(|started| now.duration_since(started) < self.suppression_window);
                if in_flight {
                    self.counters.write().await.suppressed += 1;
                    tracing::debug!(key = %key, "Serving stale identity during in-flight resolution");
                    CacheLookup::Suppressed(entry.outcome)
                } else {
                    self.entries.write().await.remove(key);
                    self.counters.write().await.misses += 1;
                    tracing::debug!(key = %key, "Identity cache entry expired");
                    CacheLookup::Miss
                }
            }
            None => {
                self.counters.write().await.misses += 1;
                CacheLookup::Miss
            }
        }
    }

    /// Stores a resolution outcome under `key`.
    pub async fn store(&self, key: CacheKey, outcome: Result<ResolvedIdentity, IdentityError>) {
        let entry = CacheEntry {
            outcome,
            created_at: Instant::now(),
        };
        self.entries.write().await.insert(key, entry);
    }

    /// Removes the entry for one credential, if present.
    ///
    /// Used on logout so the next presentation of the same credential
    /// is re-verified instead of served from cache.
    pub async fn invalidate(&self, key: &CacheKey) {
        let removed = self.entries.write().await.remove(key).is_some();
        self.markers.write().await.remove(key);
        if removed {
            tracing::debug!(key = %key, "Invalidated cached identity");
        }
    }

    /// Drops every cached entry and marker.
    ///
    /// This is an operational escape hatch, not part of normal request
    /// handling.
    pub async fn invalidate_all(&self) {
        let count = {
            let mut entries = self.entries.write().await;
            let count = entries.len();
            entries.clear();
            count
        };
        self.markers.write().await.clear();
        tracing::info!(evicted = count, "Flushed identity cache");
    }

    /// Removes attempt markers older than twice the suppression window.
    ///
    /// Markers only matter while a resolution could still be in flight;
    /// entries are never touched here.
    pub async fn sweep_markers(&self) {
        let threshold = self.suppression_window * 2;
        let mut markers = self.markers.write().await;
        markers.retain(|_, started| started.elapsed() < threshold);
    }

    /// Spawns a background task that periodically sweeps stale markers.
    pub fn spawn_sweeper(cache: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                cache.sweep_markers().await;
            }
        })
    }

    /// Returns a snapshot of the cache counters.
    pub async fn stats(&self) -> CacheStats {
        let mut stats = self.counters.read().await.clone();
        stats.entries = self.entries.read().await.len();
        stats
    }
}
