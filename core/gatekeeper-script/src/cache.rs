//! In-memory cache of rendered scripts.
//!
//! Entries are keyed by license key and request host and live for a fixed
//! TTL. Stale entries are dropped on every insert and the map never holds
//! more than its capacity. Saving new settings must call
//! [`ScriptCache::invalidate_all`]; the key does not cover watermark or
//! protection settings.

use gatekeeper_license::extract_domain;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default lifetime of a cached script.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default maximum number of cached scripts.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Identifies one rendered script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub license_key: String,
    pub domain: Option<String>,
}

impl CacheKey {
    /// Builds a key. `domain` may be a hostname or page URL; only its host
    /// is kept, so every page on one site shares an entry.
    pub fn new(license_key: &str, domain: Option<&str>) -> Self {
        let domain = domain.map(str::trim).filter(|d| !d.is_empty()).map(|d| {
            extract_domain(d)
                .unwrap_or_else(|| d.to_string())
                .to_ascii_lowercase()
        });
        Self {
            license_key: license_key.trim().to_string(),
            domain,
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    script: Arc<str>,
    inserted_at: Instant,
}

/// Thread-safe TTL cache for rendered scripts.
#[derive(Debug)]
pub struct ScriptCache {
    ttl: Duration,
    capacity: usize,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl ScriptCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CAPACITY)
    }

    /// Cache holding at most `capacity` scripts (at least one).
    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the cached script if it is still fresh.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<str>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.script))
    }

    /// Stores a script, first dropping stale entries and, when the cache is
    /// full, the oldest one.
    pub fn insert(&self, key: CacheKey, script: impl Into<Arc<str>>) -> Arc<str> {
        let script = script.into();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                debug!(domain = ?oldest.domain, "script cache full, evicting oldest entry");
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key,
            CacheEntry {
                script: Arc::clone(&script),
                inserted_at: Instant::now(),
            },
        );
        script
    }

    /// Returns the fresh cached script for `key`, rendering and storing a new
    /// one when it is missing or stale.
    pub fn get_or_render<E>(
        &self,
        key: CacheKey,
        render: impl FnOnce() -> Result<String, E>,
    ) -> Result<Arc<str>, E> {
        if let Some(script) = self.get(&key) {
            debug!(domain = ?key.domain, "script cache hit");
            return Ok(script);
        }

        debug!(domain = ?key.domain, "script cache miss");
        let script = render()?;
        Ok(self.insert(key, script))
    }

    /// Drops one entry. Returns true if it was present.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key).is_some()
    }

    /// Drops every entry.
    pub fn invalidate_all(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let dropped = entries.len();
        entries.clear();
        debug!(dropped, "script cache cleared");
    }

    /// Removes stale entries and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        before - entries.len()
    }

    /// Number of stored entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ScriptCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
