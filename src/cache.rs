//! Expiry-based cache for backend responses.
//!
//! Entries are kept for the lifetime of the process only. A read of an
//! entry older than its TTL is a miss; stale entries stay in the store
//! until overwritten or invalidated. Storage failures never reach the
//! caller: reads degrade to misses and writes to no-ops.

use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default time-to-live for cached responses
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Failures of the underlying storage; never surfaced by [`ResponseCache`]
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache storage is unavailable")]
    Unavailable,

    #[error("cache storage lock was poisoned")]
    Poisoned,
}

/// A cached payload and the time it was written
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    payload: Value,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    pub fn new(payload: Value, created_at: Instant, ttl: Duration) -> Self {
        Self {
            payload,
            created_at,
            ttl,
        }
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh while its age is strictly below the TTL
    pub fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < self.ttl
    }
}

/// Backing storage for cache entries
pub trait CacheStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;
    fn save(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError>;
    fn remove(&self, key: &str) -> Result<(), CacheError>;
    fn clear(&self) -> Result<(), CacheError>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl CacheStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.clear();
        Ok(())
    }
}

/// Store used when no storage is available; every operation fails
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl CacheStore for UnavailableStore {
    fn load(&self, _key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Err(CacheError::Unavailable)
    }

    fn save(&self, _key: &str, _entry: CacheEntry) -> Result<(), CacheError> {
        Err(CacheError::Unavailable)
    }

    fn remove(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable)
    }

    fn clear(&self) -> Result<(), CacheError> {
        Err(CacheError::Unavailable)
    }
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Key to payload cache with per-entry expiry
pub struct ResponseCache {
    store: Box<dyn CacheStore>,
    clock: Box<dyn Clock>,
    default_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("default_ttl", &self.default_ttl)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCache {
    /// In-memory cache using the system clock
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_parts(MemoryStore::default(), SystemClock, default_ttl)
    }

    /// Cache that never stores anything
    pub fn disabled() -> Self {
        Self::with_parts(UnavailableStore, SystemClock, DEFAULT_TTL)
    }

    pub fn with_parts(
        store: impl CacheStore + 'static,
        clock: impl Clock + 'static,
        default_ttl: Duration,
    ) -> Self {
        Self {
            store: Box::new(store),
            clock: Box::new(clock),
            default_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Fresh payload for `key`, or `None` on a miss, a stale entry or a storage failure
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let payload = match self.store.load(key) {
            Ok(Some(entry)) if entry.is_fresh(now) => Some(entry.payload),
            Ok(Some(_)) => {
                debug!("Cache entry for '{}' is stale", key);
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Cache read for '{}' failed: {}", key, e);
                None
            }
        };

        let counter = if payload.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        payload
    }

    /// Store `payload` under `key`, replacing any previous entry
    pub fn put(&self, key: &str, payload: Value, ttl: Duration) {
        let entry = CacheEntry::new(payload, self.clock.now(), ttl);
        if let Err(e) = self.store.save(key, entry) {
            warn!("Cache write for '{}' failed: {}", key, e);
        }
    }

    /// Store with the cache's default TTL
    pub fn put_default(&self, key: &str, payload: Value) {
        self.put(key, payload, self.default_ttl);
    }

    pub fn invalidate(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!("Cache invalidation for '{}' failed: {}", key, e);
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Cache clear failed: {}", e);
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
