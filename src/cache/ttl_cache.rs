//! # TTL Cache
//!
//! Process-wide in-memory store that sits in front of every upstream call
//! (holdings, transactions, AI analysis, market stats). Each entry carries
//! its own absolute expiry; an entry is visible to [`TtlCache::get`] only
//! while `now < expires_at`.
//!
//! Values are stored type-erased so one cache can hold every data kind under
//! namespaced keys. `set` moves the value in and `get` hands back a clone, so
//! callers never share mutable state with the stored copy.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Upper bound applied to TTLs so `Instant` arithmetic cannot overflow.
const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

struct CacheEntry {
    value: Box<dyn Any + Send + Sync>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Snapshot of cache counters, served by the stats endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: Option<usize>,
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub hit_rate: f64,
}

/// Key/value store with per-entry expiration.
///
/// Lookups are exact-string. There is no `remove`: callers that
/// want fresh data skip `get` and overwrite with `set`.
pub struct TtlCache {
    entries: DashMap<String, CacheEntry>,
    max_entries: Option<usize>,
    /// Serializes the capacity check with the insert on bounded caches
    admission: Mutex<()>,
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    evictions: AtomicU64,
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TtlCache {
    /// Create an unbounded cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: None,
            admission: Mutex::new(()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Create a cache holding at most `max_entries` keys. A limit of zero
    /// means unbounded.
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            max_entries: (max_entries > 0).then_some(max_entries),
            ..Self::new()
        }
    }

    /// Store `value` under `key` until `ttl` has elapsed, replacing any
    /// previous entry for that key regardless of its remaining lifetime.
    pub fn set<V>(&self, key: impl Into<String>, value: V, ttl: Duration)
    where
        V: Send + Sync + 'static,
    {
        let key = key.into();
        let now = Instant::now();

        let entry = CacheEntry {
            value: Box::new(value),
            expires_at: now + ttl.min(MAX_TTL),
        };

        let Some(max) = self.max_entries else {
            self.entries.insert(key, entry);
            return;
        };

        // Only `set` grows the map, so holding the lock across check and
        // insert keeps the bound strict under concurrent writers
        let _admission = self.admission.lock();
        if !self.entries.contains_key(&key) && self.entries.len() >= max {
            self.make_room(max, now);
        }
        self.entries.insert(key, entry);
    }

    /// Return a copy of the value stored under `key` if it has not expired.
    ///
    /// A key that was never set, one that expired, and one holding a value of
    /// another type all produce `None`.
    pub fn get<V>(&self, key: &str) -> Option<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        let now = Instant::now();

        let Some(entry) = self.entries.get(key) else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        if !entry.is_live(now) {
            // Release the shard read lock before taking the write lock
            drop(entry);
            // A concurrent `set` may have replaced the entry in between
            if self.entries.remove_if(key, |_, e| !e.is_live(now)).is_some() {
                self.expirations.fetch_add(1, Ordering::Relaxed);
            }
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        match entry.value.downcast_ref::<V>() {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value.clone())
            }
            None => {
                warn!(
                    "[Cache] Type mismatch for key {} (requested {})",
                    key,
                    std::any::type_name::<V>()
                );
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            self.expirations.fetch_add(removed as u64, Ordering::Relaxed);
            debug!("[Cache] Purged {} expired entries", removed);
        }
        removed
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            entries: self.entries.len(),
            max_entries: self.max_entries,
            hits,
            misses,
            expirations: self.expirations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }

    /// Free a slot for a new key: expired entries go first, then whichever
    /// live entry is closest to expiry.
    fn make_room(&self, max: usize, now: Instant) {
        self.entries.retain(|_, entry| entry.is_live(now));

        while self.entries.len() >= max {
            let victim = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().expires_at)
                .map(|entry| entry.key().clone());

            let Some(victim) = victim else { break };
            if self.entries.remove(&victim).is_some() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!("[Cache] Evicted {} to stay within {} entries", victim, max);
            }
        }
    }
}
