// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded TTL cache with insertion-order (FIFO) eviction.
//!
//! One coarse mutex serializes every operation on the entry table. Entry
//! counts are small and the dominant cost is the backend call the cache is
//! shielding, so coarse locking is preferred over fine-grained schemes.
//! Expiration is lazy: expired entries are dropped at the access that
//! discovers them, or in bulk by [`TtlCache::cleanup_expired`].

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use tollbooth_config::model::CacheSettings;

use crate::key::CacheKey;

/// One cached value with its absolute expiry deadline.
///
/// Owned exclusively by the cache; never handed out by reference.
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// The entry table plus the insertion-order queue, guarded as one unit.
///
/// `order` holds keys in insertion order. A key deleted or lazily expired
/// leaves a stale queue entry behind; eviction and sweeps drain those, which
/// keeps the request-path operations O(1) expected.
struct Inner<V> {
    entries: HashMap<CacheKey, CacheEntry<V>>,
    order: VecDeque<CacheKey>,
}

impl<V> Inner<V> {
    /// Remove and return the earliest-inserted entry still present,
    /// draining stale queue keys along the way.
    fn evict_oldest(&mut self) -> Option<CacheKey> {
        while let Some(key) = self.order.pop_front() {
            if self.entries.remove(&key).is_some() {
                return Some(key);
            }
        }
        None
    }
}

/// A bounded key/value store where entries expire after a time-to-live.
///
/// Eviction under capacity pressure is strictly insertion-order (FIFO):
/// the earliest-inserted entry goes first, even if a more urgently-expiring
/// entry exists. Explicitly not LRU and not expiration-aware.
///
/// The payload type is caller-chosen and opaque to the cache; values are
/// cloned out on hits.
pub struct TtlCache<V> {
    inner: Mutex<Inner<V>>,
    default_ttl: Duration,
    max_entries: usize,
}

impl<V> TtlCache<V> {
    /// Create a cache holding at most `max_entries` entries, with the given
    /// default TTL. A capacity below 1 is clamped to 1.
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            default_ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Create a cache from startup configuration.
    pub fn from_config(settings: &CacheSettings) -> Self {
        Self::new(
            settings.max_entries,
            Duration::from_secs(settings.default_ttl_secs),
        )
    }

    /// The default TTL applied by [`TtlCache::set`].
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Count of entries currently stored, including expired entries not yet
    /// lazily removed.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Insert or overwrite a value with the default TTL.
    pub fn set(&self, key: CacheKey, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Insert or overwrite a value with an explicit TTL.
    ///
    /// Overwriting an existing key keeps its original insertion position and
    /// does not count against capacity. Inserting a new key at capacity
    /// evicts exactly one entry first: the earliest-inserted one.
    ///
    /// A zero TTL is legal and produces an entry that is already expired at
    /// the next access.
    pub fn set_with_ttl(&self, key: CacheKey, value: V, ttl: Duration) {
        let mut inner = self.lock();
        let expires_at = Instant::now() + ttl;

        if let Some(existing) = inner.entries.get_mut(&key) {
            existing.value = value;
            existing.expires_at = expires_at;
            return;
        }

        if inner.entries.len() >= self.max_entries {
            if let Some(evicted) = inner.evict_oldest() {
                debug!(key = %evicted, "evicted earliest-inserted cache entry");
            }
        }

        inner.order.push_back(key.clone());
        inner.entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Remove a key if present; no-op otherwise.
    pub fn delete(&self, key: &CacheKey) {
        // The stale insertion-order slot is drained by the next eviction
        // or sweep.
        self.lock().entries.remove(key);
    }

    /// Remove all entries.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    /// Scan all entries and remove every expired one, returning the count
    /// removed.
    ///
    /// O(n) in current entry count; intended for a periodic background task,
    /// not the request path. Also compacts the insertion-order queue.
    pub fn cleanup_expired(&self) -> usize {
        let mut inner = self.lock();
        let now = Instant::now();

        let before = inner.entries.len();
        inner.entries.retain(|_, entry| now < entry.expires_at);
        let removed = before - inner.entries.len();

        let Inner { entries, order } = &mut *inner;
        order.retain(|key| entries.contains_key(key));

        removed
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        // A poisoning panic cannot leave the table structurally torn; take
        // the guard back and keep serving.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<V: Clone> TtlCache<V> {
    /// Look up a key. Returns the value only if the entry has not expired.
    ///
    /// An entry found expired is removed here, at the access that discovers
    /// it (lazy expiration). Absence is a normal return, never an error.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let mut inner = self.lock();
        let now = Instant::now();

        if let Some(entry) = inner.entries.get(key) {
            if now < entry.expires_at {
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }

        inner.entries.remove(key);
        None
    }
}
