//! Single-slot, time-to-live gated cache for the normalized station week.
//!
//! The upstream API updates roughly once per hour, so one cached response per
//! process is all the state this system ever needs. Entries are immutable and
//! swapped wholesale as [`Arc`] values; validity is answered against a caller
//! supplied clock so tests never have to sleep.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// How long a stored payload stays servable. The upstream refreshes hourly;
/// 55 minutes keeps us one request per refresh cycle without ever serving a
/// reading two cycles old.
pub const CACHE_TTL_MINUTES: i64 = 55;

/// An immutable cached payload plus the instant it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub payload: T,
    pub created_at: DateTime<Utc>,
}

/// A cache holding at most one entry, expired purely by age.
///
/// There is no eviction policy beyond TTL expiry and no persistence: on
/// process restart the slot starts empty, which is acceptable because the TTL
/// is short and the upstream fetch is idempotent.
///
/// All operations take `now` explicitly. Production callers pass
/// [`Utc::now()`]; tests pass a fixed instant.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use temptrend::TimedCache;
///
/// let mut cache: TimedCache<String> = TimedCache::with_default_ttl();
/// let t0 = Utc::now();
///
/// assert!(cache.get(t0).is_none());
/// cache.store("payload".to_string(), t0);
/// assert!(cache.is_valid(t0 + Duration::minutes(54)));
/// assert!(!cache.is_valid(t0 + Duration::minutes(55)));
/// ```
#[derive(Debug)]
pub struct TimedCache<T> {
    slot: Option<Arc<CacheEntry<T>>>,
    ttl: Duration,
}

impl<T> TimedCache<T> {
    /// Creates an empty cache with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self { slot: None, ttl }
    }

    /// Creates an empty cache with the standard 55-minute TTL.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::minutes(CACHE_TTL_MINUTES))
    }

    /// Returns true iff an entry exists and `now - created_at` is strictly
    /// below the TTL. At exactly TTL the entry is stale.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        match &self.slot {
            Some(entry) => now - entry.created_at < self.ttl,
            None => false,
        }
    }

    /// Returns the entry if it is still valid at `now`.
    ///
    /// An expired or absent entry yields `None`; that is the normal
    /// "go fetch fresh data" signal, not an error.
    pub fn get(&self, now: DateTime<Utc>) -> Option<Arc<CacheEntry<T>>> {
        if self.is_valid(now) {
            self.slot.clone()
        } else {
            None
        }
    }

    /// Replaces whatever the slot holds with a fresh entry.
    ///
    /// The replacement is a single assignment of an immutable value; partial
    /// field updates are not possible by construction.
    pub fn store(&mut self, payload: T, now: DateTime<Utc>) -> Arc<CacheEntry<T>> {
        let entry = Arc::new(CacheEntry {
            payload,
            created_at: now,
        });
        self.slot = Some(entry.clone());
        entry
    }

    /// Drops the slot, forcing the next `get` to miss.
    pub fn clear(&mut self) {
        self.slot = None;
    }
}
