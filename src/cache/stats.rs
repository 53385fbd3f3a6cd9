//! Cache Statistics Module
//!
//! Counts request outcomes. Counters are atomics so concurrent handlers never
//! wait on each other to record them.

use std::sync::atomic::{AtomicU64, Ordering};

// == Cache Stats ==
/// Live counters shared by all requests.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    origin_failures: AtomicU64,
    backfill_failures: AtomicU64,
    writes: AtomicU64,
    deletes: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// GETs served from a cache slot
    pub hits: u64,
    /// GETs that found no slot and went to the origin
    pub misses: u64,
    /// Misses the origin could not satisfy
    pub origin_failures: u64,
    /// Fetched payloads that could not be written back
    pub backfill_failures: u64,
    /// Successful PUTs
    pub writes: u64,
    /// Successful DELETEs
    pub deletes: u64,
}

impl StatsSnapshot {
    /// Returns hits / (hits + misses), or 0.0 if no GETs have been served.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_origin_failure(&self) {
        self.origin_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_backfill_failure(&self) {
        self.backfill_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            origin_failures: self.origin_failures.load(Ordering::Relaxed),
            backfill_failures: self.backfill_failures.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
        }
    }
}
