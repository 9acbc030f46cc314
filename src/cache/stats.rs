//! Cache Statistics Module
//!
//! Counts lookups that hit or missed and entries dropped because they expired.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache lookups and expiry evictions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups on absent, expired or valueless keys
    pub misses: u64,
    /// Entries removed because they were found expired (lazily or by a sweep)
    pub expired_evictions: u64,
    /// Current number of entries in the table
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Adds `count` expired entries to the eviction counter.
    pub fn record_expired(&mut self, count: usize) {
        self.expired_evictions += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
