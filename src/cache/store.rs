//! Cache Store Module
//!
//! In-memory table of expiring JSON values with lazy, lookup-triggered eviction.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, MAX_KEY_LENGTH};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Key-value table with TTL support.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Lookup statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a value under `key`, expiring `ttl_ms` milliseconds from now.
    ///
    /// An existing entry is overwritten and its creation time reset.
    pub fn set(&mut self, key: impl Into<String>, value: Value, ttl_ms: u64) -> Result<()> {
        let key = key.into();
        validate_key(&key)?;

        self.entries.insert(key, CacheEntry::new(value, ttl_ms));
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    // == Get ==
    /// Retrieves the live value for `key`.
    ///
    /// Entries that are expired or hold no value are removed and reported as
    /// `Expired`; unknown keys are `NotFound`. Both count as misses.
    pub fn get(&mut self, key: &str) -> Result<Value> {
        let now = current_timestamp_ms();
        match self.entries.get(key).filter(|entry| entry.is_live_at(now)) {
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Ok(value)
            }
            None if self.entries.contains_key(key) => {
                self.evict(key);
                self.stats.record_miss();
                Err(CacheError::Expired(key.to_string()))
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    // == Exists ==
    /// Returns whether `key` holds a live value, evicting it otherwise.
    pub fn exists(&mut self, key: &str) -> bool {
        let now = current_timestamp_ms();
        let live = self.entries.get(key).map(|entry| entry.is_live_at(now));
        if live == Some(false) {
            self.evict(key);
        }
        live == Some(true)
    }

    // == Invalidate ==
    /// Removes `key` unconditionally. Returns whether an entry was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    /// Removes every entry, expired or not.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Merge Loaded ==
    /// Adds entries read from a snapshot.
    ///
    /// Dead entries are dropped and keys already present in memory are kept.
    /// Returns the number of entries added.
    pub fn merge_loaded(&mut self, loaded: HashMap<String, CacheEntry>) -> usize {
        let now = current_timestamp_ms();
        let mut added = 0;
        for (key, entry) in loaded {
            if !entry.is_live_at(now) || validate_key(&key).is_err() {
                continue;
            }
            if let std::collections::hash_map::Entry::Vacant(slot) = self.entries.entry(key) {
                slot.insert(entry);
                added += 1;
            }
        }
        self.stats.set_total_entries(self.entries.len());
        added
    }

    // == Snapshot ==
    /// Serializes every live entry as a JSON object keyed by cache key.
    ///
    /// Keys are written in sorted order.
    pub fn snapshot_json(&self) -> Result<Vec<u8>> {
        let now = current_timestamp_ms();
        let live: BTreeMap<&str, &CacheEntry> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_live_at(now))
            .map(|(key, entry)| (key.as_str(), entry))
            .collect();

        serde_json::to_vec(&live).map_err(|source| CacheError::Serialization {
            key: "<snapshot>".to_string(),
            source,
        })
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all dead entries from the table.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live_at(now));

        let count = before - self.entries.len();
        self.stats.record_expired(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    /// Raw access to an entry without expiry checks.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Length ==
    /// Returns the current number of entries, including not yet evicted dead ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict(&mut self, key: &str) {
        self.entries.remove(key);
        self.stats.record_expired(1);
        self.stats.set_total_entries(self.entries.len());
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HOUR_MS: u64 = 60 * 60 * 1000;

    #[test]
    fn test_store_new() {
        let store = CacheStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new();

        store.set("player:abc", json!({"name": "abc"}), HOUR_MS).unwrap();
        let value = store.get("player:abc").unwrap();

        assert_eq!(value, json!({"name": "abc"}));
        assert!(store.exists("player:abc"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new();

        let result = store.get("nonexistent");
        assert!(matches!(result, Err(CacheError::NotFound(_))));
        assert!(!store.exists("nonexistent"));
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new();

        store.set("key1", json!("value1"), HOUR_MS).unwrap();
        store.set("key1", json!("value2"), HOUR_MS).unwrap();

        assert_eq!(store.get("key1").unwrap(), json!("value2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_expired_entry_is_evicted_on_get() {
        let mut store = CacheStore::new();

        store.set("key1", json!("value1"), 0).unwrap();

        let result = store.get("key1");
        assert!(matches!(result, Err(CacheError::Expired(_))));
        assert!(store.entry("key1").is_none(), "expired entry should be removed");

        // Second lookup no longer sees the entry at all
        assert!(matches!(store.get("key1"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_store_expired_entry_is_evicted_on_exists() {
        let mut store = CacheStore::new();

        store.set("key1", json!("value1"), 0).unwrap();

        assert!(!store.exists("key1"));
        assert!(store.is_empty());
        assert_eq!(store.stats().expired_evictions, 1);
    }

    #[test]
    fn test_store_null_value_treated_as_absent() {
        let mut store = CacheStore::new();

        store.set("key1", Value::Null, HOUR_MS).unwrap();

        assert!(!store.exists("key1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_invalidate() {
        let mut store = CacheStore::new();

        store.set("key1", json!(1), HOUR_MS).unwrap();
        assert!(store.invalidate("key1"));
        assert!(!store.invalidate("key1"), "second invalidate is a no-op");
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_clear() {
        let mut store = CacheStore::new();

        store.set("a", json!(1), HOUR_MS).unwrap();
        store.set("b", json!(2), HOUR_MS).unwrap();
        store.clear();

        assert!(store.is_empty());
        assert!(!store.exists("a"));
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new();

        store.set("key1", json!("value1"), HOUR_MS).unwrap();
        store.get("key1").unwrap(); // hit
        let _ = store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = CacheStore::new();

        store.set("key1", json!("value1"), 0).unwrap();
        store.set("key2", json!("value2"), HOUR_MS).unwrap();

        let removed = store.cleanup_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("key2").is_ok());
    }

    #[test]
    fn test_store_snapshot_omits_dead_entries() {
        let mut store = CacheStore::new();

        store.set("live", json!([1, 2, 3]), HOUR_MS).unwrap();
        store.set("dead", json!("gone"), 0).unwrap();

        let snapshot: HashMap<String, CacheEntry> =
            serde_json::from_slice(&store.snapshot_json().unwrap()).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["live"].value, json!([1, 2, 3]));
    }

    #[test]
    fn test_store_merge_loaded_keeps_memory_entries() {
        let mut store = CacheStore::new();
        store.set("shared", json!("memory"), HOUR_MS).unwrap();

        let mut loaded = HashMap::new();
        loaded.insert("shared".to_string(), CacheEntry::new(json!("disk"), HOUR_MS));
        loaded.insert("fresh".to_string(), CacheEntry::new(json!("disk"), HOUR_MS));
        loaded.insert("stale".to_string(), CacheEntry::new(json!("disk"), 0));

        let added = store.merge_loaded(loaded);
        assert_eq!(added, 1);
        assert_eq!(store.get("shared").unwrap(), json!("memory"));
        assert_eq!(store.get("fresh").unwrap(), json!("disk"));
        assert!(store.entry("stale").is_none());
    }

    #[test]
    fn test_store_key_validation() {
        let mut store = CacheStore::new();
        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);

        assert!(matches!(
            store.set(long_key, json!(1), HOUR_MS),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(matches!(
            store.set("", json!(1), HOUR_MS),
            Err(CacheError::InvalidKey(_))
        ));
    }
}
