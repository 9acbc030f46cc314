//! Shared Cache Module
//!
//! Process-wide handle over the cache table and its snapshot file.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::{debug, info, warn};

use crate::cache::{CacheFile, CacheStats, CacheStore};
use crate::error::{CacheError, Result};

// == Shared Cache ==
/// Cloneable handle to the cache table, its backing file and load state.
///
/// All mutations go through the inner `RwLock`; the lock is never held while a
/// producer passed to [`SharedCache::cached`] runs.
#[derive(Debug, Clone)]
pub struct SharedCache {
    store: Arc<RwLock<CacheStore>>,
    file: Arc<CacheFile>,
    loaded: Arc<OnceCell<()>>,
    persist_lock: Arc<Mutex<()>>,
}

impl SharedCache {
    /// Creates an empty cache backed by the snapshot at `path`.
    ///
    /// Nothing is read until [`SharedCache::load`] is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new())),
            file: Arc::new(CacheFile::new(path)),
            loaded: Arc::new(OnceCell::new()),
            persist_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn file(&self) -> &CacheFile {
        &self.file
    }

    // == Load ==
    /// Loads the snapshot into memory, at most once per handle.
    ///
    /// Later calls skip the disk entirely. Returns the number of entries in the
    /// table afterwards.
    pub async fn load(&self) -> Result<usize> {
        self.loaded
            .get_or_try_init(|| async move {
                let snapshot = self.file.read_or_create().await?;
                let on_disk = snapshot.len();
                let added = self.store.write().await.merge_loaded(snapshot);
                info!(
                    "Loaded cache from {}: {} live of {} stored entries",
                    self.file.path().display(),
                    added,
                    on_disk
                );
                Ok::<(), CacheError>(())
            })
            .await?;

        Ok(self.store.read().await.len())
    }

    // == Persist ==
    /// Writes all live entries to the snapshot file.
    ///
    /// Loads first if that has not happened yet, so an early persist never
    /// replaces an unread snapshot. Returns the number of bytes written.
    pub async fn persist(&self) -> Result<usize> {
        self.load().await?;
        let _guard = self.persist_lock.lock().await;

        let bytes = self.store.read().await.snapshot_json()?;
        self.file.write_atomic(&bytes).await?;
        debug!(
            "Persisted cache to {} ({} bytes)",
            self.file.path().display(),
            bytes.len()
        );
        Ok(bytes.len())
    }

    // == Table Operations ==
    pub async fn get(&self, key: &str) -> Result<Value> {
        self.store.write().await.get(key)
    }

    pub async fn set(&self, key: &str, value: Value, ttl_ms: u64) -> Result<()> {
        self.store.write().await.set(key, value, ttl_ms)
    }

    pub async fn exists(&self, key: &str) -> bool {
        self.store.write().await.exists(key)
    }

    pub async fn invalidate(&self, key: &str) -> bool {
        self.store.write().await.invalidate(key)
    }

    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    pub async fn cleanup_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Typed Access ==
    /// Reads `key` as `T`.
    ///
    /// A stored value that no longer matches `T` is invalidated and reported as
    /// absent.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key).await.ok()?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                warn!("Discarding cached value for {} with unexpected shape: {}", key, err);
                self.invalidate(key).await;
                None
            }
        }
    }

    /// Stores `value` under `key` for `ttl_ms` milliseconds.
    pub async fn set_as<T: Serialize>(&self, key: &str, value: &T, ttl_ms: u64) -> Result<()> {
        let json = serde_json::to_value(value).map_err(|source| CacheError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.set(key, json, ttl_ms).await
    }

    // == Cached ==
    /// Returns the cached `T` under `key`, or runs `producer` and caches its
    /// result for `ttl_ms`.
    ///
    /// A failing producer leaves the cache untouched.
    pub async fn cached<T, E, F, Fut>(
        &self,
        key: &str,
        ttl_ms: u64,
        producer: F,
    ) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(hit) = self.get_as::<T>(key).await {
            debug!("Cache hit for {}", key);
            return Ok(hit);
        }

        let value = producer().await?;
        self.set_as(key, &value, ttl_ms).await?;
        Ok(value)
    }
}
