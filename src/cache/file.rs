//! Cache File Module
//!
//! Reads and atomically rewrites the JSON snapshot backing the cache.

use std::collections::HashMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

/// Table layout of a snapshot file.
pub type Snapshot = HashMap<String, CacheEntry>;

// == Cache File ==
/// Location of the cache snapshot on disk.
#[derive(Debug, Clone)]
pub struct CacheFile {
    path: PathBuf,
}

impl CacheFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // == Read ==
    /// Reads the snapshot, creating the file with an empty table when missing.
    ///
    /// A file that exists but does not parse is reported as `Corruption` and
    /// left untouched.
    pub async fn read_or_create(&self) -> Result<Snapshot> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("Creating new empty cache at {}", self.path.display());
                self.write_atomic(b"{}").await?;
                return Ok(Snapshot::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_slice(&bytes).map_err(|source| CacheError::Corruption {
            path: self.path.clone(),
            source,
        })
    }

    // == Write ==
    /// Replaces the snapshot with `bytes`.
    ///
    /// The data is written and synced to a sibling `.tmp` file which is then
    /// renamed over the target, so readers only ever see a complete file.
    pub async fn write_atomic(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let tmp = self.temp_path();
        let mut file = fs::File::create(&tmp)
            .await
            .map_err(|source| self.io_error(source))?;
        file.write_all(bytes)
            .await
            .map_err(|source| self.io_error(source))?;
        file.sync_all()
            .await
            .map_err(|source| self.io_error(source))?;
        drop(file);

        fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.io_error(source))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, source: std::io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_file() -> (CacheFile, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let file = CacheFile::new(dir.path().join("cache.json"));
        (file, dir)
    }

    #[tokio::test]
    async fn test_missing_file_is_created_empty() {
        let (file, _dir) = test_file();

        let snapshot = file.read_or_create().await.unwrap();

        assert!(snapshot.is_empty());
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (file, _dir) = test_file();
        let body = br#"{"k":{"value":[1,2],"expiresAfter":99,"lastUpdated":1}}"#;

        file.write_atomic(body).await.unwrap();
        let snapshot = file.read_or_create().await.unwrap();

        assert_eq!(snapshot["k"].value, json!([1, 2]));
        assert_eq!(snapshot["k"].expires_at, 99);
        assert!(!file.temp_path().exists(), "temp file should be renamed away");
    }

    #[tokio::test]
    async fn test_corrupted_file_is_reported_and_kept() {
        let (file, _dir) = test_file();
        std::fs::write(file.path(), "{not json").unwrap();

        let result = file.read_or_create().await;

        assert!(matches!(result, Err(CacheError::Corruption { .. })));
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "{not json");
    }

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let file = CacheFile::new(dir.path().join("nested").join("cache.json"));

        file.write_atomic(b"{}").await.unwrap();

        assert!(file.path().exists());
    }
}
