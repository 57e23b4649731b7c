//! Flat-File Order Cache
//!
//! Implements [`OrderStore`] over a single JSON document on local disk
//! with schema `{"orders": [...], "lastUpdated": ...}`.
//!
//! Writes are serialized behind an async single-writer lock and go
//! through a temp file in the same directory followed by an atomic
//! rename, so readers never observe a half-written document and
//! concurrent endpoint requests cannot tear the file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;

use crate::application::ports::{OrderStore, StoreError};
use crate::domain::orders::{CacheDocument, Order};

/// Serialization view over borrowed orders, to avoid cloning the full
/// order set on every write.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CacheDocumentView<'a> {
    orders: &'a [Order],
    last_updated: Option<DateTime<Utc>>,
}

/// JSON flat-file store for the order cache document.
pub struct FileOrderCache {
    path: PathBuf,
    tmp_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileOrderCache {
    /// Create a store over the given cache file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tmp_path = tmp_path_for(&path);
        Self {
            path,
            tmp_path,
            write_lock: Mutex::new(()),
        }
    }

    /// The cache file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_atomic(&self, json: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        fs::write(&self.tmp_path, json).await?;
        fs::rename(&self.tmp_path, &self.path).await?;
        Ok(())
    }
}

/// Sibling temp path used for atomic replacement.
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map_or_else(
        || std::ffi::OsString::from("orders_data.json"),
        std::ffi::OsStr::to_os_string,
    );
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl OrderStore for FileOrderCache {
    async fn ensure_initialized(&self) {
        match fs::try_exists(&self.path).await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "could not probe cache file, continuing without cache");
                return;
            }
        }

        let empty = CacheDocumentView {
            orders: &[],
            last_updated: None,
        };
        let json = match serde_json::to_string_pretty(&empty) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "could not serialize empty cache document");
                return;
            }
        };

        match self.write_atomic(&json).await {
            Ok(()) => tracing::info!(path = %self.path.display(), "created new orders cache file"),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "could not create cache file, continuing without cache");
            }
        }
    }

    async fn read(&self) -> Result<CacheDocument, StoreError> {
        let contents = fs::read_to_string(&self.path).await?;
        let doc = serde_json::from_str(&contents)?;
        Ok(doc)
    }

    async fn write(&self, orders: &[Order]) -> Result<(), StoreError> {
        let doc = CacheDocumentView {
            orders,
            last_updated: Some(Utc::now()),
        };
        let json = serde_json::to_string_pretty(&doc)?;
        self.write_atomic(&json).await?;
        tracing::debug!(path = %self.path.display(), orders = orders.len(), "cache file updated");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn orders(ids: std::ops::RangeInclusive<i64>) -> Vec<Order> {
        ids.map(|id| Order::new(json!({"id": id}))).collect()
    }

    #[tokio::test]
    async fn ensure_initialized_creates_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileOrderCache::new(dir.path().join("orders_data.json"));

        cache.ensure_initialized().await;

        let doc = cache.read().await.unwrap();
        assert!(doc.orders.is_empty());
        assert!(doc.last_updated.is_none());
    }

    #[tokio::test]
    async fn ensure_initialized_never_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileOrderCache::new(dir.path().join("orders_data.json"));

        cache.write(&orders(1..=3)).await.unwrap();
        cache.ensure_initialized().await;

        let doc = cache.read().await.unwrap();
        assert_eq!(doc.orders.len(), 3);
    }

    #[tokio::test]
    async fn read_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileOrderCache::new(dir.path().join("missing.json"));

        assert!(matches!(cache.read().await, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn read_fails_for_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders_data.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = FileOrderCache::new(path);
        assert!(matches!(cache.read().await, Err(StoreError::Malformed(_))));
    }

    #[tokio::test]
    async fn write_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileOrderCache::new(dir.path().join("orders_data.json"));

        let before = Utc::now();
        cache.write(&orders(1..=5)).await.unwrap();
        let doc = cache.read().await.unwrap();

        assert_eq!(doc.orders, orders(1..=5));
        let written_at = doc.last_updated.unwrap();
        assert!(written_at >= before && written_at <= Utc::now());
    }

    #[tokio::test]
    async fn write_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileOrderCache::new(dir.path().join("orders_data.json"));

        cache.write(&orders(1..=10)).await.unwrap();
        cache.write(&orders(11..=12)).await.unwrap();

        let doc = cache.read().await.unwrap();
        let ids: Vec<i64> = doc.orders.iter().filter_map(Order::id).collect();
        assert_eq!(ids, vec![11, 12]);
    }

    #[tokio::test]
    async fn write_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders_data.json");
        let cache = FileOrderCache::new(path.clone());

        cache.write(&orders(1..=1)).await.unwrap();

        assert!(path.exists());
        assert!(!tmp_path_for(&path).exists());
    }

    #[tokio::test]
    async fn write_to_unwritable_location_fails_without_panicking() {
        let cache = FileOrderCache::new("/nonexistent-dir/orders_data.json");
        assert!(cache.write(&orders(1..=1)).await.is_err());
    }

    #[test]
    fn tmp_path_is_a_sibling() {
        let tmp = tmp_path_for(Path::new("/var/data/orders_data.json"));
        assert_eq!(tmp, PathBuf::from("/var/data/orders_data.json.tmp"));
    }
}
