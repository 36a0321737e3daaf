//! Local filesystem storage implementation.
//!
//! Keeps the demo user's favorites in one JSON document. Every mutation is a
//! read-modify-write cycle serialized by a mutex and committed atomically
//! (temp file, then rename).
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! └── favorites.json        # Vec<FavoriteRecord>, insertion order
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::NormalizedJob;
use crate::storage::{FavoriteRecord, FavoriteStore};

const FAVORITES_KEY: &str = "favorites.json";

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn load_records(&self) -> Result<Vec<FavoriteRecord>> {
        Ok(self.read_json(FAVORITES_KEY).await?.unwrap_or_default())
    }
}

#[async_trait]
impl FavoriteStore for LocalStorage {
    async fn add(&self, mut job: NormalizedJob) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut records = self.load_records().await?;
        if records.iter().any(|r| r.job.id == job.id) {
            return Ok(false);
        }

        job.is_favorite = true;
        log::info!("Adding favorite {}", job.id);
        records.push(FavoriteRecord {
            job,
            created_at: Utc::now(),
        });
        self.write_json(FAVORITES_KEY, &records).await?;
        Ok(true)
    }

    async fn remove(&self, job_id: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut records = self.load_records().await?;
        let before = records.len();
        records.retain(|r| r.job.id != job_id);
        if records.len() == before {
            return Ok(false);
        }

        log::info!("Removed favorite {}", job_id);
        self.write_json(FAVORITES_KEY, &records).await?;
        Ok(true)
    }

    async fn contains(&self, job_id: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        Ok(self.load_records().await?.iter().any(|r| r.job.id == job_id))
    }

    async fn list(&self) -> Result<Vec<FavoriteRecord>> {
        let _guard = self.lock.lock().await;
        let mut records = self.load_records().await?;
        // Reversed first so equal timestamps stay newest-inserted first.
        records.reverse();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn job(id: &str) -> NormalizedJob {
        NormalizedJob {
            id: id.to_string(),
            provider_id: id.to_string(),
            title: format!("Job {id}"),
            ..NormalizedJob::default()
        }
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write_bytes("test.txt", b"hello").await.unwrap();
        let data = storage.read_bytes("test.txt").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let data = storage.read_bytes("nope.txt").await.unwrap();
        assert!(data.is_none());
        assert!(storage.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("nested"));

        assert!(storage.add(job("1")).await.unwrap());
        assert!(!storage.add(job("1")).await.unwrap());

        let records = storage.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].job.is_favorite);
        assert!(storage.contains("1").await.unwrap());
        assert!(!storage.contains("2").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        for id in ["a", "b", "c"] {
            storage.add(job(id)).await.unwrap();
        }
        let ids: Vec<String> = storage
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.job.id)
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_remove() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.add(job("1")).await.unwrap();
        assert!(storage.remove("1").await.unwrap());
        assert!(!storage.remove("1").await.unwrap());
        assert!(storage.ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persists_across_instances() {
        let tmp = TempDir::new().unwrap();
        LocalStorage::new(tmp.path()).add(job("7")).await.unwrap();

        let reopened = LocalStorage::new(tmp.path());
        assert!(reopened.ids().await.unwrap().contains("7"));
        assert!(!tmp.path().join("favorites.tmp").exists());
    }
}
