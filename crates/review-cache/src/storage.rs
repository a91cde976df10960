//! The two storage tiers behind the datatable cache.
//!
//! - [`SessionStore`]: a small synchronous key/string store holding the last
//!   good signature per subject. It only needs to live as long as a session.
//! - [`RecordStore`]: an asynchronous key/record store holding full
//!   snapshots, queryable by subject.
//!
//! In-memory implementations live here; file-backed ones are in
//! [`crate::store`].

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::snapshot::CacheRecord;

/// Errors that can occur during cache storage operations.
#[derive(Debug, Error)]
pub enum CacheStoreError {
    /// Failed to determine XDG cache directory.
    #[error("failed to determine cache directory: no valid home directory found")]
    NoCacheDir,

    /// I/O error during file read.
    #[error("failed to read cache file '{path}': {source}")]
    ReadError {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during file write.
    #[error("failed to write cache file '{path}': {source}")]
    WriteError {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during directory creation.
    #[error("failed to create cache directory '{path}': {source}")]
    CreateDirError {
        /// The directory path that failed to create.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backing store cannot be used.
    #[error("cache store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for cache store operations.
pub type Result<T> = std::result::Result<T, CacheStoreError>;

/// Synchronous string store for the last known good signature per subject.
pub trait SessionStore: Send + Sync {
    /// Returns the value under `key`. Read failures count as absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Asynchronous store of cache records keyed by [`CacheRecord::key`].
///
/// Overlapping writes to the same key are not coordinated; the last one to
/// complete wins.
pub trait RecordStore: Send + Sync {
    /// Returns the record under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<CacheRecord>>> + Send;

    /// Inserts or replaces a record.
    fn put(&self, record: CacheRecord) -> impl Future<Output = Result<()>> + Send;

    /// Returns every record for `subject`, oldest `fetched_at` first.
    fn by_subject(&self, subject: &str) -> impl Future<Output = Result<Vec<CacheRecord>>> + Send;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory [`SessionStore`].
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// In-memory [`RecordStore`].
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, CacheRecord>>,
}

impl MemoryRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    /// Returns true if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryRecordStore {
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>> {
        Ok(lock(&self.records).get(key).cloned())
    }

    async fn put(&self, record: CacheRecord) -> Result<()> {
        lock(&self.records).insert(record.key.clone(), record);
        Ok(())
    }

    async fn by_subject(&self, subject: &str) -> Result<Vec<CacheRecord>> {
        let records = lock(&self.records);
        Ok(select_subject(records.values(), subject))
    }
}

/// Filters `records` to `subject` and orders them by write time.
pub(crate) fn select_subject<'a>(
    records: impl Iterator<Item = &'a CacheRecord>,
    subject: &str,
) -> Vec<CacheRecord> {
    let mut matching: Vec<CacheRecord> = records
        .filter(|r| r.subject == subject)
        .cloned()
        .collect();
    matching.sort_by(|a, b| a.fetched_at.cmp(&b.fetched_at).then_with(|| a.key.cmp(&b.key)));
    matching
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use chrono::{Duration, Utc};
    use serde_json::Number;

    fn record(key: &str, subject: &str, age_secs: i64) -> CacheRecord {
        CacheRecord {
            key: key.to_string(),
            subject: subject.to_string(),
            payload: Snapshot::default(),
            fetched_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[test]
    fn test_memory_session_store() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v2"));
        store.clear();
        assert_eq!(store.get("k"), None);
    }

    #[tokio::test]
    async fn test_memory_record_store_put_get() {
        let store = MemoryRecordStore::new();
        assert!(store.is_empty());
        store.put(record("a", "Account", 0)).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").await.unwrap().unwrap().subject, "Account");
        assert!(store.get("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_record_store_last_write_wins() {
        let store = MemoryRecordStore::new();
        let mut first = record("a", "Account", 0);
        first.payload.total_count = Number::from(1);
        let mut second = record("a", "Account", 0);
        second.payload.total_count = Number::from(2);

        store.put(first).await.unwrap();
        store.put(second).await.unwrap();
        assert_eq!(store.len(), 1);
        let stored = store.get("a").await.unwrap().unwrap();
        assert_eq!(stored.payload.total_count, Number::from(2));
    }

    #[tokio::test]
    async fn test_by_subject_orders_by_fetched_at() {
        let store = MemoryRecordStore::new();
        store.put(record("new", "Account", 1)).await.unwrap();
        store.put(record("old", "Account", 100)).await.unwrap();
        store.put(record("other", "Contact", 50)).await.unwrap();

        let keys: Vec<String> = store
            .by_subject("Account")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.key)
            .collect();
        assert_eq!(keys, vec!["old", "new"]);
        assert!(store.by_subject("Lead").await.unwrap().is_empty());
    }
}
