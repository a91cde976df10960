//! File-backed storage tiers with XDG path support.
//!
//! Both stores keep a JSON object mapping keys to values in a single file:
//!
//! - [`FileRecordStore`]: snapshots at `~/.cache/rp/records.json`, using
//!   `tokio::fs` so reads and writes do not block the runtime
//! - [`FileSessionStore`]: signatures at `$XDG_RUNTIME_DIR/rp/session.json`
//!   (falling back to the cache directory), using `std::fs`
//!
//! Writes go to a temporary file that is then renamed over the target, so a
//! crash mid-write leaves the previous contents in place.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::snapshot::CacheRecord;
use crate::storage::{select_subject, CacheStoreError, RecordStore, Result, SessionStore};

/// Default record file name.
const RECORDS_FILENAME: &str = "records.json";

/// Default session file name.
const SESSION_FILENAME: &str = "session.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "rp";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or(CacheStoreError::NoCacheDir)
}

/// Returns the default directory for cache files.
///
/// On Unix: `~/.cache/rp`
/// On macOS: `~/Library/Caches/rp`
/// On Windows: `C:\Users\<User>\AppData\Local\rp\cache`
pub fn default_cache_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.cache_dir().to_path_buf())
}

/// Returns the default directory for session-scoped files.
///
/// Uses the runtime directory where the platform has one (it is cleared on
/// logout), otherwise the cache directory.
pub fn default_session_dir() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    Ok(dirs
        .runtime_dir()
        .unwrap_or_else(|| dirs.cache_dir())
        .to_path_buf())
}

/// Persistent [`RecordStore`] backed by a JSON file.
///
/// Writes within one process are serialized; separate processes sharing the
/// file are not coordinated beyond the atomic rename.
#[derive(Debug)]
pub struct FileRecordStore {
    /// Path to the record file.
    path: PathBuf,
    /// Held across each read-modify-write.
    write_lock: Mutex<()>,
}

impl FileRecordStore {
    /// Creates a store at the default XDG path.
    ///
    /// # Errors
    ///
    /// Returns `CacheStoreError::NoCacheDir` if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(default_cache_dir()?.join(RECORDS_FILENAME)))
    }

    /// Creates a store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a store inside `dir` using the default file name.
    pub fn in_dir(dir: &Path) -> Self {
        Self::with_path(dir.join(RECORDS_FILENAME))
    }

    /// Returns the path to the record file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads every record. A missing file is an empty store.
    async fn load_all(&self) -> Result<BTreeMap<String, CacheRecord>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(CacheStoreError::ReadError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Writes every record atomically, creating the parent directory.
    async fn save_all(&self, records: &BTreeMap<String, CacheRecord>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheStoreError::CreateDirError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let json = serde_json::to_string_pretty(records)?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &json)
            .await
            .map_err(|e| CacheStoreError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| CacheStoreError::WriteError {
                path: self.path.clone(),
                source: e,
            })?;

        Ok(())
    }
}

impl RecordStore for FileRecordStore {
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>> {
        let mut records = self.load_all().await?;
        Ok(records.remove(key))
    }

    async fn put(&self, record: CacheRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load_all().await?;
        records.insert(record.key.clone(), record);
        self.save_all(&records).await
    }

    async fn by_subject(&self, subject: &str) -> Result<Vec<CacheRecord>> {
        let records = self.load_all().await?;
        Ok(select_subject(records.values(), subject))
    }
}

/// [`SessionStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    /// Path to the session file.
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store at the default session path.
    ///
    /// # Errors
    ///
    /// Returns `CacheStoreError::NoCacheDir` if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(default_session_dir()?.join(SESSION_FILENAME)))
    }

    /// Creates a store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Creates a store inside `dir` using the default file name.
    pub fn in_dir(dir: &Path) -> Self {
        Self::with_path(dir.join(SESSION_FILENAME))
    }

    /// Returns the path to the session file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Deletes the session file, ending the session.
    ///
    /// Does not return an error if the file doesn't exist.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheStoreError::WriteError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        read_json_map(&self.path)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::debug!(
                    path = %self.path.display(),
                    error = %e,
                    "session store unreadable"
                );
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        write_json_atomic(&self.path, &entries)
    }
}

fn read_json_map<V: DeserializeOwned>(path: &Path) -> Result<BTreeMap<String, V>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(CacheStoreError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CacheStoreError::CreateDirError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let json = serde_json::to_string_pretty(value)?;

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, &json).map_err(|e| CacheStoreError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;
    fs::rename(&temp_path, path).map_err(|e| CacheStoreError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use chrono::Utc;
    use tempfile::tempdir;

    fn record(key: &str, subject: &str) -> CacheRecord {
        CacheRecord {
            key: key.to_string(),
            subject: subject.to_string(),
            payload: Snapshot::new(vec![], vec![serde_json::json!({"Id": key})], 1),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_default_paths_use_app_name() {
        if let Ok(dir) = default_cache_dir() {
            assert!(dir.to_string_lossy().contains("rp"));
        }
    }

    #[tokio::test]
    async fn test_record_store_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileRecordStore::in_dir(dir.path());
        assert!(store.get("x").await.unwrap().is_none());
        assert!(store.by_subject("Account").await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_record_store_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let store = FileRecordStore::with_path(dir.path().join("a/b/records.json"));
        store.put(record("k1", "Account")).await.unwrap();
        assert!(store.path().exists());
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_record_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        FileRecordStore::in_dir(dir.path())
            .put(record("k1", "Account"))
            .await
            .unwrap();

        let reopened = FileRecordStore::in_dir(dir.path());
        let loaded = reopened.get("k1").await.unwrap().unwrap();
        assert_eq!(loaded.payload.records[0]["Id"], "k1");
    }

    #[tokio::test]
    async fn test_record_store_corrupt_file() {
        let dir = tempdir().unwrap();
        let store = FileRecordStore::in_dir(dir.path());
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(
            store.get("k").await,
            Err(CacheStoreError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_record_store_concurrent_puts_keep_all_keys() {
        let dir = tempdir().unwrap();
        let store = std::sync::Arc::new(FileRecordStore::in_dir(dir.path()));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.put(record(&format!("k{i}"), "Account")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.by_subject("Account").await.unwrap().len(), 8);
    }

    #[test]
    fn test_session_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::in_dir(dir.path());
        assert_eq!(store.get("sig:Account"), None);

        store.set("sig:Account", "abc").unwrap();
        store.set("sig:Contact", "def").unwrap();
        assert_eq!(store.get("sig:Account").as_deref(), Some("abc"));

        let reopened = FileSessionStore::in_dir(dir.path());
        assert_eq!(reopened.get("sig:Contact").as_deref(), Some("def"));
    }

    #[test]
    fn test_session_store_unreadable_is_miss() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::in_dir(dir.path());
        fs::write(store.path(), "{broken").unwrap();
        assert_eq!(store.get("k"), None);
        assert!(store.set("k", "v").is_err());
    }

    #[test]
    fn test_session_store_clear() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::in_dir(dir.path());
        store.clear().unwrap();
        store.set("k", "v").unwrap();
        store.clear().unwrap();
        assert_eq!(store.get("k"), None);
    }
}
