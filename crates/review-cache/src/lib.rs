//! Client-side cache for filtered datatable snapshots.
//!
//! Snapshots are keyed by a stable [`Signature`] of the [`FilterSpec`] that
//! produced them. Two storage tiers back the cache:
//!
//! - a [`SessionStore`] holding the last good signature per subject
//! - a [`RecordStore`] holding the snapshots themselves
//!
//! In-memory and file-backed implementations of both are provided.
//!
//! # Example
//!
//! ```
//! use review_cache_rs::{DatatableCache, MemoryRecordStore, MemorySessionStore, Snapshot};
//! use review_filter_rs::{FieldType, FilterCondition, FilterSpec, Operator};
//!
//! # tokio_test_block(async {
//! let cache = DatatableCache::new(MemorySessionStore::new(), MemoryRecordStore::new());
//! let spec = FilterSpec::new(
//!     "Account",
//!     vec![FilterCondition::with("Name", FieldType::Text, Operator::Equals, "Acme")],
//!     "0",
//! );
//!
//! assert!(cache.lookup(&spec).await?.is_none());
//! cache.store(&spec, &Snapshot::default()).await?;
//! assert!(cache.lookup(&spec).await?.is_some());
//! # Ok::<(), review_cache_rs::CacheError>(())
//! # });
//! # fn tokio_test_block<F: std::future::Future<Output = Result<(), review_cache_rs::CacheError>>>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f).unwrap();
//! # }
//! ```
//!
//! [`FilterSpec`]: review_filter_rs::FilterSpec

pub mod datatable;
pub mod signature;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use datatable::{
    cache_key, session_key, CacheError, CacheResult, CacheSource, DatatableCache, Fetched,
    KEY_PREFIX, SESSION_PREFIX,
};
pub use signature::{compute_signature, Signature};
pub use snapshot::{CacheRecord, Snapshot};
pub use storage::{
    CacheStoreError, MemoryRecordStore, MemorySessionStore, RecordStore, SessionStore,
};
pub use store::{default_cache_dir, default_session_dir, FileRecordStore, FileSessionStore};
