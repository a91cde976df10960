//! Signature-keyed cache of datatable snapshots.
//!
//! A snapshot is stored durably under `ftg:datatable:v1:<subject>:<signature>`,
//! and the session store remembers the last signature written for each
//! subject under `ftg:datatable:filtersig:<subject>`. A lookup only hits when
//! the current spec's signature matches that remembered signature and the
//! durable record is still present.

use std::future::Future;

use chrono::Utc;
use review_filter_rs::FilterSpec;
use thiserror::Error;

use crate::signature::{compute_signature, Signature};
use crate::snapshot::{CacheRecord, Snapshot};
use crate::storage::{CacheStoreError, RecordStore, SessionStore};

/// Prefix of the session key holding the last signature per subject.
pub const SESSION_PREFIX: &str = "ftg:datatable:filtersig:";

/// Prefix of durable snapshot keys.
pub const KEY_PREFIX: &str = "ftg:datatable:v1:";

/// Errors from the datatable cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A storage tier failed.
    #[error(transparent)]
    Store(#[from] CacheStoreError),
}

/// Result type for datatable cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Returns the durable key for `subject` and `signature`.
pub fn cache_key(subject: &str, signature: &Signature) -> String {
    format!("{KEY_PREFIX}{subject}:{signature}")
}

/// Returns the session key for `subject`.
pub fn session_key(subject: &str) -> String {
    format!("{SESSION_PREFIX}{subject}")
}

/// Where a snapshot returned by [`DatatableCache::get_or_fetch`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
    /// Served from the cache.
    Cache,
    /// Produced by the fetcher.
    Network,
}

/// A snapshot together with its source.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    /// The snapshot.
    pub snapshot: Snapshot,
    /// Where it came from.
    pub source: CacheSource,
}

/// Datatable cache over a session tier and a durable tier.
pub struct DatatableCache<S: SessionStore, R: RecordStore> {
    session: S,
    records: R,
}

impl<S: SessionStore, R: RecordStore> DatatableCache<S, R> {
    /// Creates a cache over the given stores.
    pub fn new(session: S, records: R) -> Self {
        Self { session, records }
    }

    /// Returns the session tier.
    pub fn session_store(&self) -> &S {
        &self.session
    }

    /// Returns the durable tier.
    pub fn record_store(&self) -> &R {
        &self.records
    }

    /// Returns the cached snapshot for `spec`, if the last snapshot stored
    /// for its subject was stored under the same signature.
    ///
    /// An empty subject is always a miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable store cannot be read.
    pub async fn lookup(&self, spec: &FilterSpec) -> CacheResult<Option<Snapshot>> {
        let subject = spec.subject.as_str();
        if subject.is_empty() {
            return Ok(None);
        }

        let signature = compute_signature(spec);
        let last = self.session.get(&session_key(subject));
        if last.as_deref() != Some(signature.as_str()) {
            tracing::debug!(
                %subject,
                %signature,
                last = ?last,
                "datatable cache miss: signature changed"
            );
            return Ok(None);
        }

        let key = cache_key(subject, &signature);
        match self.records.get(&key).await? {
            Some(record) => {
                tracing::debug!(%key, "datatable cache hit");
                Ok(Some(record.payload))
            }
            None => {
                tracing::debug!(%key, "datatable cache miss: no durable record");
                Ok(None)
            }
        }
    }

    /// Stores `snapshot` for `spec` and makes it the subject's current entry.
    ///
    /// The durable record is written before the session pointer, so a failed
    /// durable write never leaves the pointer naming a missing record. An empty
    /// subject is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if either store fails to write.
    pub async fn store(&self, spec: &FilterSpec, snapshot: &Snapshot) -> CacheResult<()> {
        let subject = spec.subject.as_str();
        if subject.is_empty() {
            return Ok(());
        }

        let signature = compute_signature(spec);
        let key = cache_key(subject, &signature);
        let record = CacheRecord {
            key: key.clone(),
            subject: subject.to_string(),
            payload: snapshot.clone(),
            fetched_at: Utc::now(),
        };

        self.records.put(record).await?;
        self.session.set(&session_key(subject), signature.as_str())?;

        tracing::debug!(%key, records = snapshot.records.len(), "datatable cache write");
        Ok(())
    }

    /// Returns every durable record for `subject`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable store cannot be read.
    pub async fn entries_for_subject(&self, subject: &str) -> CacheResult<Vec<CacheRecord>> {
        Ok(self.records.by_subject(subject).await?)
    }

    /// Returns the cached snapshot for `spec`, or runs `fetcher` and caches
    /// its result.
    ///
    /// Cache failures never fail the call: a failed lookup is treated as a
    /// miss and a failed write is logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's error on a miss.
    pub async fn get_or_fetch<F, Fut, E>(&self, spec: &FilterSpec, fetcher: F) -> Result<Fetched, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Snapshot, E>>,
    {
        match self.lookup(spec).await {
            Ok(Some(snapshot)) => {
                return Ok(Fetched {
                    snapshot,
                    source: CacheSource::Cache,
                });
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "datatable cache lookup failed"),
        }

        let snapshot = fetcher().await?;
        if let Err(e) = self.store(spec, &snapshot).await {
            tracing::warn!(error = %e, "datatable cache write failed");
        }

        Ok(Fetched {
            snapshot,
            source: CacheSource::Network,
        })
    }
}
