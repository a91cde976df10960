//! Datatable snapshots and the records that store them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// The result of a filtered record fetch: columns, the fetched records, and
/// the total number of matching records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Column definitions as returned by the data provider.
    #[serde(default)]
    pub columns: Vec<Value>,

    /// Records fetched so far.
    #[serde(default)]
    pub records: Vec<Value>,

    /// Number of records matching the filters on the server, exactly as the
    /// provider reported it.
    #[serde(default = "zero_count")]
    pub total_count: Number,
}

fn zero_count() -> Number {
    Number::from(0)
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), 0)
    }
}

impl Snapshot {
    /// Creates a snapshot from its parts.
    pub fn new(columns: Vec<Value>, records: Vec<Value>, total_count: impl Into<Number>) -> Self {
        Self {
            columns,
            records,
            total_count: total_count.into(),
        }
    }

    /// Reads a snapshot from loosely shaped provider output.
    ///
    /// Missing or non-array `columns`/`records` become empty and a missing or
    /// non-numeric `totalCount` becomes zero, so any JSON value is accepted.
    /// A numeric `totalCount` is kept as is, fractional or negative.
    pub fn sanitize(info: &Value) -> Self {
        let array = |key: &str| match info.get(key) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };

        let total_count = match info.get("totalCount") {
            Some(Value::Number(n)) => n.clone(),
            _ => zero_count(),
        };

        Self {
            columns: array("columns"),
            records: array("records"),
            total_count,
        }
    }
}

/// A snapshot as kept in the durable record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    /// Primary key: `ftg:datatable:v1:<subject>:<signature>`.
    pub key: String,

    /// Subject entity the snapshot was fetched for (secondary index).
    #[serde(rename = "sObject")]
    pub subject: String,

    /// The cached snapshot.
    pub payload: Snapshot,

    /// When the snapshot was written (secondary index).
    pub fetched_at: DateTime<Utc>,
}
