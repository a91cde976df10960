//! Signature and cache output formatting.

use owo_colors::OwoColorize;
use review_cache_rs::{CacheRecord, Signature, Snapshot};
use serde::Serialize;
use serde_json::Number;

#[derive(Serialize)]
struct SignatureOutput<'a> {
    subject: &'a str,
    signature: &'a str,
    key: &'a str,
}

#[derive(Serialize)]
struct LookupOutput<'a> {
    hit: bool,
    subject: &'a str,
    signature: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<&'a Snapshot>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredOutput<'a> {
    key: &'a str,
    signature: &'a str,
    record_count: usize,
    total_count: &'a Number,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryOutput<'a> {
    key: &'a str,
    fetched_at: String,
    record_count: usize,
    total_count: &'a Number,
}

/// Formats a computed signature as JSON.
pub fn format_signature_json(
    subject: &str,
    signature: &Signature,
    key: &str,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SignatureOutput {
        subject,
        signature: signature.as_str(),
        key,
    })
}

/// Formats a cache lookup as JSON.
pub fn format_lookup_json(
    subject: &str,
    signature: &Signature,
    snapshot: Option<&Snapshot>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&LookupOutput {
        hit: snapshot.is_some(),
        subject,
        signature: signature.as_str(),
        snapshot,
    })
}

/// Formats a cache lookup for humans.
pub fn format_lookup_table(
    subject: &str,
    signature: &Signature,
    snapshot: Option<&Snapshot>,
    use_colors: bool,
) -> String {
    match snapshot {
        Some(s) => {
            let status = if use_colors {
                "hit".green().to_string()
            } else {
                "hit".to_string()
            };
            format!(
                "Cache {status}: {subject} [{signature}] {} of {} records",
                s.records.len(),
                s.total_count
            )
        }
        None => {
            let status = if use_colors {
                "miss".yellow().to_string()
            } else {
                "miss".to_string()
            };
            format!("Cache {status}: {subject} [{signature}]")
        }
    }
}

/// Formats the result of a cache write as JSON.
pub fn format_stored_json(
    key: &str,
    signature: &Signature,
    snapshot: &Snapshot,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&StoredOutput {
        key,
        signature: signature.as_str(),
        record_count: snapshot.records.len(),
        total_count: &snapshot.total_count,
    })
}

/// Formats cache records as JSON.
pub fn format_entries_json(entries: &[CacheRecord]) -> Result<String, serde_json::Error> {
    let output: Vec<EntryOutput> = entries
        .iter()
        .map(|e| EntryOutput {
            key: &e.key,
            fetched_at: e.fetched_at.to_rfc3339(),
            record_count: e.payload.records.len(),
            total_count: &e.payload.total_count,
        })
        .collect();
    serde_json::to_string_pretty(&output)
}

/// Formats cache records as a table.
pub fn format_entries_table(subject: &str, entries: &[CacheRecord], use_colors: bool) -> String {
    if entries.is_empty() {
        return format!("No cached datatables for {subject}.\n");
    }

    let mut output = String::new();
    let header = format!("{:<20} {:>8} {:>8}  {}", "Fetched", "Records", "Total", "Key");
    if use_colors {
        output.push_str(&format!("{}\n", header.bold()));
    } else {
        output.push_str(&format!("{header}\n"));
    }

    for entry in entries {
        let fetched = entry.fetched_at.format("%Y-%m-%d %H:%M:%S").to_string();
        let fetched = if use_colors {
            fetched.dimmed().to_string()
        } else {
            fetched
        };
        output.push_str(&format!(
            "{:<20} {:>8} {:>8}  {}\n",
            fetched,
            entry.payload.records.len(),
            entry.payload.total_count.to_string(),
            entry.key
        ));
    }

    output
}
