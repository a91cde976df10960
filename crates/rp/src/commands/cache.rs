//! Cache command implementation.
//!
//! Reads and writes the datatable cache through the file-backed stores.

use std::path::Path;

use review_cache_rs::{
    cache_key, compute_signature, DatatableCache, FileRecordStore, FileSessionStore, Snapshot,
};
use review_filter_rs::FilterSpec;

use super::config::{load_config, CacheConfig};
use super::{read_json, CommandContext, CommandError, Result};
use crate::output::{
    format_entries_json, format_entries_table, format_lookup_json, format_lookup_table,
    format_stored_json,
};

/// The cache as used by the CLI.
pub type FileCache = DatatableCache<FileSessionStore, FileRecordStore>;

/// Opens the file-backed cache described by `config`.
///
/// A configured directory holds both files; otherwise records go to the XDG
/// cache directory and the session file to the runtime directory.
pub fn open_cache(config: &CacheConfig) -> Result<FileCache> {
    let (session, records) = match &config.dir {
        Some(dir) => (FileSessionStore::in_dir(dir), FileRecordStore::in_dir(dir)),
        None => (FileSessionStore::new()?, FileRecordStore::new()?),
    };
    tracing::debug!(
        records = %records.path().display(),
        session = %session.path().display(),
        "opened datatable cache"
    );
    Ok(DatatableCache::new(session, records))
}

fn open_enabled_cache(ctx: &CommandContext) -> Result<FileCache> {
    let config = load_config(ctx.config_path.as_deref())?;
    if !config.cache.is_enabled() {
        return Err(CommandError::Config(
            "cache is disabled ([cache] enabled = false)".to_string(),
        ));
    }
    open_cache(&config.cache)
}

/// Executes the cache get command.
pub async fn execute_get(ctx: &CommandContext, spec_path: &Path) -> Result<()> {
    let spec: FilterSpec = read_json(spec_path)?;
    let cache = open_enabled_cache(ctx)?;

    let signature = compute_signature(&spec);
    let snapshot = cache.lookup(&spec).await?;

    if ctx.json_output {
        println!(
            "{}",
            format_lookup_json(&spec.subject, &signature, snapshot.as_ref())?
        );
    } else if !ctx.quiet {
        println!(
            "{}",
            format_lookup_table(&spec.subject, &signature, snapshot.as_ref(), ctx.use_colors)
        );
    }

    Ok(())
}

/// Executes the cache put command.
pub async fn execute_put(
    ctx: &CommandContext,
    spec_path: &Path,
    datatable_path: &Path,
) -> Result<()> {
    let spec: FilterSpec = read_json(spec_path)?;
    let info: serde_json::Value = read_json(datatable_path)?;
    let snapshot = Snapshot::sanitize(&info);

    if spec.subject.is_empty() {
        return Err(CommandError::Invalid(
            "filter specification has no selectedSObject".to_string(),
        ));
    }

    let cache = open_enabled_cache(ctx)?;
    cache.store(&spec, &snapshot).await?;

    let signature = compute_signature(&spec);
    let key = cache_key(&spec.subject, &signature);

    if ctx.json_output {
        println!("{}", format_stored_json(&key, &signature, &snapshot)?);
    } else if !ctx.quiet {
        println!("Stored {} records under {key}", snapshot.records.len());
    }

    Ok(())
}

/// Executes the cache list command.
pub async fn execute_list(ctx: &CommandContext, subject: &str) -> Result<()> {
    let cache = open_enabled_cache(ctx)?;
    let entries = cache.entries_for_subject(subject).await?;

    if ctx.json_output {
        println!("{}", format_entries_json(&entries)?);
    } else if !ctx.quiet {
        print!("{}", format_entries_table(subject, &entries, ctx.use_colors));
    }

    Ok(())
}

/// Executes the cache path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let config = load_config(ctx.config_path.as_deref())?;
    let (records, session) = match &config.cache.dir {
        Some(dir) => (FileRecordStore::in_dir(dir), FileSessionStore::in_dir(dir)),
        None => (FileRecordStore::new()?, FileSessionStore::new()?),
    };
    let (records, session) = (records.path(), session.path());

    if ctx.json_output {
        let output = serde_json::json!({
            "records": records.display().to_string(),
            "session": session.display().to_string(),
            "enabled": config.cache.is_enabled(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", records.display());
        println!("{}", session.display());
    }

    Ok(())
}
