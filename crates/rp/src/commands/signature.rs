//! Signature command implementation.

use std::path::Path;

use review_cache_rs::{cache_key, compute_signature};
use review_filter_rs::FilterSpec;

use super::{read_json, CommandContext, Result};
use crate::output::format_signature_json;

/// Executes the signature command.
pub fn execute(ctx: &CommandContext, spec_path: &Path) -> Result<()> {
    let spec: FilterSpec = read_json(spec_path)?;
    let signature = compute_signature(&spec);
    let key = cache_key(&spec.subject, &signature);

    if ctx.json_output {
        println!("{}", format_signature_json(&spec.subject, &signature, &key)?);
    } else {
        println!("{signature}");
    }

    Ok(())
}
