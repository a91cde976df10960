//! Output formatting utilities for the rp CLI.
//!
//! - [`logic`] - Token listings and validation results
//! - [`cache`] - Signatures, cache lookups and cache listings

mod cache;
mod logic;

pub use cache::{
    format_entries_json, format_entries_table, format_lookup_json, format_lookup_table,
    format_signature_json, format_stored_json,
};
pub use logic::{format_tokens_json, format_tokens_table, format_validation_table};
