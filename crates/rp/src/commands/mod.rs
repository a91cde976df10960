//! Command implementations for the rp CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod cache;
pub mod completions;
pub mod config;
pub mod logic;
pub mod signature;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use review_filter_rs::logic::LogicError;
use serde::de::DeserializeOwned;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The filter logic expression is invalid.
    #[error("invalid filter logic: {0}")]
    Logic(#[from] LogicError),

    /// Datatable cache error.
    #[error("cache error: {0}")]
    Cache(#[from] review_cache_rs::CacheError),

    /// Cache store error.
    #[error("cache error: {0}")]
    CacheStore(#[from] review_cache_rs::CacheStoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input could not be read as JSON.
    #[error("invalid JSON in '{path}': {source}")]
    Input {
        /// Where the input came from.
        path: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Input was well-formed but unusable.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Config file path from `--config` or `RP_CONFIG`.
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            config_path: cli.config.clone(),
        }
    }
}

/// Reads a JSON document from `path`, or from stdin when `path` is `-`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let (label, contents) = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        ("<stdin>".to_string(), buf)
    } else {
        (path.display().to_string(), fs::read_to_string(path)?)
    };

    serde_json::from_str(&contents).map_err(|source| CommandError::Input {
        path: label,
        source,
    })
}
