//! Config command implementation.
//!
//! View configuration settings.
//! Config file is located at ~/.config/rp/config.toml.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            output: OutputConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Cache configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enable caching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Directory holding the cache files (default: XDG cache dir).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Returns true unless caching is explicitly disabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// Gets the config file path.
///
/// Precedence: `--config` (or `RP_CONFIG`), then `$XDG_CONFIG_HOME/rp`, then
/// `~/.config/rp`.
pub fn get_config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        if !xdg_config.is_empty() {
            return Ok(PathBuf::from(xdg_config).join("rp").join("config.toml"));
        }
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("rp").join("config.toml"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Loads the configuration from disk. A missing file yields the defaults.
pub fn load_config(override_path: Option<&Path>) -> Result<Config> {
    let path = get_config_path(override_path)?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    parse_config(&content)
}

fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Unsupported config version {} (expected {} or lower)",
            config.version, CONFIG_VERSION
        )));
    }

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;
    let config = load_config(ctx.config_path.as_deref())?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        println!("[output]");
        if let Some(color) = config.output.color {
            println!("  color: {}", color);
        }

        println!("\n[cache]");
        println!("  enabled: {}", config.cache.is_enabled());
        if let Some(ref dir) = config.cache.dir {
            println!("  dir: {}", dir.display());
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}
