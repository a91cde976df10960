//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the rp CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// rp - Review filter logic and datatable cache tools
#[derive(Parser, Debug)]
#[command(name = "rp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file path (default: ~/.config/rp/config.toml)
    #[arg(long, global = true, env = "RP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect and edit filter logic expressions
    Logic {
        #[command(subcommand)]
        command: LogicCommands,
    },

    /// Print the signature of a filter specification
    #[command(alias = "sig")]
    Signature {
        /// Filter specification JSON file ("-" for stdin)
        spec: PathBuf,
    },

    /// Read and write the datatable cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Logic subcommands
#[derive(Subcommand, Debug)]
pub enum LogicCommands {
    /// Split an expression into tokens
    Tokens {
        /// Filter logic expression (e.g., "0 AND (1 OR 2)")
        expr: String,
    },

    /// Validate an expression against a number of conditions
    Validate {
        /// Filter logic expression
        expr: String,

        /// Number of conditions the expression may reference
        #[arg(short = 'n', long)]
        count: usize,

        /// Also reject standalone groups and trailing operators
        #[arg(long)]
        strict: bool,
    },

    /// Append a condition index with AND
    Append {
        /// Filter logic expression (may be empty)
        expr: String,

        /// Index to append
        index: usize,
    },

    /// Remove a condition index and renumber the rest
    Remove {
        /// Filter logic expression
        expr: String,

        /// Index to remove
        index: usize,
    },
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Look up the cached datatable for a filter specification
    Get {
        /// Filter specification JSON file ("-" for stdin)
        spec: PathBuf,
    },

    /// Store a datatable for a filter specification
    Put {
        /// Filter specification JSON file ("-" for stdin)
        spec: PathBuf,

        /// Datatable JSON file with columns, records and totalCount
        datatable: PathBuf,
    },

    /// List cached datatables for a subject
    #[command(alias = "ls")]
    List {
        /// Subject entity (e.g., "Account")
        subject: String,
    },

    /// Print cache file paths
    Path,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print config file path
    Path,
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["rp", "--verbose", "--json", "logic", "tokens", "0"]);
        assert!(cli.verbose);
        assert!(cli.json);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["rp", "-q", "-v", "config"]).is_err());
    }

    #[test]
    fn test_logic_validate_args() {
        let cli = Cli::parse_from(["rp", "logic", "validate", "0 AND 1", "-n", "2", "--strict"]);
        if let Some(Commands::Logic {
            command: LogicCommands::Validate { expr, count, strict },
        }) = cli.command
        {
            assert_eq!(expr, "0 AND 1");
            assert_eq!(count, 2);
            assert!(strict);
        } else {
            panic!("Expected Logic Validate command");
        }
    }

    #[test]
    fn test_logic_validate_requires_count() {
        assert!(Cli::try_parse_from(["rp", "logic", "validate", "0"]).is_err());
    }

    #[test]
    fn test_logic_remove_index_must_be_number() {
        assert!(Cli::try_parse_from(["rp", "logic", "remove", "0 AND 1", "x"]).is_err());
        assert!(Cli::try_parse_from(["rp", "logic", "remove", "0 AND 1", "1"]).is_ok());
    }

    #[test]
    fn test_cache_put_args() {
        let cli = Cli::parse_from(["rp", "cache", "put", "spec.json", "table.json"]);
        if let Some(Commands::Cache {
            command: CacheCommands::Put { spec, datatable },
        }) = cli.command
        {
            assert_eq!(spec, PathBuf::from("spec.json"));
            assert_eq!(datatable, PathBuf::from("table.json"));
        } else {
            panic!("Expected Cache Put command");
        }
    }

    #[test]
    fn test_signature_alias() {
        let cli = Cli::parse_from(["rp", "sig", "-"]);
        assert!(matches!(cli.command, Some(Commands::Signature { .. })));
    }

    #[test]
    fn test_completions() {
        let cli = Cli::parse_from(["rp", "completions", "zsh"]);
        if let Some(Commands::Completions { shell }) = cli.command {
            assert!(matches!(shell, Shell::Zsh));
        } else {
            panic!("Expected Completions command");
        }
    }
}
