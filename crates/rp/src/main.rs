use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{CacheCommands, Cli, Commands, ConfigCommands, LogicCommands};
use commands::config::load_config;
use commands::{CommandContext, CommandError};

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "RP_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("{error_json}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RP_LOG` takes precedence; otherwise the level follows `--verbose` and
/// `--quiet`.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let mut ctx = CommandContext::from_cli(cli);
    if let Ok(config) = load_config(ctx.config_path.as_deref()) {
        if config.output.color == Some(false) {
            ctx.use_colors = false;
        }
    }

    match &cli.command {
        Some(Commands::Logic { command }) => dispatch_logic(&ctx, command),
        Some(Commands::Signature { spec }) => commands::signature::execute(&ctx, spec),
        Some(Commands::Cache { command }) => dispatch_cache(&ctx, command).await,
        Some(Commands::Config { command }) => match command {
            Some(ConfigCommands::Show) | None => commands::config::execute_show(&ctx),
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
        },
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell).map_err(CommandError::Io)
        }
        None => {
            if !ctx.quiet {
                println!("rp - review filter tools");
                println!("Use --help for usage information");
            }
            Ok(())
        }
    }
}

fn dispatch_logic(ctx: &CommandContext, command: &LogicCommands) -> commands::Result<()> {
    match command {
        LogicCommands::Tokens { expr } => commands::logic::execute_tokens(ctx, expr),
        LogicCommands::Validate {
            expr,
            count,
            strict,
        } => {
            let opts = commands::logic::ValidateOptions {
                expr: expr.clone(),
                count: *count,
                strict: *strict,
            };
            commands::logic::execute_validate(ctx, &opts)
        }
        LogicCommands::Append { expr, index } => commands::logic::execute_append(ctx, expr, *index),
        LogicCommands::Remove { expr, index } => commands::logic::execute_remove(ctx, expr, *index),
    }
}

async fn dispatch_cache(ctx: &CommandContext, command: &CacheCommands) -> commands::Result<()> {
    match command {
        CacheCommands::Get { spec } => commands::cache::execute_get(ctx, spec).await,
        CacheCommands::Put { spec, datatable } => {
            commands::cache::execute_put(ctx, spec, datatable).await
        }
        CacheCommands::List { subject } => commands::cache::execute_list(ctx, subject).await,
        CacheCommands::Path => commands::cache::execute_path(ctx),
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Logic(_) => "INVALID_LOGIC",
        CommandError::Cache(_) | CommandError::CacheStore(_) => "CACHE_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Input { .. } | CommandError::Invalid(_) => "INVALID_INPUT",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the process exit status for an error.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Logic(_) => 1,
        CommandError::Input { .. } | CommandError::Invalid(_) => 1,
        CommandError::Json(_) => 1,
        CommandError::Io(_) => 3,
        CommandError::Config(_) => 5,
        CommandError::Cache(_) | CommandError::CacheStore(_) => 5,
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}
