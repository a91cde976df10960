//! Logic command implementation.
//!
//! Tokenizes, validates and rewrites filter logic expressions.

use review_filter_rs::logic::{self, Lexer, Validation};

use super::{CommandContext, CommandError, Result};
use crate::output::{format_tokens_json, format_tokens_table, format_validation_table};

/// Options for the logic validate command.
#[derive(Debug)]
pub struct ValidateOptions {
    /// The expression to validate.
    pub expr: String,
    /// Number of conditions the expression may reference.
    pub count: usize,
    /// Also run the structural checks.
    pub strict: bool,
}

/// Executes the logic tokens command.
pub fn execute_tokens(ctx: &CommandContext, expr: &str) -> Result<()> {
    let result = Lexer::new(expr).tokenize_with_errors();

    if ctx.json_output {
        println!("{}", format_tokens_json(&result)?);
    } else if !ctx.quiet {
        print!("{}", format_tokens_table(&result, ctx.use_colors));
    }

    Ok(())
}

/// Executes the logic validate command.
///
/// An invalid expression is reported and then returned as an error so the
/// process exits non-zero.
pub fn execute_validate(ctx: &CommandContext, opts: &ValidateOptions) -> Result<()> {
    let result = if opts.strict {
        logic::check(&opts.expr, opts.count)
    } else {
        logic::validate(&opts.expr, opts.count)
    };
    tracing::debug!(
        expr = %opts.expr,
        count = opts.count,
        strict = opts.strict,
        ?result,
        "validated logic"
    );

    if ctx.json_output {
        let validation = Validation::from(result.clone());
        println!("{}", serde_json::to_string_pretty(&validation)?);
    } else if !ctx.quiet && result.is_ok() {
        println!("{}", format_validation_table(&result, ctx.use_colors));
    }

    result.map_err(CommandError::Logic)
}

/// Executes the logic append command.
pub fn execute_append(ctx: &CommandContext, expr: &str, index: usize) -> Result<()> {
    print_expression(ctx, &logic::append_index(expr, index))
}

/// Executes the logic remove command.
pub fn execute_remove(ctx: &CommandContext, expr: &str, index: usize) -> Result<()> {
    print_expression(ctx, &logic::remove_index(expr, index))
}

fn print_expression(ctx: &CommandContext, expr: &str) -> Result<()> {
    if ctx.json_output {
        let output = serde_json::json!({ "logic": expr });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("{expr}");
    }
    Ok(())
}
