//! Logic expression output formatting.

use owo_colors::OwoColorize;
use review_filter_rs::logic::{LexerResult, LogicResult};
use serde::Serialize;

#[derive(Serialize)]
struct TokenOutput<'a> {
    token: &'a str,
    kind: &'static str,
    position: usize,
}

#[derive(Serialize)]
struct SkippedOutput {
    character: String,
    position: usize,
}

#[derive(Serialize)]
struct TokensOutput<'a> {
    tokens: Vec<TokenOutput<'a>>,
    skipped: Vec<SkippedOutput>,
}

fn kind(token: &review_filter_rs::logic::LogicToken) -> &'static str {
    use review_filter_rs::logic::LogicToken;

    match token {
        LogicToken::Index(_) => "index",
        LogicToken::And | LogicToken::Or => "operator",
        LogicToken::OpenParen => "open",
        LogicToken::CloseParen => "close",
    }
}

/// Formats a lexer result as JSON.
pub fn format_tokens_json(result: &LexerResult) -> Result<String, serde_json::Error> {
    let output = TokensOutput {
        tokens: result
            .tokens
            .iter()
            .map(|t| TokenOutput {
                token: t.token.as_str(),
                kind: kind(&t.token),
                position: t.position,
            })
            .collect(),
        skipped: result
            .errors
            .iter()
            .map(|e| SkippedOutput {
                character: e.character.to_string(),
                position: e.position,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a lexer result as a table.
pub fn format_tokens_table(result: &LexerResult, use_colors: bool) -> String {
    let mut output = String::new();

    if result.tokens.is_empty() {
        output.push_str("No tokens.\n");
    } else {
        let header = format!("{:<5} {:<9} {}", "Pos", "Kind", "Token");
        if use_colors {
            output.push_str(&format!("{}\n", header.bold()));
        } else {
            output.push_str(&format!("{header}\n"));
        }
        for t in &result.tokens {
            output.push_str(&format!(
                "{:<5} {:<9} {}\n",
                t.position,
                kind(&t.token),
                t.token
            ));
        }
    }

    for e in &result.errors {
        let line = format!("skipped '{}' at {}", e.character, e.position);
        if use_colors {
            output.push_str(&format!("{}\n", line.yellow()));
        } else {
            output.push_str(&format!("{line}\n"));
        }
    }

    output
}

/// Formats a validation outcome for humans.
pub fn format_validation_table(result: &LogicResult<()>, use_colors: bool) -> String {
    match result {
        Ok(()) if use_colors => format!("{}", "✓ valid".green()),
        Ok(()) => "✓ valid".to_string(),
        Err(e) if use_colors => format!("{} {e}", "✗".red()),
        Err(e) => format!("✗ {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_filter_rs::logic::{Lexer, LogicError};

    #[test]
    fn test_tokens_json() {
        let result = Lexer::new("0 AND (1 ? 2)").tokenize_with_errors();
        let json: serde_json::Value =
            serde_json::from_str(&format_tokens_json(&result).unwrap()).unwrap();

        assert_eq!(json["tokens"][0]["token"], "0");
        assert_eq!(json["tokens"][1]["kind"], "operator");
        assert_eq!(json["tokens"][2]["kind"], "open");
        assert_eq!(json["skipped"][0]["character"], "?");
        assert_eq!(json["skipped"][0]["position"], 9);
    }

    #[test]
    fn test_tokens_table_plain() {
        let result = Lexer::new("0 OR 1").tokenize_with_errors();
        let table = format_tokens_table(&result, false);
        assert!(table.starts_with("Pos"));
        assert!(table.contains("operator  OR"));
        assert!(!table.contains("skipped"));
    }

    #[test]
    fn test_tokens_table_empty() {
        let result = Lexer::new("   ").tokenize_with_errors();
        assert_eq!(format_tokens_table(&result, false), "No tokens.\n");
    }

    #[test]
    fn test_validation_table() {
        assert_eq!(format_validation_table(&Ok(()), false), "✓ valid");
        assert_eq!(
            format_validation_table(&Err(LogicError::TrailingOperator), false),
            format!("✗ {}", LogicError::TrailingOperator)
        );
    }
}
