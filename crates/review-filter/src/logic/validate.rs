//! Syntactic and referential checks for filter logic expressions.

use super::error::{LogicError, LogicResult};
use super::lexer::{is_digits, is_logic_whitespace, Lexer, LogicToken};

/// Validates an expression against the number of filters it may reference.
///
/// Checks run in a fixed order and stop at the first failure:
///
/// 1. blank input ([`LogicError::Empty`])
/// 2. characters outside digits, `AND`, `OR`, parentheses and whitespace
///    ([`LogicError::InvalidCharacters`])
/// 3. a left-to-right scan: unmatched `)`, invalid tokens, and indices
///    `>= filter_count`
/// 4. parentheses left open at the end
///
/// A trailing operator is not caught here; see [`validate_structure`] and
/// [`check`].
pub fn validate(expression: &str, filter_count: usize) -> LogicResult<()> {
    if expression.trim_matches(is_logic_whitespace).is_empty() {
        return Err(LogicError::Empty);
    }

    let lexed = Lexer::new(expression).tokenize_with_errors();
    if !lexed.is_clean() {
        return Err(LogicError::InvalidCharacters);
    }

    let tokens: Vec<LogicToken> = lexed.tokens.into_iter().map(|pt| pt.token).collect();
    validate_tokens(&tokens, filter_count)
}

/// Runs the token scan of [`validate`] (steps 3 and 4) over prepared tokens.
pub fn validate_tokens(tokens: &[LogicToken], filter_count: usize) -> LogicResult<()> {
    let mut depth: usize = 0;

    for token in tokens {
        match token {
            LogicToken::OpenParen => depth += 1,
            LogicToken::CloseParen => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(LogicError::MismatchedParentheses)?;
            }
            LogicToken::And | LogicToken::Or => {}
            LogicToken::Index(raw) => {
                if !is_digits(raw) {
                    return Err(LogicError::invalid_token(raw.as_str()));
                }
                let in_range = raw
                    .parse::<u64>()
                    .is_ok_and(|index| index < filter_count as u64);
                if !in_range {
                    return Err(LogicError::index_does_not_exist(strip_leading_zeros(raw)));
                }
            }
        }
    }

    if depth != 0 {
        return Err(LogicError::MismatchedParentheses);
    }

    Ok(())
}

/// Finds structural problems the token scan does not report.
///
/// Every group whose whole content is one index literal is reported, as is a
/// trailing `AND`/`OR`. Nested groups contribute nothing to the content of
/// their parent, so `((1 AND 2))` is accepted while `(1 AND (2))` reports `2`.
/// Callers usually surface only the first entry.
pub fn validate_structure(expression: &str) -> Vec<LogicError> {
    let tokens = Lexer::new(expression).tokenize();
    let mut groups: Vec<Vec<&LogicToken>> = Vec::new();
    let mut errors = Vec::new();

    for token in &tokens {
        match token {
            LogicToken::OpenParen => groups.push(Vec::new()),
            LogicToken::CloseParen => {
                if let Some(content) = groups.pop() {
                    if let [LogicToken::Index(raw)] = content.as_slice() {
                        errors.push(LogicError::standalone_condition(raw.as_str()));
                    }
                }
            }
            _ => {
                if let Some(group) = groups.last_mut() {
                    group.push(token);
                }
            }
        }
    }

    if tokens.last().is_some_and(LogicToken::is_operator) {
        errors.push(LogicError::TrailingOperator);
    }

    errors
}

/// Runs [`validate`] and then [`validate_structure`], returning the first
/// problem found.
pub fn check(expression: &str, filter_count: usize) -> LogicResult<()> {
    validate(expression, filter_count)?;
    match validate_structure(expression).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Returns true if `token` starts with a number that is a valid position in a
/// list of `filter_count` filters.
///
/// Leading whitespace is skipped and trailing garbage after the digits is
/// ignored, so `" 2)"` is index 2.
pub fn is_valid_index(token: &str, filter_count: usize) -> bool {
    let trimmed = token.trim_start_matches(is_logic_whitespace);
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());

    trimmed[..digits_end]
        .parse::<u64>()
        .is_ok_and(|index| index < filter_count as u64)
}

fn strip_leading_zeros(raw: &str) -> &str {
    let stripped = raw.trim_start_matches('0');
    if stripped.is_empty() {
        "0"
    } else {
        stripped
    }
}
