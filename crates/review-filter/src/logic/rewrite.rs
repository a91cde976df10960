//! Rewrites that keep an expression in step with its filter list.

use super::lexer::{Lexer, LogicToken};

/// Extends an expression after a filter is appended at `new_index`.
///
/// An expression with no tokens is replaced by the bare index; otherwise
/// ` AND <new_index>` is appended to the text as written.
pub fn append_index(existing: &str, new_index: usize) -> String {
    if Lexer::new(existing).tokenize().is_empty() {
        new_index.to_string()
    } else {
        format!("{existing} AND {new_index}")
    }
}

/// Rewrites an expression after the filter at `removed_index` is deleted.
///
/// Each literal equal to `removed_index` is dropped together with one
/// adjacent operator: the operator already emitted on its left if there is
/// one, otherwise the operator that follows it. Literals greater than
/// `removed_index` are decremented. Literals too large for a `u64` are kept
/// unchanged. The result is re-joined with single spaces.
///
/// ```
/// use review_filter_rs::logic::remove_index;
///
/// assert_eq!(remove_index("0 AND 1 AND 2", 1), "0 AND 1");
/// assert_eq!(remove_index("(0 OR 1) AND 2", 0), "( 0 ) AND 1");
/// ```
pub fn remove_index(expression: &str, removed_index: usize) -> String {
    let tokens = Lexer::new(expression).tokenize();
    let removed_text = removed_index.to_string();
    let mut result: Vec<LogicToken> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if token.as_str() == removed_text {
            if result.last().is_some_and(LogicToken::is_operator) {
                result.pop();
            } else if iter.peek().is_some_and(LogicToken::is_operator) {
                iter.next();
            }
            continue;
        }

        let rewritten = match token.index_value() {
            Some(index) if index > removed_index as u64 => {
                LogicToken::Index((index - 1).to_string())
            }
            _ => token,
        };
        result.push(rewritten);
    }

    result
        .iter()
        .map(LogicToken::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
