//! Error types for filter logic validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A specialized Result type for filter logic checks.
pub type LogicResult<T> = Result<T, LogicError>;

/// Problems found in a filter logic expression.
///
/// The `Display` output of each variant is the message shown next to the
/// filter logic input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LogicError {
    /// The expression is empty or whitespace only.
    #[error("Filter logic must be specified")]
    Empty,

    /// The expression contains characters that belong to no token.
    #[error("Filter logic contains invalid characters")]
    InvalidCharacters,

    /// A `)` without a matching `(`, or a `(` that is never closed.
    #[error("Mismatched parentheses")]
    MismatchedParentheses,

    /// A token that is neither a keyword, a parenthesis, nor an index.
    #[error("Invalid token: \"{token}\"")]
    InvalidToken {
        /// The offending token text.
        token: String,
    },

    /// An index literal that references no filter.
    #[error("Index \"{index}\" does not exist")]
    IndexDoesNotExist {
        /// The index, without leading zeros.
        index: String,
    },

    /// A parenthesized group holding a single bare index.
    #[error("Index \"{index}\" cannot be a standalone condition")]
    StandaloneCondition {
        /// The index as written inside the group.
        index: String,
    },

    /// The expression ends with `AND` or `OR`.
    #[error("Filter logic cannot end with a logical operator")]
    TrailingOperator,
}

impl LogicError {
    /// Creates an invalid token error.
    pub fn invalid_token(token: impl Into<String>) -> Self {
        LogicError::InvalidToken {
            token: token.into(),
        }
    }

    /// Creates an index-does-not-exist error.
    pub fn index_does_not_exist(index: impl Into<String>) -> Self {
        LogicError::IndexDoesNotExist {
            index: index.into(),
        }
    }

    /// Creates a standalone-condition error.
    pub fn standalone_condition(index: impl Into<String>) -> Self {
        LogicError::StandaloneCondition {
            index: index.into(),
        }
    }
}

/// Serializable outcome of a validation, as `{"isValid": .., "error": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    /// Whether the expression passed.
    pub is_valid: bool,
    /// The failure message, empty when valid.
    pub error: String,
}

impl Validation {
    /// A passing validation.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: String::new(),
        }
    }
}

impl From<LogicResult<()>> for Validation {
    fn from(result: LogicResult<()>) -> Self {
        match result {
            Ok(()) => Validation::valid(),
            Err(e) => Validation {
                is_valid: false,
                error: e.to_string(),
            },
        }
    }
}
