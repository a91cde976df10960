//! Filter logic expressions over filter indices.
//!
//! A filter logic expression combines 0-based filter positions with `AND`,
//! `OR` and parentheses, for example `0 AND (1 OR 2)`. This module lexes,
//! validates, and rewrites such expressions as the filter list they refer to
//! grows and shrinks. Every function is pure and never panics; problems are
//! reported as [`LogicError`] values.
//!
//! # Example
//!
//! ```
//! use review_filter_rs::logic::{self, LogicError};
//!
//! let expr = logic::append_index("", 0);
//! let expr = logic::append_index(&expr, 1);
//! assert_eq!(expr, "0 AND 1");
//! assert!(logic::validate(&expr, 2).is_ok());
//!
//! assert_eq!(
//!     logic::validate("0 AND 2", 2),
//!     Err(LogicError::index_does_not_exist("2"))
//! );
//!
//! assert_eq!(logic::remove_index(&expr, 0), "0");
//! ```

mod error;
mod lexer;
mod rewrite;
mod validate;

pub use error::{LogicError, LogicResult, Validation};
pub use lexer::{is_logic_whitespace, Lexer, LexerError, LexerResult, LogicToken, PositionedToken};
pub use rewrite::{append_index, remove_index};
pub use validate::{check, is_valid_index, validate, validate_structure, validate_tokens};

/// Splits an expression into tokens, silently dropping anything that is not
/// an index, `AND`, `OR` or a parenthesis.
pub fn tokenize(expression: &str) -> Vec<LogicToken> {
    Lexer::new(expression).tokenize()
}
