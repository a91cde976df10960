//! Lexer (tokenizer) for filter logic expressions.
//!
//! The lexer is lenient: anything that is not an index literal, `AND`, `OR`
//! or a parenthesis is skipped. Skipped non-whitespace characters are
//! collected in [`LexerResult::errors`] so a strict caller can reject them.

use std::fmt;

/// A character the lexer skipped because it starts no token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    /// The character that could not be tokenized.
    pub character: char,
    /// The position (0-indexed byte offset) where the error occurred.
    pub position: usize,
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unexpected character '{}' at position {}",
            self.character, self.position
        )
    }
}

impl std::error::Error for LexerError {}

/// Result of tokenizing a filter logic expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerResult {
    /// The tokens successfully parsed, with their positions.
    pub tokens: Vec<PositionedToken>,
    /// Characters that were skipped (see [`is_logic_whitespace`]; whitespace
    /// is never reported).
    pub errors: Vec<LexerError>,
}

impl LexerResult {
    /// Returns true if every non-whitespace character belonged to a token
    /// and at least one token was found.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && !self.tokens.is_empty()
    }
}

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: LogicToken,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// A token in a filter logic expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogicToken {
    /// A filter index literal, kept verbatim (`"007"` stays `"007"`).
    Index(String),

    /// The `AND` keyword.
    And,

    /// The `OR` keyword.
    Or,

    /// Opening parenthesis `(`.
    OpenParen,

    /// Closing parenthesis `)`.
    CloseParen,
}

impl LogicToken {
    /// Creates an index token from a filter position.
    pub fn index(position: usize) -> Self {
        LogicToken::Index(position.to_string())
    }

    /// Returns the token text as it appears in an expression.
    pub fn as_str(&self) -> &str {
        match self {
            LogicToken::Index(raw) => raw,
            LogicToken::And => "AND",
            LogicToken::Or => "OR",
            LogicToken::OpenParen => "(",
            LogicToken::CloseParen => ")",
        }
    }

    /// Returns true for `AND` and `OR`.
    pub fn is_operator(&self) -> bool {
        matches!(self, LogicToken::And | LogicToken::Or)
    }

    /// Returns the numeric value of an index literal.
    ///
    /// Returns `None` for keywords, parentheses, and literals that are not
    /// pure ASCII digits or do not fit in a `u64`.
    pub fn index_value(&self) -> Option<u64> {
        match self {
            LogicToken::Index(raw) if is_digits(raw) => raw.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for LogicToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if `c` separates tokens: the ECMAScript whitespace and
/// line terminator set, which includes U+FEFF but not U+0085.
pub fn is_logic_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t'
            | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Returns true if `s` is a non-empty run of ASCII digits.
pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Lexer for tokenizing filter logic expressions.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position in the input string.
    position: usize,
    /// Characters skipped during tokenization.
    errors: Vec<LexerError>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            errors: Vec::new(),
        }
    }

    /// Returns the unconsumed part of the input.
    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Peeks at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes and returns the next character, updating position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Consumes a run of ASCII digits.
    fn read_digits(&mut self) -> String {
        let start = self.position;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.next_char();
        }
        self.input[start..self.position].to_string()
    }

    /// Consumes `keyword` if the input continues with it.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.rest().starts_with(keyword) {
            self.position += keyword.len();
            true
        } else {
            false
        }
    }

    /// Returns the next token with its position, or None if at end of input.
    pub fn next_token(&mut self) -> Option<PositionedToken> {
        loop {
            let c = self.peek()?;
            let token_start = self.position;

            let token = match c {
                '(' => {
                    self.next_char();
                    LogicToken::OpenParen
                }
                ')' => {
                    self.next_char();
                    LogicToken::CloseParen
                }
                '0'..='9' => LogicToken::Index(self.read_digits()),
                'A' if self.eat_keyword("AND") => LogicToken::And,
                'O' if self.eat_keyword("OR") => LogicToken::Or,
                _ => {
                    self.next_char();
                    if !is_logic_whitespace(c) {
                        self.errors.push(LexerError {
                            character: c,
                            position: token_start,
                        });
                    }
                    continue;
                }
            };

            return Some(PositionedToken {
                token,
                position: token_start,
            });
        }
    }

    /// Collects all tokens into a vector (without positions).
    pub fn tokenize(self) -> Vec<LogicToken> {
        self.tokenize_with_errors()
            .tokens
            .into_iter()
            .map(|pt| pt.token)
            .collect()
    }

    /// Collects all tokens and any skipped characters.
    pub fn tokenize_with_errors(mut self) -> LexerResult {
        let mut tokens = Vec::new();
        while let Some(positioned_token) = self.next_token() {
            tokens.push(positioned_token);
        }
        LexerResult {
            tokens,
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(raw: &str) -> LogicToken {
        LogicToken::Index(raw.to_string())
    }

    #[test]
    fn test_logic_whitespace_set() {
        let spaces = ['\t', '\n', '\u{0B}', '\u{0C}', '\r', ' ', '\u{A0}', '\u{200A}', '\u{FEFF}'];
        for c in spaces {
            assert!(is_logic_whitespace(c), "{c:?}");
        }
        for c in ['\u{85}', '\u{200B}', '\u{180E}', 'x', '0'] {
            assert!(!is_logic_whitespace(c), "{c:?}");
        }
    }

    #[test]
    fn test_skipped_characters_exclude_byte_order_mark() {
        let result = Lexer::new("\u{feff}0\u{85}").tokenize_with_errors();
        assert_eq!(result.tokens.len(), 1);
        assert_eq!(
            result.errors,
            vec![LexerError {
                character: '\u{85}',
                position: 4,
            }]
        );
    }

    #[test]
    fn test_tokenize_simple_expression() {
        let tokens = Lexer::new("1 AND (2 OR 3)").tokenize();
        assert_eq!(
            tokens,
            vec![
                idx("1"),
                LogicToken::And,
                LogicToken::OpenParen,
                idx("2"),
                LogicToken::Or,
                idx("3"),
                LogicToken::CloseParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_empty_and_blank() {
        assert!(Lexer::new("").tokenize().is_empty());
        assert!(Lexer::new("   \t\n").tokenize().is_empty());
    }

    #[test]
    fn test_tokenize_without_whitespace() {
        let tokens = Lexer::new("1AND2OR(3)").tokenize();
        assert_eq!(
            tokens,
            vec![
                idx("1"),
                LogicToken::And,
                idx("2"),
                LogicToken::Or,
                LogicToken::OpenParen,
                idx("3"),
                LogicToken::CloseParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_keeps_leading_zeros() {
        assert_eq!(Lexer::new("007").tokenize(), vec![idx("007")]);
    }

    #[test]
    fn test_tokenize_drops_unknown_characters() {
        let result = Lexer::new("1 & 2 and XAND 3").tokenize_with_errors();
        let tokens: Vec<_> = result.tokens.iter().map(|pt| pt.token.clone()).collect();
        assert_eq!(tokens, vec![idx("1"), idx("2"), LogicToken::And, idx("3")]);

        let skipped: String = result.errors.iter().map(|e| e.character).collect();
        assert_eq!(skipped, "&andX");
        assert!(!result.is_clean());
    }

    #[test]
    fn test_tokenize_lowercase_keywords_are_not_tokens() {
        assert_eq!(Lexer::new("1 and 2").tokenize(), vec![idx("1"), idx("2")]);
    }

    #[test]
    fn test_partial_keyword_is_skipped() {
        let result = Lexer::new("AN 1 O").tokenize_with_errors();
        assert_eq!(result.tokens.len(), 1);
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_token_positions() {
        let result = Lexer::new("  12 OR (3)").tokenize_with_errors();
        let positions: Vec<_> = result.tokens.iter().map(|pt| pt.position).collect();
        assert_eq!(positions, vec![2, 5, 8, 9, 10]);
        assert!(result.is_clean());
    }

    #[test]
    fn test_error_position_after_multibyte_char() {
        let result = Lexer::new("é1").tokenize_with_errors();
        assert_eq!(
            result.errors,
            vec![LexerError {
                character: 'é',
                position: 0
            }]
        );
        assert_eq!(result.tokens[0].position, 2);
    }

    #[test]
    fn test_non_ascii_digits_are_not_indices() {
        // Arabic-Indic digit one
        let result = Lexer::new("\u{0661}").tokenize_with_errors();
        assert!(result.tokens.is_empty());
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_token_helpers() {
        assert!(LogicToken::And.is_operator());
        assert!(LogicToken::Or.is_operator());
        assert!(!LogicToken::OpenParen.is_operator());
        assert_eq!(idx("42").index_value(), Some(42));
        assert_eq!(idx("x").index_value(), None);
        assert_eq!(LogicToken::CloseParen.index_value(), None);
        assert_eq!(LogicToken::index(5).to_string(), "5");
    }
}
