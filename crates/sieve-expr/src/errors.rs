//! Error types shared by the expression parsing modules.

use std::fmt;
use thiserror::Error;

/// Additional context for syntax errors raised while parsing an expression.
///
/// # Examples
/// ```
/// use sieve_expr::SyntaxErrorInfo;
/// let info = SyntaxErrorInfo::new("unexpected token", 3, Some(")".into()));
/// assert_eq!(info.fragment.as_deref(), Some(")"));
/// assert_eq!(info.position, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Human-readable description of the failure.
    pub message: &'static str,
    /// Zero-based byte offset into the (alias-expanded) expression.
    pub position: usize,
    /// The offending source text, when there is any.
    pub fragment: Option<String>,
}

impl SyntaxErrorInfo {
    /// Create a new error description for a syntax failure.
    ///
    /// # Examples
    /// ```
    /// use sieve_expr::SyntaxErrorInfo;
    /// let info = SyntaxErrorInfo::new("unterminated quoted string", 1, None);
    /// assert_eq!(info.message, "unterminated quoted string");
    /// ```
    #[must_use]
    pub fn new(message: &'static str, position: usize, fragment: Option<String>) -> Self {
        Self {
            message,
            position,
            fragment,
        }
    }
}

impl fmt::Display for SyntaxErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fragment {
            Some(text) => write!(
                f,
                "{} `{}` at byte {} (zero-based)",
                self.message, text, self.position
            ),
            None => write!(f, "{} at byte {} (zero-based)", self.message, self.position),
        }
    }
}

/// Errors surfaced while compiling an expression into a predicate.
///
/// # Examples
/// ```
/// use sieve_expr::{ExpressionError, SyntaxErrorInfo};
/// let info = SyntaxErrorInfo::new("unexpected token", 2, Some("&".into()));
/// let err = ExpressionError::InvalidExpression(info.clone());
/// assert_eq!(err.to_string(), format!("invalid expression: {info}"));
/// ```
#[derive(Debug, Error)]
pub enum ExpressionError {
    /// The expression text does not follow the grammar.
    #[error("invalid expression: {0}")]
    InvalidExpression(SyntaxErrorInfo),
    /// A regular expression (or translated glob) failed to compile.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// Pattern text as written in the expression.
        pattern: String,
        /// Underlying regex engine error.
        source: regex::Error,
    },
}

impl ExpressionError {
    /// Byte position of a syntax error, if this is one.
    ///
    /// # Examples
    /// ```
    /// let err = sieve_expr::compile("A &").unwrap_err();
    /// assert_eq!(err.position(), Some(3));
    /// ```
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::InvalidExpression(info) => Some(info.position),
            Self::InvalidPattern { .. } => None,
        }
    }
}

pub(crate) fn syntax_error(
    message: &'static str,
    position: usize,
    fragment: Option<String>,
) -> ExpressionError {
    ExpressionError::InvalidExpression(SyntaxErrorInfo::new(message, position, fragment))
}
