//! Expression lexing, parsing and compilation.

mod lexer;
mod parser;
#[cfg(test)]
pub(crate) mod test_support;

use crate::alias::{Aliases, expand_aliases};
use crate::errors::ExpressionError;
use crate::eval::Predicate;

pub use parser::parse;

/// Compile an expression into a reusable [`Predicate`].
///
/// A blank expression (empty or whitespace only) compiles to a predicate
/// that matches nothing.
///
/// # Errors
/// Returns [`ExpressionError::InvalidExpression`] for malformed syntax and
/// [`ExpressionError::InvalidPattern`] when a regex or glob does not compile.
///
/// # Examples
/// ```
/// use sieve_expr::compile;
/// let predicate = compile("A|B").expect("example ensures fallible call succeeds");
/// assert!(predicate.matches("B"));
/// assert!(!compile("   ").expect("blank compiles").matches("A"));
/// ```
pub fn compile(expression: &str) -> Result<Predicate, ExpressionError> {
    if expression.trim().is_empty() {
        return Ok(Predicate::constant(false));
    }
    Predicate::new(parse(expression)?)
}

/// Expand `aliases` in `expression`, then [`compile`] the result.
///
/// Error positions refer to the expanded text.
///
/// # Errors
/// Same as [`compile`].
///
/// # Examples
/// ```
/// use sieve_expr::{Aliases, compile_with_aliases};
/// let aliases = Aliases::new().with("VOWEL", "A|E|I|O|U");
/// let predicate = compile_with_aliases("VOWEL&!E", &aliases)
///     .expect("example ensures fallible call succeeds");
/// assert!(predicate.matches("A"));
/// assert!(!predicate.matches("E"));
/// ```
pub fn compile_with_aliases(
    expression: &str,
    aliases: &Aliases,
) -> Result<Predicate, ExpressionError> {
    compile(&expand_aliases(expression, aliases))
}
