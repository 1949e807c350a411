//! Glob-to-regex translation used by glob leaves.

use regex::{Regex, RegexBuilder};

use crate::errors::ExpressionError;

/// Translate a glob into an anchored regular-expression source.
///
/// `*` matches any run of characters (including none), `?` exactly one
/// character, and a backslash makes the following character literal. All
/// other characters, `.` included, match themselves.
///
/// # Examples
/// ```
/// use sieve_expr::glob_to_regex;
/// assert_eq!(glob_to_regex("A?"), "^A.$");
/// assert_eq!(glob_to_regex("*.txt"), r"^.*\.txt$");
/// assert_eq!(glob_to_regex(r"a\*b"), r"^a\*b$");
/// ```
#[must_use]
pub fn glob_to_regex(glob: &str) -> String {
    let mut regex = String::with_capacity(glob.len().saturating_mul(2) + 2);
    let mut buf = [0; 4];
    regex.push('^');
    let mut chars = glob.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '\\' => {
                let literal = chars.next().unwrap_or('\\');
                regex.push_str(&regex::escape(literal.encode_utf8(&mut buf)));
            }
            other => regex.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    regex.push('$');
    regex
}

/// Compile a glob so wildcards also span line breaks.
pub(crate) fn compile_glob(glob: &str) -> Result<Regex, ExpressionError> {
    RegexBuilder::new(&glob_to_regex(glob))
        .dot_matches_new_line(true)
        .build()
        .map_err(|source| ExpressionError::InvalidPattern {
            pattern: glob.to_owned(),
            source,
        })
}
