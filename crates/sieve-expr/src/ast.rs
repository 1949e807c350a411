//! Syntax tree produced by the expression parser.

use std::fmt;

/// A parsed filter expression.
///
/// Nodes are immutable once built; evaluation only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `TRUE` or `FALSE`, matched case-insensitively.
    Literal(bool),
    /// Exact text, from a bare token or a quoted string.
    Text(String),
    /// Glob pattern using `*` and `?`; a backslash escapes the next character.
    Glob(String),
    /// User-supplied regular expression written as `~pattern~`.
    Regex(String),
    /// `!expr`
    Not(Box<Expr>),
    /// `left & right`
    And(Box<Expr>, Box<Expr>),
    /// `left | right`
    Or(Box<Expr>, Box<Expr>),
    /// `left ^ right`
    Xor(Box<Expr>, Box<Expr>),
    /// `(expr)`; only affects grouping, never the result.
    Group(Box<Expr>),
}

impl Expr {
    pub(crate) fn not(expr: Self) -> Self {
        Self::Not(Box::new(expr))
    }

    pub(crate) fn group(expr: Self) -> Self {
        Self::Group(Box::new(expr))
    }
}

/// Characters that must be escaped to appear inside a bare token.
const RESERVED: &[char] = &['(', ')', '&', '|', '^', '!', '~', '*', '?', '"', '\\'];

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str, keep: &[char]) -> fmt::Result {
    for ch in text.chars() {
        if RESERVED.contains(&ch) && !keep.contains(&ch) {
            f.write_str("\\")?;
        }
        write!(f, "{ch}")?;
    }
    Ok(())
}

/// Renders the expression back into source form.
///
/// Trees produced by the parser render to text that parses back into an
/// equal tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(true) => f.write_str("TRUE"),
            Self::Literal(false) => f.write_str("FALSE"),
            Self::Text(text) => {
                f.write_str("\"")?;
                for ch in text.chars() {
                    if matches!(ch, '"' | '\\') {
                        f.write_str("\\")?;
                    }
                    write!(f, "{ch}")?;
                }
                f.write_str("\"")
            }
            Self::Glob(pattern) => {
                // Already in glob syntax: wildcards and escapes stay as written.
                let mut chars = pattern.chars();
                while let Some(ch) = chars.next() {
                    if ch == '\\' {
                        f.write_str("\\")?;
                        if let Some(next) = chars.next() {
                            write!(f, "{next}")?;
                        }
                    } else {
                        write_escaped(f, ch.encode_utf8(&mut [0; 4]), &['*', '?'])?;
                    }
                }
                Ok(())
            }
            Self::Regex(pattern) => {
                f.write_str("~")?;
                f.write_str(&pattern.replace('~', "\\~"))?;
                f.write_str("~")
            }
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::And(left, right) => write!(f, "{left}&{right}"),
            Self::Or(left, right) => write!(f, "{left}|{right}"),
            Self::Xor(left, right) => write!(f, "{left}^{right}"),
            Self::Group(inner) => write!(f, "({inner})"),
        }
    }
}
