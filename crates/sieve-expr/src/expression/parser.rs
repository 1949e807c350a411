//! Recursive-descent parser turning lexed tokens into an [`Expr`] tree.
//!
//! Binding strength, tightest first: `!`, `&`, `^`, `|`. Binary operators
//! associate to the left.

use std::iter::Peekable;
use std::vec::IntoIter;

use crate::ast::Expr;
use crate::errors::{ExpressionError, syntax_error};

use super::lexer::{Token, TokenKind, lex_expression};

/// Height limit for a parsed tree. Groups, negations and each binary
/// operator in a chain count as one level.
pub(crate) const MAX_DEPTH: usize = 256;

/// An expression together with the height of its tree.
struct Parsed {
    expr: Expr,
    depth: usize,
}

impl Parsed {
    const fn leaf(expr: Expr) -> Self {
        Self { expr, depth: 1 }
    }
}

fn too_deep(position: usize) -> ExpressionError {
    syntax_error("expression nested too deeply", position, None)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Peekable<IntoIter<Token>>,
    open_groups: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens: tokens.into_iter().peekable(),
            open_groups: 0,
        }
    }

    fn fragment(&self, start: usize, end: usize) -> Option<String> {
        self.source.get(start..end).map(str::to_owned)
    }

    fn unexpected(&self, token: &Token) -> ExpressionError {
        syntax_error(
            "unexpected token",
            token.start,
            self.fragment(token.start, token.end),
        )
    }

    fn end_of_input(&self) -> ExpressionError {
        syntax_error("unexpected end of expression", self.source.len(), None)
    }

    fn next_if(&mut self, kind: &TokenKind) -> Option<Token> {
        self.tokens.next_if(|token| &token.kind == kind)
    }

    fn parse_binary(
        &mut self,
        operator: &TokenKind,
        operand: fn(&mut Self) -> Result<Parsed, ExpressionError>,
        build: fn(Box<Expr>, Box<Expr>) -> Expr,
    ) -> Result<Parsed, ExpressionError> {
        let mut left = operand(self)?;
        while let Some(token) = self.next_if(operator) {
            let right = operand(self)?;
            let depth = left.depth.max(right.depth) + 1;
            if depth > MAX_DEPTH {
                return Err(too_deep(token.start));
            }
            left = Parsed {
                expr: build(Box::new(left.expr), Box::new(right.expr)),
                depth,
            };
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Parsed, ExpressionError> {
        self.parse_binary(&TokenKind::Or, Self::parse_xor, Expr::Or)
    }

    fn parse_xor(&mut self) -> Result<Parsed, ExpressionError> {
        self.parse_binary(&TokenKind::Xor, Self::parse_and, Expr::Xor)
    }

    fn parse_and(&mut self) -> Result<Parsed, ExpressionError> {
        self.parse_binary(&TokenKind::And, Self::parse_unary, Expr::And)
    }

    // Runs of `!` are collected in a loop so their length never costs stack.
    fn parse_unary(&mut self) -> Result<Parsed, ExpressionError> {
        let mut negations = Vec::new();
        while let Some(token) = self.next_if(&TokenKind::Not) {
            negations.push(token.start);
        }
        let mut parsed = self.parse_primary()?;
        for start in negations.into_iter().rev() {
            parsed.depth += 1;
            if parsed.depth > MAX_DEPTH {
                return Err(too_deep(start));
            }
            parsed.expr = Expr::not(parsed.expr);
        }
        Ok(parsed)
    }

    fn parse_primary(&mut self) -> Result<Parsed, ExpressionError> {
        let Some(token) = self.tokens.next() else {
            return Err(self.end_of_input());
        };
        match token.kind {
            TokenKind::Word { text, glob } => Ok(Parsed::leaf(word_expr(text, glob))),
            TokenKind::Quoted(text) => Ok(Parsed::leaf(Expr::Text(text))),
            TokenKind::Regex(pattern) => Ok(Parsed::leaf(Expr::Regex(pattern))),
            TokenKind::OpenParen => {
                if self.open_groups >= MAX_DEPTH {
                    return Err(too_deep(token.start));
                }
                self.open_groups += 1;
                let inner = self.parse_or()?;
                self.open_groups -= 1;
                match self.tokens.next() {
                    Some(Token {
                        kind: TokenKind::CloseParen,
                        ..
                    }) if inner.depth < MAX_DEPTH => Ok(Parsed {
                        expr: Expr::group(inner.expr),
                        depth: inner.depth + 1,
                    }),
                    Some(Token {
                        kind: TokenKind::CloseParen,
                        ..
                    }) => Err(too_deep(token.start)),
                    Some(other) => Err(self.unexpected(&other)),
                    None => Err(syntax_error(
                        "missing closing ')' for group",
                        token.start,
                        None,
                    )),
                }
            }
            _ => Err(self.unexpected(&token)),
        }
    }

    fn parse_predicate(mut self) -> Result<Expr, ExpressionError> {
        let parsed = self.parse_or()?;
        if let Some(token) = self.tokens.next() {
            return Err(syntax_error(
                "unexpected trailing input",
                token.start,
                self.fragment(token.start, self.source.len()),
            ));
        }
        Ok(parsed.expr)
    }
}

// Escapes always leave a non-letter behind, so an escaped word can never
// spell a keyword.
fn word_expr(text: String, glob: Option<String>) -> Expr {
    if let Some(pattern) = glob {
        Expr::Glob(pattern)
    } else if text.eq_ignore_ascii_case("true") {
        Expr::Literal(true)
    } else if text.eq_ignore_ascii_case("false") {
        Expr::Literal(false)
    } else {
        Expr::Text(text)
    }
}

/// Parse an expression into its syntax tree.
///
/// The whole input must form a single expression; nothing is returned on
/// failure.
///
/// # Errors
/// Returns [`ExpressionError::InvalidExpression`] for empty input, unexpected
/// or trailing tokens, unbalanced parentheses, unterminated quoted strings or
/// regular expressions, and trees more than 256 levels deep.
///
/// # Examples
/// ```
/// use sieve_expr::{Expr, parse};
/// let expr = parse("A|B").expect("example ensures fallible call succeeds");
/// assert_eq!(
///     expr,
///     Expr::Or(Box::new(Expr::Text("A".into())), Box::new(Expr::Text("B".into())))
/// );
/// ```
pub fn parse(expression: &str) -> Result<Expr, ExpressionError> {
    let tokens = lex_expression(expression)?;
    Parser::new(expression, tokens).parse_predicate()
}
