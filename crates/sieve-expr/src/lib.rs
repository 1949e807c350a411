//! Expression compiler for the sieve filtering crates.
//!
//! Expressions combine exact text, globs (`*`, `?`) and `~regex~` leaves with
//! `!`, `&`, `^` and `|`. [`compile`] turns one into a [`Predicate`] that can
//! test a single string or, with "any element" semantics, a collection of
//! strings.
//!
//! ```
//! use std::collections::BTreeSet;
//! use sieve_expr::compile;
//!
//! let predicate = compile("A&B").expect("example ensures fallible call succeeds");
//! assert!(predicate.matches(&BTreeSet::from(["A", "B"])));
//! assert!(!predicate.matches("A"));
//! ```

mod alias;
mod ast;
mod candidate;
mod errors;
mod eval;
mod expression;
mod glob;

pub use alias::{Aliases, expand_aliases};
pub use ast::Expr;
pub use candidate::{AnyOf, Candidate};
pub use errors::{ExpressionError, SyntaxErrorInfo};
pub use eval::Predicate;
pub use expression::{compile, compile_with_aliases, parse};
pub use glob::glob_to_regex;
