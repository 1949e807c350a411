//! Reusable filter configuration.

use sieve_expr::{Aliases, Candidate, ExpressionError, Predicate};

use crate::select;
use crate::variants::{self, Variants};

/// An optional expression together with the aliases it is expanded with.
///
/// A `Selector` is what a caller typically stores in its own configuration:
/// leaving `expression` unset selects everything. With the `serde` feature it
/// deserializes from `{"expression": "...", "aliases": {"NAME": "..."}}`,
/// both fields optional.
///
/// # Examples
/// ```
/// use sieve::Selector;
/// let selector = Selector::new("!SLOW").with_alias("SLOW", "net*|db*");
/// let kept = selector
///     .filter(["net-io", "parse", "db-query", "lex"], |name| *name)
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(kept, ["parse", "lex"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Selector {
    /// Expression text, or `None` to select everything.
    pub expression: Option<String>,
    /// Aliases expanded before the expression is parsed.
    pub aliases: Aliases,
}

impl Selector {
    /// A selector for `expression` with no aliases.
    #[must_use]
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: Some(expression.into()),
            aliases: Aliases::new(),
        }
    }

    /// A selector that keeps every item.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an alias, returning the updated selector.
    #[must_use]
    pub fn with_alias(mut self, name: impl Into<String>, expression: impl Into<String>) -> Self {
        self.aliases.insert(name, expression);
        self
    }

    /// Replace the aliases wholesale.
    #[must_use]
    pub fn with_aliases(mut self, aliases: Aliases) -> Self {
        self.aliases = aliases;
        self
    }

    fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    /// Compile the selector, or return `None` when it selects everything.
    ///
    /// # Errors
    /// Returns [`ExpressionError`] when the expression is malformed.
    pub fn predicate(&self) -> Result<Option<Predicate>, ExpressionError> {
        select::prepare(self.expression(), &self.aliases)
    }

    /// See [`filter`](crate::filter).
    ///
    /// # Errors
    /// Returns [`ExpressionError`] when the expression is malformed.
    pub fn filter<I, K, F>(&self, items: I, key: F) -> Result<Vec<I::Item>, ExpressionError>
    where
        I: IntoIterator,
        F: FnMut(&I::Item) -> K,
        K: Candidate,
    {
        select::filter(items, self.expression(), &self.aliases, key)
    }

    /// See [`partition`](crate::partition).
    ///
    /// # Errors
    /// Returns [`ExpressionError`] when the expression is malformed.
    pub fn partition<I, K, F>(
        &self,
        items: I,
        key: F,
    ) -> Result<(Vec<I::Item>, Vec<I::Item>), ExpressionError>
    where
        I: IntoIterator,
        F: FnMut(&I::Item) -> K,
        K: Candidate,
    {
        select::partition(items, self.expression(), &self.aliases, key)
    }

    /// See [`flat_filter`](crate::flat_filter).
    ///
    /// # Errors
    /// Returns [`ExpressionError`] when the expression is malformed.
    pub fn flat_filter<I, K, F>(&self, items: I, keys: F) -> Result<Vec<I::Item>, ExpressionError>
    where
        I: IntoIterator,
        F: FnMut(&I::Item) -> K,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        select::flat_filter(items, self.expression(), &self.aliases, keys)
    }

    /// See [`flat_partition`](crate::flat_partition).
    ///
    /// # Errors
    /// Returns [`ExpressionError`] when the expression is malformed.
    pub fn flat_partition<I, K, F>(
        &self,
        items: I,
        keys: F,
    ) -> Result<(Vec<I::Item>, Vec<I::Item>), ExpressionError>
    where
        I: IntoIterator,
        F: FnMut(&I::Item) -> K,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        select::flat_partition(items, self.expression(), &self.aliases, keys)
    }

    /// See [`select_variants`](crate::select_variants).
    ///
    /// # Errors
    /// Returns [`ExpressionError`] when the expression is malformed.
    pub fn select_variants<E: Variants>(&self) -> Result<Vec<E>, ExpressionError> {
        variants::select_variants(self.expression(), &self.aliases)
    }

    /// See [`partition_variants`](crate::partition_variants).
    ///
    /// # Errors
    /// Returns [`ExpressionError`] when the expression is malformed.
    pub fn partition_variants<E: Variants>(&self) -> Result<(Vec<E>, Vec<E>), ExpressionError> {
        variants::partition_variants(self.expression(), &self.aliases)
    }
}
