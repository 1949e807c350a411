//! Lazy filtering of iterators by expression.

use std::iter::FusedIterator;

use sieve_expr::{Aliases, Candidate, ExpressionError, Predicate};

use crate::select::prepare;

/// Iterator adapter yielding the items whose key matches an expression.
///
/// Created by [`FilterByExpression::filter_by_expression`].
#[derive(Debug, Clone)]
#[must_use = "iterator adapters are lazy and do nothing unless consumed"]
pub struct ExpressionFilter<I, F> {
    iter: I,
    predicate: Option<Predicate>,
    key: F,
}

impl<I, F> ExpressionFilter<I, F> {
    /// The compiled predicate, or `None` when every item passes through.
    #[must_use]
    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }
}

impl<I, K, F> Iterator for ExpressionFilter<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
    K: Candidate,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(predicate) = &self.predicate else {
            return self.iter.next();
        };
        let key = &mut self.key;
        self.iter.find(|item| predicate.matches(&key(item)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        filtered_size_hint(&self.iter, self.predicate.is_some())
    }
}

impl<I, K, F> FusedIterator for ExpressionFilter<I, F>
where
    I: FusedIterator,
    F: FnMut(&I::Item) -> K,
    K: Candidate,
{
}

/// Iterator adapter yielding the items any of whose keys match an expression.
///
/// Created by [`FilterByExpression::flat_filter_by_expression`]. The keys of
/// each item are collected only while that item is tested.
#[derive(Debug, Clone)]
#[must_use = "iterator adapters are lazy and do nothing unless consumed"]
pub struct FlatExpressionFilter<I, F> {
    iter: I,
    predicate: Option<Predicate>,
    keys: F,
}

impl<I, F> FlatExpressionFilter<I, F> {
    /// The compiled predicate, or `None` when every item passes through.
    #[must_use]
    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }
}

impl<I, K, F> Iterator for FlatExpressionFilter<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
    K: IntoIterator,
    K::Item: AsRef<str>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(predicate) = &self.predicate else {
            return self.iter.next();
        };
        let keys = &mut self.keys;
        self.iter
            .find(|item| predicate.matches(&keys(item).into_iter().collect::<Vec<_>>()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        filtered_size_hint(&self.iter, self.predicate.is_some())
    }
}

impl<I, K, F> FusedIterator for FlatExpressionFilter<I, F>
where
    I: FusedIterator,
    F: FnMut(&I::Item) -> K,
    K: IntoIterator,
    K::Item: AsRef<str>,
{
}

fn filtered_size_hint<I: Iterator>(iter: &I, filtering: bool) -> (usize, Option<usize>) {
    let (lower, upper) = iter.size_hint();
    if filtering { (0, upper) } else { (lower, upper) }
}

/// Extension methods filtering any iterator by expression.
///
/// The expression is compiled when the adapter is built, so syntax errors
/// surface before any item is pulled.
///
/// # Examples
/// ```
/// use sieve::{Aliases, FilterByExpression};
/// let evens = (1..=6)
///     .filter_by_expression(Some("*[02468]"), &Aliases::new(), ToString::to_string)
///     .expect("example ensures fallible call succeeds");
/// assert!(evens.collect::<Vec<_>>().is_empty());
///
/// let odd = (1..=6)
///     .filter_by_expression(Some("1|3|5"), &Aliases::new(), ToString::to_string)
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(odd.collect::<Vec<_>>(), [1, 3, 5]);
/// ```
pub trait FilterByExpression: Iterator + Sized {
    /// Lazily keep the items whose key matches `expression`.
    ///
    /// # Errors
    /// Returns [`ExpressionError`] when the expression is malformed.
    fn filter_by_expression<K, F>(
        self,
        expression: Option<&str>,
        aliases: &Aliases,
        key: F,
    ) -> Result<ExpressionFilter<Self, F>, ExpressionError>
    where
        F: FnMut(&Self::Item) -> K,
        K: Candidate,
    {
        Ok(ExpressionFilter {
            iter: self,
            predicate: prepare(expression, aliases)?,
            key,
        })
    }

    /// Lazily keep the items any of whose keys match `expression`.
    ///
    /// The adapter owns its compiled predicate and borrows neither
    /// `expression` nor `aliases`.
    ///
    /// # Errors
    /// Returns [`ExpressionError`] when the expression is malformed.
    fn flat_filter_by_expression<K, F>(
        self,
        expression: Option<&str>,
        aliases: &Aliases,
        keys: F,
    ) -> Result<FlatExpressionFilter<Self, F>, ExpressionError>
    where
        F: FnMut(&Self::Item) -> K,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        Ok(FlatExpressionFilter {
            iter: self,
            predicate: prepare(expression, aliases)?,
            keys,
        })
    }
}

impl<I: Iterator> FilterByExpression for I {}
