//! Filter and partition adapters over any iterable input.
//!
//! Every function compiles its expression once and tests each item once, in
//! input order. A `None` expression selects every item; a blank expression
//! selects none. Compilation errors are returned to the caller before any
//! item is consumed.

use sieve_expr::{Aliases, Candidate, ExpressionError, Predicate, compile, expand_aliases};

/// Expand aliases and compile, or return `None` when there is no expression.
///
/// # Errors
/// Returns [`ExpressionError`] when the expanded expression is malformed.
///
/// # Examples
/// ```
/// use sieve::{Aliases, prepare};
/// assert!(prepare(None, &Aliases::new()).expect("nothing to compile").is_none());
/// let predicate = prepare(Some("A"), &Aliases::new())
///     .expect("example ensures fallible call succeeds")
///     .expect("expression was provided");
/// assert!(predicate.matches("A"));
/// ```
pub fn prepare(
    expression: Option<&str>,
    aliases: &Aliases,
) -> Result<Option<Predicate>, ExpressionError> {
    let Some(expression) = expression else {
        log::trace!("no expression given; selecting every item");
        return Ok(None);
    };
    let expanded = expand_aliases(expression, aliases);
    if expanded != expression {
        log::trace!("expanded aliases in `{expression}` to `{expanded}`");
    }
    let predicate = compile(&expanded).inspect_err(|err| {
        log::debug!("rejected expression `{expanded}`: {err}");
    })?;
    log::debug!("compiled expression `{expanded}`");
    Ok(Some(predicate))
}

/// Keep the items whose key matches `expression`.
///
/// # Errors
/// Returns [`ExpressionError`] when the expression is malformed.
///
/// # Examples
/// ```
/// use sieve::{Aliases, filter};
/// let words = ["apple", "banana", "avocado"];
/// let picked = filter(words, Some("a*"), &Aliases::new(), |w| *w)
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(picked, ["apple", "avocado"]);
/// ```
pub fn filter<I, K, F>(
    items: I,
    expression: Option<&str>,
    aliases: &Aliases,
    mut key: F,
) -> Result<Vec<I::Item>, ExpressionError>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> K,
    K: Candidate,
{
    let Some(predicate) = prepare(expression, aliases)? else {
        return Ok(items.into_iter().collect());
    };
    Ok(items
        .into_iter()
        .filter(|item| predicate.matches(&key(item)))
        .collect())
}

/// Split items into `(matching, non_matching)`, both in input order.
///
/// # Errors
/// Returns [`ExpressionError`] when the expression is malformed.
///
/// # Examples
/// ```
/// use sieve::{Aliases, partition};
/// let (hit, miss) = partition(["A", "B", "C"], Some("A"), &Aliases::new(), |s| *s)
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(hit, ["A"]);
/// assert_eq!(miss, ["B", "C"]);
/// ```
pub fn partition<I, K, F>(
    items: I,
    expression: Option<&str>,
    aliases: &Aliases,
    mut key: F,
) -> Result<(Vec<I::Item>, Vec<I::Item>), ExpressionError>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> K,
    K: Candidate,
{
    let Some(predicate) = prepare(expression, aliases)? else {
        return Ok((items.into_iter().collect(), Vec::new()));
    };
    Ok(items
        .into_iter()
        .partition(|item| predicate.matches(&key(item))))
}

fn collect_keys<K>(keys: K) -> Vec<K::Item>
where
    K: IntoIterator,
    K::Item: AsRef<str>,
{
    keys.into_iter().collect()
}

/// Like [`filter`], but each item yields several keys and matches when any
/// of them satisfies a leaf of the expression.
///
/// # Errors
/// Returns [`ExpressionError`] when the expression is malformed.
///
/// # Examples
/// ```
/// use sieve::{Aliases, flat_filter};
/// let items = [(1, vec!["A"]), (2, vec!["B"]), (3, vec!["A", "B"])];
/// let both = flat_filter(items, Some("A&B"), &Aliases::new(), |(_, tags)| tags.clone())
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(both, [(3, vec!["A", "B"])]);
/// ```
pub fn flat_filter<I, K, F>(
    items: I,
    expression: Option<&str>,
    aliases: &Aliases,
    mut keys: F,
) -> Result<Vec<I::Item>, ExpressionError>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> K,
    K: IntoIterator,
    K::Item: AsRef<str>,
{
    filter(items, expression, aliases, |item| collect_keys(keys(item)))
}

/// Like [`partition`], with several keys per item.
///
/// # Errors
/// Returns [`ExpressionError`] when the expression is malformed.
pub fn flat_partition<I, K, F>(
    items: I,
    expression: Option<&str>,
    aliases: &Aliases,
    mut keys: F,
) -> Result<(Vec<I::Item>, Vec<I::Item>), ExpressionError>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> K,
    K: IntoIterator,
    K::Item: AsRef<str>,
{
    partition(items, expression, aliases, |item| collect_keys(keys(item)))
}

/// [`filter`] for items that are their own key.
///
/// # Errors
/// Returns [`ExpressionError`] when the expression is malformed.
///
/// # Examples
/// ```
/// use sieve::{Aliases, filter_strings};
/// let aliases = Aliases::new().with("ALL", "A|B|C");
/// let all = filter_strings(vec!["A", "B", "C", "D"], Some("ALL"), &aliases)
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(all, ["A", "B", "C"]);
/// ```
pub fn filter_strings<I>(
    items: I,
    expression: Option<&str>,
    aliases: &Aliases,
) -> Result<Vec<I::Item>, ExpressionError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let Some(predicate) = prepare(expression, aliases)? else {
        return Ok(items.into_iter().collect());
    };
    Ok(items
        .into_iter()
        .filter(|item| predicate.matches(item.as_ref()))
        .collect())
}

/// [`partition`] for items that are their own key.
///
/// # Errors
/// Returns [`ExpressionError`] when the expression is malformed.
pub fn partition_strings<I>(
    items: I,
    expression: Option<&str>,
    aliases: &Aliases,
) -> Result<(Vec<I::Item>, Vec<I::Item>), ExpressionError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let Some(predicate) = prepare(expression, aliases)? else {
        return Ok((items.into_iter().collect(), Vec::new()));
    };
    Ok(items
        .into_iter()
        .partition(|item| predicate.matches(item.as_ref())))
}
