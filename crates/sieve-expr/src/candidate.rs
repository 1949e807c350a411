//! Candidate shapes a compiled predicate can be evaluated against.
//!
//! Scalars (`str`, `String`) match when the single string matches.
//! Collections (slices, vectors, sets, [`AnyOf`]) match when **any** element
//! matches; a collection is never compared as one joined string.

use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;

use indexmap::IndexSet;
use regex::Regex;

/// Values a [`Predicate`](crate::Predicate) can test.
///
/// Leaf nodes of an expression call exactly one of these methods; the
/// boolean operators combine the results.
pub trait Candidate {
    /// `true` when the candidate equals `text` (scalar) or contains an
    /// element equal to it (collection).
    fn matches_text(&self, text: &str) -> bool;

    /// `true` when `regex` matches the candidate (scalar) or any of its
    /// elements (collection). `regex` is already anchored at both ends.
    fn matches_regex(&self, regex: &Regex) -> bool;
}

impl Candidate for str {
    fn matches_text(&self, text: &str) -> bool {
        self == text
    }

    fn matches_regex(&self, regex: &Regex) -> bool {
        regex.is_match(self)
    }
}

impl Candidate for String {
    fn matches_text(&self, text: &str) -> bool {
        self.as_str().matches_text(text)
    }

    fn matches_regex(&self, regex: &Regex) -> bool {
        self.as_str().matches_regex(regex)
    }
}

impl<T: Candidate + ?Sized> Candidate for &T {
    fn matches_text(&self, text: &str) -> bool {
        (**self).matches_text(text)
    }

    fn matches_regex(&self, regex: &Regex) -> bool {
        (**self).matches_regex(regex)
    }
}

fn any_text<'a, S, I>(items: I, text: &str) -> bool
where
    S: AsRef<str> + 'a,
    I: IntoIterator<Item = &'a S>,
{
    items.into_iter().any(|item| item.as_ref() == text)
}

fn any_regex<'a, S, I>(items: I, regex: &Regex) -> bool
where
    S: AsRef<str> + 'a,
    I: IntoIterator<Item = &'a S>,
{
    items.into_iter().any(|item| regex.is_match(item.as_ref()))
}

impl<S: AsRef<str>> Candidate for [S] {
    fn matches_text(&self, text: &str) -> bool {
        any_text(self, text)
    }

    fn matches_regex(&self, regex: &Regex) -> bool {
        any_regex(self, regex)
    }
}

impl<S: AsRef<str>> Candidate for Vec<S> {
    fn matches_text(&self, text: &str) -> bool {
        any_text(self, text)
    }

    fn matches_regex(&self, regex: &Regex) -> bool {
        any_regex(self, regex)
    }
}

impl<S: AsRef<str>, const N: usize> Candidate for [S; N] {
    fn matches_text(&self, text: &str) -> bool {
        any_text(self, text)
    }

    fn matches_regex(&self, regex: &Regex) -> bool {
        any_regex(self, regex)
    }
}

impl<S: AsRef<str>> Candidate for BTreeSet<S> {
    fn matches_text(&self, text: &str) -> bool {
        any_text(self, text)
    }

    fn matches_regex(&self, regex: &Regex) -> bool {
        any_regex(self, regex)
    }
}

impl<S: AsRef<str>, H: BuildHasher> Candidate for HashSet<S, H> {
    fn matches_text(&self, text: &str) -> bool {
        any_text(self, text)
    }

    fn matches_regex(&self, regex: &Regex) -> bool {
        any_regex(self, regex)
    }
}

impl<S: AsRef<str>, H: BuildHasher> Candidate for IndexSet<S, H> {
    fn matches_text(&self, text: &str) -> bool {
        any_text(self, text)
    }

    fn matches_regex(&self, regex: &Regex) -> bool {
        any_regex(self, regex)
    }
}

/// Collection candidate over any re-iterable sequence of strings.
///
/// Useful when keys are produced lazily, e.g. `AnyOf(line.split(','))`. The
/// iterator is cloned for each leaf test.
///
/// # Examples
/// ```
/// use sieve_expr::{AnyOf, compile};
/// let predicate = compile("b&c").expect("example ensures fallible call succeeds");
/// assert!(predicate.matches(&AnyOf("a,b,c".split(','))));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AnyOf<I>(pub I);

impl<I> Candidate for AnyOf<I>
where
    I: IntoIterator + Clone,
    I::Item: AsRef<str>,
{
    fn matches_text(&self, text: &str) -> bool {
        self.0.clone().into_iter().any(|item| item.as_ref() == text)
    }

    fn matches_regex(&self, regex: &Regex) -> bool {
        self.0
            .clone()
            .into_iter()
            .any(|item| regex.is_match(item.as_ref()))
    }
}
