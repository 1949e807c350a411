//! Alias expansion applied to expression text before parsing.

use std::borrow::Cow;
use std::ops::Deref;

use indexmap::IndexMap;

/// Ordered mapping from alias name to replacement expression text.
///
/// Iteration order is insertion order, which is also the order in which
/// names are tried during [`expand_aliases`].
///
/// # Examples
/// ```
/// use sieve_expr::Aliases;
/// let aliases = Aliases::new().with("ALL", "A|B|C").with("NONE", "FALSE");
/// assert_eq!(aliases.len(), 2);
/// assert_eq!(aliases.get("ALL").map(String::as_str), Some("A|B|C"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Aliases(IndexMap<String, String>);

impl Aliases {
    /// Create an empty alias map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an alias, returning the updated map.
    ///
    /// Replacing an existing name keeps its original position.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, expression: impl Into<String>) -> Self {
        self.insert(name, expression);
        self
    }

    /// Add or replace an alias in place.
    pub fn insert(&mut self, name: impl Into<String>, expression: impl Into<String>) {
        self.0.insert(name.into(), expression.into());
    }

    /// Consume the map, returning the underlying ordered map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.0
    }
}

impl Deref for Aliases {
    type Target = IndexMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<IndexMap<String, String>> for Aliases {
    fn from(map: IndexMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Aliases {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, expression)| (name.into(), expression.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Aliases {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, expression) in iter {
            self.insert(name, expression);
        }
    }
}

impl<'a> IntoIterator for &'a Aliases {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Replace alias names in `expression` with their parenthesised expansions.
///
/// Aliases are applied one at a time in map order, each replacing every
/// non-overlapping occurrence of its name across the whole text. Text that
/// came from an expansion is never searched again, so a later alias cannot
/// match inside an earlier expansion and an expansion that mentions another
/// alias keeps that name as plain text. Matching is purely textual and ignores
/// token boundaries, quotes and regex bodies. Empty names are skipped.
///
/// # Examples
/// ```
/// use sieve_expr::{Aliases, expand_aliases};
/// let aliases = Aliases::new().with("X", "A|B");
/// assert_eq!(expand_aliases("!X&C", &aliases), "!(A|B)&C");
/// ```
#[must_use]
pub fn expand_aliases<'a>(expression: &'a str, aliases: &Aliases) -> Cow<'a, str> {
    let mut pieces = vec![Piece::Source(expression)];
    for (name, expansion) in aliases.iter().filter(|(name, _)| !name.is_empty()) {
        let mut next = Vec::with_capacity(pieces.len());
        for piece in pieces {
            match piece {
                Piece::Source(text) => {
                    let mut parts = text.split(name.as_str());
                    next.extend(parts.next().map(Piece::Source));
                    for part in parts {
                        next.push(Piece::Expansion(expansion.as_str()));
                        next.push(Piece::Source(part));
                    }
                }
                Piece::Expansion(_) => next.push(piece),
            }
        }
        pieces = next;
    }

    if !pieces.iter().any(|piece| matches!(piece, Piece::Expansion(_))) {
        return Cow::Borrowed(expression);
    }
    let mut expanded = String::with_capacity(expression.len());
    for piece in &pieces {
        match piece {
            Piece::Source(text) => expanded.push_str(text),
            Piece::Expansion(expansion) => {
                expanded.push('(');
                expanded.push_str(expansion);
                expanded.push(')');
            }
        }
    }
    Cow::Owned(expanded)
}

/// A run of expression text, either still open to substitution or already
/// produced by one.
enum Piece<'s, 'e> {
    Source(&'s str),
    Expansion(&'e str),
}
