//! Selecting enumeration variants by name.

use sieve_expr::{Aliases, ExpressionError};

use crate::select::prepare;

/// A fieldless enumeration whose variants can be selected by name.
///
/// Implement it by hand or with [`impl_variants!`](crate::impl_variants).
///
/// # Examples
/// ```
/// use sieve::{Aliases, Variants, select_variants};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Stage { Build, Test }
///
/// impl Variants for Stage {
///     const VARIANTS: &'static [Self] = &[Self::Build, Self::Test];
///
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Build => "build",
///             Self::Test => "test",
///         }
///     }
/// }
///
/// let stages = select_variants::<Stage>(Some("t*"), &Aliases::new())
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(stages, [Stage::Test]);
/// ```
pub trait Variants: Copy + 'static {
    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// The name an expression refers to this variant by.
    fn name(&self) -> &'static str;
}

/// Variants of `E` whose names match `expression`, in declaration order.
///
/// `None` selects every variant and a blank expression selects none.
///
/// # Errors
/// Returns [`ExpressionError`] when the expression is malformed.
pub fn select_variants<E: Variants>(
    expression: Option<&str>,
    aliases: &Aliases,
) -> Result<Vec<E>, ExpressionError> {
    let Some(predicate) = prepare(expression, aliases)? else {
        return Ok(E::VARIANTS.to_vec());
    };
    Ok(E::VARIANTS
        .iter()
        .copied()
        .filter(|variant| predicate.matches(variant.name()))
        .collect())
}

/// Split the variants of `E` into `(matching, non_matching)`.
///
/// # Errors
/// Returns [`ExpressionError`] when the expression is malformed.
pub fn partition_variants<E: Variants>(
    expression: Option<&str>,
    aliases: &Aliases,
) -> Result<(Vec<E>, Vec<E>), ExpressionError> {
    let Some(predicate) = prepare(expression, aliases)? else {
        return Ok((E::VARIANTS.to_vec(), Vec::new()));
    };
    Ok(E::VARIANTS
        .iter()
        .copied()
        .partition(|variant| predicate.matches(variant.name())))
}

/// Implement [`Variants`] for a fieldless enum, naming each variant after its
/// identifier.
///
/// # Examples
/// ```
/// use sieve::{Aliases, impl_variants, partition_variants};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Colour { Red, Green, Blue }
/// impl_variants!(Colour { Red, Green, Blue });
///
/// let (warm, cold) = partition_variants::<Colour>(Some("Red"), &Aliases::new())
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(warm, [Colour::Red]);
/// assert_eq!(cold, [Colour::Green, Colour::Blue]);
/// ```
#[macro_export]
macro_rules! impl_variants {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::Variants for $ty {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Letter {
        A,
        B,
        C,
    }

    crate::impl_variants!(Letter { A, B, C });

    #[rstest]
    #[case(Some("A"), &[Letter::A])]
    #[case(Some("(A)"), &[Letter::A])]
    #[case(Some("!A"), &[Letter::B, Letter::C])]
    #[case(Some("!(A)"), &[Letter::B, Letter::C])]
    #[case(Some("!A|A"), &[Letter::A, Letter::B, Letter::C])]
    #[case(Some("!A&A"), &[])]
    #[case(Some("(!A|B)|A"), &[Letter::A, Letter::B, Letter::C])]
    #[case(Some("X"), &[])]
    #[case(Some("!X"), &[Letter::A, Letter::B, Letter::C])]
    #[case(Some(""), &[])]
    #[case(None, &[Letter::A, Letter::B, Letter::C])]
    fn selects_by_name(#[case] expression: Option<&str>, #[case] expected: &[Letter]) {
        let selected = select_variants::<Letter>(expression, &Aliases::new())
            .unwrap_or_else(|err| panic!("expression should compile: {err}"));
        assert_eq!(selected, expected);
    }

    #[rstest]
    #[case("X", &[Letter::A, Letter::B])]
    #[case("!X", &[Letter::C])]
    #[case("A", &[Letter::A])]
    fn selects_through_aliases(#[case] expression: &str, #[case] expected: &[Letter]) {
        let aliases = Aliases::new().with("X", "A|B");
        let selected = select_variants::<Letter>(Some(expression), &aliases)
            .unwrap_or_else(|err| panic!("expression should compile: {err}"));
        assert_eq!(selected, expected);
    }

    #[test]
    fn partition_keeps_declaration_order() {
        let (hit, miss) = partition_variants::<Letter>(Some("C|A"), &Aliases::new())
            .unwrap_or_else(|err| panic!("expression should compile: {err}"));
        assert_eq!(hit, [Letter::A, Letter::C]);
        assert_eq!(miss, [Letter::B]);
    }
}
