//! Evaluation of parsed expressions against candidates.

use regex::Regex;

use crate::ast::Expr;
use crate::candidate::Candidate;
use crate::errors::ExpressionError;
use crate::glob::compile_glob;

/// Mirror of [`Expr`] with every pattern leaf compiled.
#[derive(Debug, Clone)]
enum Node {
    Literal(bool),
    Text(String),
    Glob(Regex),
    Regex(Regex),
    Not(Box<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Xor(Box<Node>, Box<Node>),
    Group(Box<Node>),
}

fn compile_regex(pattern: &str) -> Result<Regex, ExpressionError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| ExpressionError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })
}

fn lower(expr: &Expr) -> Result<Node, ExpressionError> {
    let pair = |left: &Expr, right: &Expr| -> Result<(Box<Node>, Box<Node>), ExpressionError> {
        Ok((Box::new(lower(left)?), Box::new(lower(right)?)))
    };
    Ok(match expr {
        Expr::Literal(value) => Node::Literal(*value),
        Expr::Text(text) => Node::Text(text.clone()),
        Expr::Glob(pattern) => Node::Glob(compile_glob(pattern)?),
        Expr::Regex(pattern) => Node::Regex(compile_regex(pattern)?),
        Expr::Not(inner) => Node::Not(Box::new(lower(inner)?)),
        Expr::And(left, right) => {
            let (left, right) = pair(left, right)?;
            Node::And(left, right)
        }
        Expr::Or(left, right) => {
            let (left, right) = pair(left, right)?;
            Node::Or(left, right)
        }
        Expr::Xor(left, right) => {
            let (left, right) = pair(left, right)?;
            Node::Xor(left, right)
        }
        Expr::Group(inner) => Node::Group(Box::new(lower(inner)?)),
    })
}

fn evaluate<C: Candidate + ?Sized>(node: &Node, candidate: &C) -> bool {
    match node {
        Node::Literal(value) => *value,
        Node::Text(text) => candidate.matches_text(text),
        Node::Glob(regex) | Node::Regex(regex) => candidate.matches_regex(regex),
        Node::Not(inner) => !evaluate(inner, candidate),
        Node::And(left, right) => evaluate(left, candidate) && evaluate(right, candidate),
        Node::Or(left, right) => evaluate(left, candidate) || evaluate(right, candidate),
        Node::Xor(left, right) => evaluate(left, candidate) != evaluate(right, candidate),
        Node::Group(inner) => evaluate(inner, candidate),
    }
}

/// A compiled expression, ready to test any number of candidates.
///
/// Predicates hold no mutable state; clone them freely or share them across
/// threads.
///
/// # Examples
/// ```
/// use sieve_expr::compile;
/// let predicate = compile("A?&!AC").expect("example ensures fallible call succeeds");
/// assert!(predicate.matches("AB"));
/// assert!(!predicate.matches("AC"));
/// assert!(predicate.matches(&["X", "AA"]));
/// ```
#[derive(Debug, Clone)]
pub struct Predicate {
    expr: Option<Expr>,
    root: Node,
}

impl Predicate {
    /// Compile the pattern leaves of `expr`.
    ///
    /// # Errors
    /// Returns [`ExpressionError::InvalidPattern`] when a regex or glob leaf
    /// does not compile.
    pub fn new(expr: Expr) -> Result<Self, ExpressionError> {
        let root = lower(&expr)?;
        Ok(Self {
            expr: Some(expr),
            root,
        })
    }

    /// A predicate that returns `value` for every candidate.
    #[must_use]
    pub fn constant(value: bool) -> Self {
        Self {
            expr: None,
            root: Node::Literal(value),
        }
    }

    /// The parsed expression, or `None` for a [`constant`](Self::constant).
    #[must_use]
    pub fn expr(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    /// Test a single candidate.
    #[must_use]
    pub fn matches<C: Candidate + ?Sized>(&self, candidate: &C) -> bool {
        evaluate(&self.root, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::test_support::compile_ok;
    use rstest::rstest;
    use std::collections::BTreeSet;

    const SCALARS: [&str; 6] = ["A", "B", "C", "AB", "", "a"];

    fn sets() -> Vec<BTreeSet<&'static str>> {
        vec![
            BTreeSet::from(["A"]),
            BTreeSet::from(["B"]),
            BTreeSet::from(["A", "B"]),
            BTreeSet::from(["AA", "AB"]),
            BTreeSet::new(),
        ]
    }

    #[rstest]
    #[case("!(A&B)", "!A|!B")]
    #[case("!(A|B)", "!A&!B")]
    #[case("A|B&C", "A|(B&C)")]
    #[case("A^B|C", "(A^B)|C")]
    #[case("A", "((A))")]
    fn equivalent_expressions_agree(#[case] left: &str, #[case] right: &str) {
        let (left, right) = (compile_ok(left), compile_ok(right));
        for scalar in SCALARS {
            assert_eq!(left.matches(scalar), right.matches(scalar), "{scalar:?}");
        }
        for set in sets() {
            assert_eq!(left.matches(&set), right.matches(&set), "{set:?}");
        }
    }

    #[test]
    fn xor_is_inequality_of_operands() {
        let (xor, a, b) = (compile_ok("A^B"), compile_ok("A"), compile_ok("B"));
        for set in sets() {
            assert_eq!(xor.matches(&set), a.matches(&set) != b.matches(&set));
        }
    }

    #[rstest]
    #[case("TRUE", true)]
    #[case("true", true)]
    #[case("True", true)]
    #[case("FALSE", false)]
    #[case("!false", true)]
    fn literals_ignore_candidate(#[case] source: &str, #[case] expected: bool) {
        let predicate = compile_ok(source);
        for scalar in SCALARS {
            assert_eq!(predicate.matches(scalar), expected);
        }
    }

    #[rstest]
    #[case("*", "", true)]
    #[case("*", "anything", true)]
    #[case("?", "A", true)]
    #[case("?", "", false)]
    #[case("?", "AB", false)]
    #[case(r"\(A", "(A", true)]
    #[case(r#""(""#, "(", true)]
    #[case("~[a-c]+~", "abc", true)]
    #[case("~[a-c]+~", "abcd", false)]
    #[case("~b~", "abc", false)]
    #[case("~(?i)abc~", "ABC", true)]
    #[case("~a|b~", "b", true)]
    fn leaves_match_whole_scalars(#[case] source: &str, #[case] scalar: &str, #[case] expected: bool) {
        assert_eq!(compile_ok(source).matches(scalar), expected);
    }

    #[test]
    fn set_candidates_use_existential_semantics() {
        let a_and_b = compile_ok("A&B");
        assert!(!a_and_b.matches(&BTreeSet::from(["A"])));
        assert!(a_and_b.matches(&BTreeSet::from(["A", "B"])));

        let glob = compile_ok("A?");
        assert!(!glob.matches(&BTreeSet::from(["A", "B"])));
        assert!(glob.matches(&BTreeSet::from(["X", "AC"])));

        assert!(!compile_ok("?").matches(&BTreeSet::<&str>::new()));
    }

    #[test]
    fn constant_predicates_have_no_expression() {
        let never = Predicate::constant(false);
        assert!(never.expr().is_none());
        assert!(!never.matches("A"));
        assert!(Predicate::constant(true).matches(&Vec::<String>::new()));
    }

    #[test]
    fn invalid_regex_fails_when_built() {
        let Err(err) = Predicate::new(Expr::Regex("(".into())) else {
            panic!("unbalanced regex should be rejected");
        };
        assert!(matches!(err, ExpressionError::InvalidPattern { ref pattern, .. } if pattern == "("));
    }
}
