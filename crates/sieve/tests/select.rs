//! Behavioural tests for the application layer.

use std::collections::BTreeSet;

use rstest::{fixture, rstest};
use sieve::{
    Aliases, ExpressionError, FilterByExpression, Selector, filter, filter_strings, flat_filter,
    flat_partition, partition, partition_strings,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Named {
    value: &'static str,
}

#[fixture]
fn objects() -> Vec<Named> {
    ["A", "B", "C"].map(|value| Named { value }).to_vec()
}

fn ok<T>(result: Result<T, ExpressionError>) -> T {
    result.unwrap_or_else(|err| panic!("expression should compile: {err}"))
}

fn values(items: &[Named]) -> Vec<&'static str> {
    items.iter().map(|item| item.value).collect()
}

#[rstest]
#[case(Some("A"), &["A"])]
#[case(Some("!A"), &["B", "C"])]
#[case(Some("A|B"), &["A", "B"])]
#[case(Some(""), &[])]
#[case(None, &["A", "B", "C"])]
fn filters_objects_by_key(
    objects: Vec<Named>,
    #[case] expression: Option<&str>,
    #[case] expected: &[&str],
) {
    let picked = ok(filter(objects, expression, &Aliases::new(), |o| o.value));
    assert_eq!(values(&picked), expected);
}

#[rstest]
fn partitions_objects_by_key(objects: Vec<Named>) {
    let (hit, miss) = ok(partition(objects, Some("A"), &Aliases::new(), |o| o.value));
    assert_eq!(values(&hit), ["A"]);
    assert_eq!(values(&miss), ["B", "C"]);
}

#[rstest]
fn aliases_select_whole_groups(objects: Vec<Named>) {
    let aliases = Aliases::new().with("ALL", "A|B|C");
    let picked = ok(filter(objects.clone(), Some("ALL"), &aliases, |o| o.value));
    assert_eq!(picked, objects);
}

#[rstest]
#[case("A")]
#[case("!A")]
#[case("A*|~B|C~")]
#[case("A^B")]
#[case("FALSE")]
#[case("!(A&B)|C")]
fn partition_agrees_with_filter(objects: Vec<Named>, #[case] expression: &str) {
    let filtered = ok(filter(objects.clone(), Some(expression), &Aliases::new(), |o| o.value));
    let (hit, miss) = ok(partition(
        objects.clone(),
        Some(expression),
        &Aliases::new(),
        |o| o.value,
    ));
    assert_eq!(hit, filtered);
    assert!(hit.iter().all(|item| !miss.contains(item)));
    assert_eq!(hit.len() + miss.len(), objects.len());
}

#[test]
fn string_items_are_their_own_key() {
    let items = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    let picked = ok(filter_strings(&items, Some("!B"), &Aliases::new()));
    assert_eq!(picked, ["A", "C"]);

    let (hit, miss) = ok(partition_strings(items.clone(), None, &Aliases::new()));
    assert_eq!(hit, items);
    assert!(miss.is_empty());
}

fn keyed_sets() -> Vec<(u32, BTreeSet<&'static str>)> {
    vec![
        (1, BTreeSet::from(["A"])),
        (2, BTreeSet::from(["B"])),
        (3, BTreeSet::from(["A", "B"])),
    ]
}

#[test]
fn set_keys_match_when_every_leaf_finds_an_element() {
    let picked = ok(filter(keyed_sets(), Some("A&B"), &Aliases::new(), |(_, keys)| {
        keys.clone()
    }));
    assert_eq!(picked.iter().map(|(id, _)| *id).collect::<Vec<_>>(), [3]);
}

#[test]
fn flat_keys_behave_like_set_keys() {
    let (hit, miss) = ok(flat_partition(
        keyed_sets(),
        Some("A&!B"),
        &Aliases::new(),
        |(_, keys)| keys.iter().copied().collect::<Vec<_>>(),
    ));
    assert_eq!(hit.iter().map(|(id, _)| *id).collect::<Vec<_>>(), [1]);
    assert_eq!(miss.iter().map(|(id, _)| *id).collect::<Vec<_>>(), [2, 3]);
}

#[test]
fn glob_matches_single_character_suffix() {
    let items = ["A", "AA", "AB", "AC"];
    let picked = ok(flat_filter(items, Some("A?"), &Aliases::new(), |key| [*key]));
    assert_eq!(picked, ["AA", "AB", "AC"]);
}

#[test]
fn errors_are_returned_not_swallowed() {
    let err = filter(["A"], Some("A&(B"), &Aliases::new(), |s| *s);
    assert!(matches!(err, Err(ExpressionError::InvalidExpression(_))));

    let err = filter(["A"], Some("~[~"), &Aliases::new(), |s| *s);
    assert!(matches!(err, Err(ExpressionError::InvalidPattern { .. })));
}

#[test]
fn lazy_adapter_filters_unbounded_sources() {
    let first: Vec<u32> = ok((1..).filter_by_expression(
        Some("~[0-9]*7~"),
        &Aliases::new(),
        ToString::to_string,
    ))
    .take(3)
    .collect();
    assert_eq!(first, [7, 17, 27]);
}

#[test]
fn selector_wraps_expression_and_aliases() {
    let selector = Selector::new("X&!B").with_alias("X", "A|B");
    let picked = ok(selector.filter(["A", "B", "C"], |s| *s));
    assert_eq!(picked, ["A"]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Lint,
    UnitTest,
    IntegrationTest,
}

sieve::impl_variants!(Stage { Lint, UnitTest, IntegrationTest });

#[test]
fn selector_selects_enum_variants() {
    let selector = Selector::new("*Test&!Unit*");
    assert_eq!(ok(selector.select_variants::<Stage>()), [Stage::IntegrationTest]);

    let (hit, miss) = ok(Selector::all().partition_variants::<Stage>());
    assert_eq!(hit, [Stage::Lint, Stage::UnitTest, Stage::IntegrationTest]);
    assert!(miss.is_empty());
}

#[cfg(feature = "serde")]
#[test]
fn selector_deserializes_from_configuration() {
    let selector: Selector = serde_json::from_str(
        r#"{"expression": "FAST", "aliases": {"FAST": "lint|unit"}}"#,
    )
    .unwrap_or_else(|err| panic!("selector should parse: {err}"));
    assert_eq!(selector, Selector::new("FAST").with_alias("FAST", "lint|unit"));

    let empty: Selector =
        serde_json::from_str("{}").unwrap_or_else(|err| panic!("selector should parse: {err}"));
    assert_eq!(empty, Selector::all());
}
