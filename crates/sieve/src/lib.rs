//! Filter collections, iterators and enumerations with boolean expressions.
//!
//! Each operation takes an optional expression (see [`sieve_expr`] for the
//! syntax), an [`Aliases`] map and a function extracting the key to match.
//! `None` keeps every item; a blank expression keeps none.
//!
//! ```
//! use sieve::{Aliases, filter};
//!
//! struct Job { name: &'static str }
//! let jobs = [Job { name: "lint" }, Job { name: "test-unit" }, Job { name: "test-e2e" }];
//! let aliases = Aliases::new().with("FAST", "lint|test-unit");
//! let picked = filter(jobs, Some("FAST&!lint"), &aliases, |job| job.name)
//!     .expect("example ensures fallible call succeeds");
//! assert_eq!(picked.iter().map(|job| job.name).collect::<Vec<_>>(), ["test-unit"]);
//! ```

mod iter;
mod select;
mod selector;
mod variants;

pub use iter::{ExpressionFilter, FilterByExpression, FlatExpressionFilter};
pub use select::{
    filter, filter_strings, flat_filter, flat_partition, partition, partition_strings, prepare,
};
pub use selector::Selector;
pub use variants::{Variants, partition_variants, select_variants};

pub use sieve_expr::{
    Aliases, AnyOf, Candidate, ExpressionError, Predicate, compile, compile_with_aliases,
};
