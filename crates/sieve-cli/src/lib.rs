//! Library side of the `sieve` command.
//!
//! `sieve` prints the lines of its inputs that match an expression (see
//! [`sieve::compile`] for the syntax). The binary parses arguments and wires
//! these modules together; they are exposed for testing.
//!
//! # Configuration
//!
//! - `SIEVE_LOG_LEVEL`: log verbosity (trace, debug, info, warn, error)
//! - `SIEVE_ALIASES`: JSON file of alias definitions
//!
//! Command-line options override both.

pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
