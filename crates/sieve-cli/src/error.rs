//! Error types for the `sieve` command.

use std::path::PathBuf;

use sieve::ExpressionError;
use thiserror::Error;

/// Failures that stop the command before or while filtering.
#[derive(Debug, Error)]
pub enum CliError {
    /// A configuration value (environment or command line) is malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The alias file could not be read.
    #[error("failed to read aliases from {}: {source}", .path.display())]
    AliasFileIo {
        /// Path given on the command line or in the environment.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The alias file is not a JSON object of strings.
    #[error("invalid alias file {}: {source}", .path.display())]
    AliasFileFormat {
        /// Path given on the command line or in the environment.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The expression does not compile.
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// An input file could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Input {
        /// Input path, or `-` for standard input.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Writing to standard output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
