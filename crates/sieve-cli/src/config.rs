//! Command configuration parsed from environment variables.
//!
//! Settings read here can be overridden on the command line. Environment
//! variables are prefixed with `SIEVE_`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sieve::Aliases;

use crate::error::CliError;

/// Environment variable holding the log level.
pub const LOG_LEVEL_VAR: &str = "SIEVE_LOG_LEVEL";

/// Environment variable naming a JSON alias file.
pub const ALIASES_VAR: &str = "SIEVE_ALIASES";

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Warn` so diagnostics stay out of the filtered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose logging, including alias expansion.
    Trace,
    /// Compiled expressions and per-input progress.
    Debug,
    /// Standard informational messages.
    Info,
    /// Warning messages for potentially problematic situations.
    #[default]
    Warn,
    /// Error messages for failures.
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(CliError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Configuration for the `sieve` command.
///
/// # Environment Variables
///
/// - `SIEVE_LOG_LEVEL`: log level (trace, debug, info, warn, error)
/// - `SIEVE_ALIASES`: path of a JSON object mapping alias names to
///   expressions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log level for diagnostics written to stderr.
    pub log_level: LogLevel,
    /// Alias file loaded before command-line aliases.
    pub aliases_file: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if an environment variable contains
    /// an invalid value.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if a variable contains an invalid
    /// value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(val) => val.parse()?,
            None => LogLevel::default(),
        };
        let aliases_file = lookup(ALIASES_VAR)
            .filter(|val| !val.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            log_level,
            aliases_file,
        })
    }

    /// Apply optional overrides to an existing configuration.
    ///
    /// This is intended for CLI overrides that should take precedence over
    /// environment-based defaults.
    #[must_use]
    pub fn apply_overrides(
        mut self,
        log_level: Option<LogLevel>,
        aliases_file: Option<PathBuf>,
    ) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }

        if let Some(path) = aliases_file {
            self.aliases_file = Some(path);
        }

        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Build the alias map: the alias file first (if any), then `extra` in
    /// order. A later definition of a name replaces its expansion but keeps
    /// its original position.
    ///
    /// # Errors
    ///
    /// Returns an error if the alias file cannot be read or parsed.
    pub fn aliases(
        &self,
        extra: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Aliases, CliError> {
        let mut aliases = match &self.aliases_file {
            Some(path) => load_aliases(path)?,
            None => Aliases::new(),
        };
        aliases.extend(extra);
        Ok(aliases)
    }
}

/// Read a JSON object of alias definitions, preserving key order.
///
/// # Errors
///
/// Returns `CliError::AliasFileIo` or `CliError::AliasFileFormat`.
pub fn load_aliases(path: &Path) -> Result<Aliases, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::AliasFileIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::AliasFileFormat {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a `NAME=VALUE` alias argument.
///
/// The value may itself contain `=`; the name may not be empty.
///
/// # Errors
///
/// Returns `CliError::InvalidConfig` when there is no `=` or the name is
/// empty.
pub fn parse_alias(arg: &str) -> Result<(String, String), CliError> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_owned(), value.to_owned())),
        _ => Err(CliError::InvalidConfig(format!(
            "invalid alias '{arg}', expected NAME=VALUE"
        ))),
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("trace", LogLevel::Trace)]
    #[case("debug", LogLevel::Debug)]
    #[case("info", LogLevel::Info)]
    #[case("warn", LogLevel::Warn)]
    #[case("warning", LogLevel::Warn)]
    #[case("error", LogLevel::Error)]
    #[case("TRACE", LogLevel::Trace)]
    #[case("Debug", LogLevel::Debug)]
    fn log_level_parses_valid_values(#[case] input: &str, #[case] expected: LogLevel) {
        assert_eq!(input.parse::<LogLevel>().ok(), Some(expected));
    }

    #[test]
    fn log_level_rejects_invalid_values() {
        let result = "loud".parse::<LogLevel>();
        assert!(result.unwrap_err().to_string().contains("unknown log level"));
    }

    #[test]
    fn config_reads_environment_variables() {
        let config = CliConfig::from_lookup(|name| match name {
            LOG_LEVEL_VAR => Some("debug".into()),
            ALIASES_VAR => Some("aliases.json".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.aliases_file, Some(PathBuf::from("aliases.json")));
    }

    #[test]
    fn config_defaults_when_environment_is_empty() {
        let config = CliConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn config_rejects_unknown_log_level() {
        let result = CliConfig::from_lookup(|name| (name == LOG_LEVEL_VAR).then(|| "loud".into()));
        assert!(matches!(result, Err(CliError::InvalidConfig(_))));
    }

    #[test]
    fn apply_overrides_updates_selected_fields() {
        let config = CliConfig::default()
            .apply_overrides(Some(LogLevel::Error), Some(PathBuf::from("a.json")));
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.aliases_file, Some(PathBuf::from("a.json")));

        let config = CliConfig::default()
            .with_log_level(LogLevel::Info)
            .apply_overrides(None, None);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.aliases_file.is_none());
    }

    #[rstest]
    #[case("X=A|B", "X", "A|B")]
    #[case("EQ=a=b", "EQ", "a=b")]
    #[case("EMPTY=", "EMPTY", "")]
    fn parses_alias_arguments(#[case] arg: &str, #[case] name: &str, #[case] value: &str) {
        assert_eq!(parse_alias(arg).unwrap(), (name.to_owned(), value.to_owned()));
    }

    #[rstest]
    #[case("X")]
    #[case("=A")]
    fn rejects_malformed_alias_arguments(#[case] arg: &str) {
        assert!(matches!(parse_alias(arg), Err(CliError::InvalidConfig(_))));
    }

    #[test]
    fn command_line_aliases_follow_file_aliases() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Z": "A", "Y": "B"}}"#).unwrap();
        let config = CliConfig::default().apply_overrides(None, Some(file.path().to_path_buf()));

        let aliases = config
            .aliases([("X".to_owned(), "C".to_owned()), ("Z".to_owned(), "D".to_owned())])
            .unwrap();
        let entries: Vec<(&str, &str)> = aliases
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        assert_eq!(entries, [("Z", "D"), ("Y", "B"), ("X", "C")]);
    }

    #[test]
    fn malformed_alias_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["not", "an", "object"]"#).unwrap();
        let result = load_aliases(file.path());
        assert!(matches!(result, Err(CliError::AliasFileFormat { .. })));
    }
}
