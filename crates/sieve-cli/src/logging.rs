//! Structured logging with environment variable configuration.
//!
//! Logs are written to stderr so they never mix with filtered lines on
//! stdout.

use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

fn filter_from_config(config: &CliConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Initialise the logging subsystem based on configuration.
///
/// Records emitted through the `log` facade by the `sieve` libraries are
/// forwarded to the same subscriber.
///
/// # Environment Variables
///
/// Log level precedence (highest to lowest):
///
/// 1. CLI `--log-level` (parsed into `config.log_level`)
/// 2. `SIEVE_LOG_LEVEL` (parsed into `config.log_level`)
/// 3. Default configuration value
///
/// # Note
///
/// If a global subscriber is already set, this function silently ignores
/// the error. The first subscriber wins.
pub fn init_logging(config: &CliConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
