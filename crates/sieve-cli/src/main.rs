//! `sieve`: print the lines that match an expression.
//!
//! Exit status is `0` when at least one line was selected, `1` when none
//! were and `2` on any error. If standard output closes early the status
//! reflects the lines selected before it did.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use eyre::{Result, WrapErr};
use sieve::Selector;
use tracing::debug;

use sieve_cli::config::{CliConfig, LogLevel, parse_alias};
use sieve_cli::filter::{FilterOptions, LineFilter};
use sieve_cli::logging::init_logging;

/// Print the lines of FILE (or standard input) selected by EXPRESSION.
///
/// Expressions combine exact text, globs (`*`, `?`), `~regex~` and
/// `"quoted text"` with `!`, `&`, `^` and `|`.
#[derive(Parser, Debug)]
#[command(name = "sieve", version, about)]
struct Args {
    /// Expression each line is matched against.
    expression: String,

    /// Input files; standard input when omitted or `-`.
    files: Vec<PathBuf>,

    /// Print the lines that do not match.
    #[arg(short = 'v', long)]
    invert: bool,

    /// Split each line on SEP and match the parts as a set.
    #[arg(short, long, value_name = "SEP")]
    split: Option<String>,

    /// Print only the number of selected lines.
    #[arg(short, long)]
    count: bool,

    /// Define an alias; may be repeated.
    #[arg(short, long = "alias", value_name = "NAME=VALUE", value_parser = parse_alias)]
    alias: Vec<(String, String)>,

    /// JSON object of alias definitions, applied before `--alias`.
    #[arg(long, value_name = "FILE")]
    aliases: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<LogLevel>,
}

fn main() -> ExitCode {
    let mut args = Args::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config.apply_overrides(args.log_level, args.aliases.take()),
        Err(e) => {
            init_logging(&CliConfig::default());
            return report(&eyre::Report::new(e).wrap_err("invalid environment"));
        }
    };
    init_logging(&config);
    debug!(version = env!("CARGO_PKG_VERSION"), "starting sieve");

    match run(args, &config) {
        Ok(0) => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

fn run(args: Args, config: &CliConfig) -> Result<usize> {
    let aliases = config.aliases(args.alias)?;
    let selector = Selector::new(args.expression).with_aliases(aliases);
    let filter = LineFilter::new(FilterOptions {
        selector,
        invert: args.invert,
        split: args.split,
        count: args.count,
    })
    .wrap_err("cannot compile expression")?;

    Ok(filter.run(&args.files, &mut io::stdout().lock())?)
}

fn report(e: &eyre::Report) -> ExitCode {
    debug!(error = ?e, "sieve failed");
    let _ = writeln!(io::stderr(), "sieve: {e:#}");
    ExitCode::from(2)
}
