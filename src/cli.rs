// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Arguments found in `WW_DEFAULT_ARGS` are spliced in front of the real
//! command line before parsing, so anything given explicitly can still
//! extend or override them.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::env::args_from_environment;

/// Command-line arguments for `ww`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ww",
    version,
    about = "Run a command repeatedly and watch its output.",
    long_about = None
)]
pub struct CliArgs {
    /// Re-run the command every N seconds (0 runs it once).
    #[arg(short = 'n', long, value_name = "SECONDS", default_value_t = 2, allow_negative_numbers = true)]
    pub interval: i64,

    /// Re-run whenever files under the watch root change.
    ///
    /// Takes precedence over `--interval`.
    #[arg(short, long)]
    pub watch: bool,

    /// Run the command inside the login shell (`$SHELL -c ...`).
    #[arg(short, long)]
    pub shell: bool,

    /// Highlight the given text in the output (case-insensitive, repeatable).
    #[arg(short = 'c', long = "color", visible_alias = "colour", value_name = "TERM")]
    pub color: Vec<String>,

    /// Skip files and directories whose name matches this glob (repeatable).
    #[arg(short = 'x', long, value_name = "GLOB", default_value = ".git")]
    pub exclude: Vec<String>,

    /// Full-screen view instead of the inline view.
    #[arg(short, long)]
    pub fullscreen: bool,

    /// Stream output as it arrives instead of showing it when the run ends.
    #[arg(short, long)]
    pub unbuffered: bool,

    /// Keep the previous run's output when the command starts again.
    #[arg(long)]
    pub no_clear: bool,

    /// Root directory for `--watch` (defaults to the current directory).
    #[arg(short = 'C', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WW_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// The command to run, followed by its arguments.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse the process arguments, with `WW_DEFAULT_ARGS` prepended.
pub fn parse() -> CliArgs {
    CliArgs::parse_from(with_default_args(std::env::args_os(), args_from_environment()))
}

/// Insert `defaults` right after the program name in `argv`.
pub fn with_default_args<I>(argv: I, defaults: Vec<String>) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let mut argv = argv.into_iter().map(Into::into);
    let mut merged: Vec<OsString> = argv.next().into_iter().collect();
    merged.extend(defaults.into_iter().map(OsString::from));
    merged.extend(argv);
    merged
}
