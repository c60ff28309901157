// src/config/loader.rs

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{ExecutionConfig, OutputMode};
use crate::config::validate::validate_args;
use crate::errors::{Result, WwError};
use crate::exec::{login_shell, Command};
use crate::highlight::Highlighter;
use crate::trigger::{IntervalTrigger, Trigger};
use crate::watch::FsChangeTrigger;

/// Turn parsed arguments into the immutable [`ExecutionConfig`].
///
/// This is the recommended entry point for the rest of the application:
///
/// - Validates the arguments.
/// - Applies `--shell` wrapping.
/// - Picks the trigger: `--watch` wins over `--interval`; an interval of 0
///   means no trigger at all.
/// - Builds the highlighter from `--color` terms.
pub fn build_execution_config(args: &CliArgs) -> Result<ExecutionConfig> {
    validate_args(args)?;

    let mut command = Command::from_argv(&args.command)
        .ok_or_else(|| WwError::ConfigError("a command to run is required".to_string()))?;
    if args.shell {
        command = command.shell_wrap(&login_shell());
    }

    let trigger = build_trigger(args)?;

    let config = ExecutionConfig {
        command,
        trigger,
        output_mode: if args.unbuffered {
            OutputMode::Unbuffered
        } else {
            OutputMode::Buffered
        },
        clear_on_restart: !args.no_clear,
        highlighter: Highlighter::from_terms(args.color.iter().cloned()),
    };

    debug!(?config, "execution config built");
    Ok(config)
}

fn build_trigger(args: &CliArgs) -> Result<Option<Arc<dyn Trigger>>> {
    if args.watch {
        let root = watch_root(args)?;
        return Ok(Some(Arc::new(FsChangeTrigger::new(root, &args.exclude)?)));
    }

    let secs = u64::try_from(args.interval).map_err(|_| {
        WwError::ConfigError(format!("invalid --interval: {}", args.interval))
    })?;
    if secs == 0 {
        return Ok(None);
    }
    Ok(Some(Arc::new(IntervalTrigger::from_secs(secs)?)))
}

/// `--dir` if given, otherwise the current working directory.
pub fn watch_root(args: &CliArgs) -> Result<PathBuf> {
    match &args.dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(|e| {
            WwError::ConfigError(format!("cannot determine current directory: {e}"))
        }),
    }
}
