// src/config/validate.rs

use crate::cli::CliArgs;
use crate::errors::{Result, WwError};

/// Check the parsed arguments before anything is constructed from them.
pub fn validate_args(args: &CliArgs) -> Result<()> {
    ensure_has_command(args)?;
    validate_interval(args.interval)?;
    validate_excludes(&args.exclude)?;
    Ok(())
}

fn ensure_has_command(args: &CliArgs) -> Result<()> {
    match args.command.first() {
        Some(program) if !program.trim().is_empty() => Ok(()),
        _ => Err(WwError::ConfigError("a command to run is required".to_string())),
    }
}

/// `0` means run once; anything negative is rejected.
pub fn validate_interval(interval: i64) -> Result<()> {
    if interval < 0 {
        return Err(WwError::ConfigError(format!(
            "invalid --interval: {interval} (expected seconds >= 0)"
        )));
    }
    Ok(())
}

fn validate_excludes(excludes: &[String]) -> Result<()> {
    if let Some(empty) = excludes.iter().position(|e| e.trim().is_empty()) {
        return Err(WwError::ConfigError(format!(
            "--exclude #{} is empty",
            empty + 1
        )));
    }
    Ok(())
}
