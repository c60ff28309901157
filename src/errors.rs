// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WwError {
    /// Bad setup detected before the first run (invalid interval, unreadable
    /// watch root, malformed exclude glob, ...).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open {stream} pipe for `{program}`")]
    PipeOpen {
        program: String,
        stream: &'static str,
    },

    /// Waiting on a spawned child failed for a reason other than a
    /// non-zero exit. Always fatal.
    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("Display error: {0}")]
    Display(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WwError>;
