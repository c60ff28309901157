// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the supervised command,
//! using `tokio::process::Command`, and reporting back to the orchestration
//! runtime via [`ProcessEvent`]s.
//!
//! - [`command`] holds the immutable [`Command`] and its shell-wrapped form.
//! - [`runner`] spawns one process and streams its stdout/stderr line by line.
//! - [`backend`] provides the `ExecutorBackend` trait and the concrete
//!   `RealExecutorBackend` the runtime uses in production, and which tests
//!   can replace with a fake implementation.

pub mod backend;
pub mod command;
pub mod runner;

use std::fmt;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use command::{login_shell, Command};
pub use runner::{execute, spawn_process, stream_lines, RunningProcess, StreamEnd};

/// Why a run did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitInfo {
    /// Exited with a non-zero code.
    Code(i32),
    /// Killed by a signal (Unix only).
    Signal(i32),
    /// Never started; carries the spawn error text.
    SpawnError(String),
}

impl fmt::Display for ExitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitInfo::Code(code) => write!(f, "exit code {code}"),
            ExitInfo::Signal(signal) => write!(f, "signal {signal}"),
            ExitInfo::SpawnError(err) => write!(f, "spawn failed: {err}"),
        }
    }
}

/// Lifecycle of one execution: exactly one `Started` followed by exactly one
/// terminal status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessStatus {
    Started,
    Succeeded,
    Failed(ExitInfo),
}

impl ProcessStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProcessStatus::Started)
    }
}

/// Everything a running process reports, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Status(ProcessStatus),
    /// One stdout line including its trailing newline (if it had one).
    Stdout(String),
    /// One stderr line including its trailing newline (if it had one).
    Stderr(String),
}
