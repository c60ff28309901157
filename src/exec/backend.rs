// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime talks to an `ExecutorBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake executor in tests while
//! keeping the production implementation in [`super::runner`].

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::errors::Result;

use super::runner::{spawn_process, RunningProcess};
use super::{Command, ProcessEvent};

/// Trait abstracting how the supervised command is executed.
///
/// Production code uses [`RealExecutorBackend`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ExecutorBackend: Send {
    /// Start one execution of `command`.
    ///
    /// On success the implementation must deliver, on `events`, one
    /// `Started`, any output, then exactly one terminal status, and drop its
    /// senders afterwards. On error nothing may be delivered.
    fn execute(
        &mut self,
        command: Command,
        events: mpsc::Sender<ProcessEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<RunningProcess>> + Send + '_>>;
}

/// Real executor backend used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealExecutorBackend;

impl RealExecutorBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn execute(
        &mut self,
        command: Command,
        events: mpsc::Sender<ProcessEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<RunningProcess>> + Send + '_>> {
        Box::pin(async move { spawn_process(&command, events).await })
    }
}
