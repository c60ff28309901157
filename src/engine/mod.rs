// src/engine/mod.rs

//! Orchestration engine for ww.
//!
//! This module ties together:
//! - the executor running one instance of the command at a time
//! - the optional trigger deciding when to run it again
//! - the display showing status and output
//! - the interrupt (Ctrl-C) that ends a wait or quits after the last run
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::exec::ProcessEvent;
use crate::trigger::TriggerEvent;

/// Where the supervisor is in its run / wait cycle.
///
/// `Idle → Starting → Running → {Succeeded|Failed} → WaitingForTrigger →
/// {Starting | Interrupted}`, or `{Succeeded|Failed} → Ended` without a
/// trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Starting,
    Running,
    Succeeded,
    Failed,
    WaitingForTrigger,
    /// Nothing left to run; only a quit request is awaited.
    Ended,
    Interrupted,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Ended | RunState::Interrupted)
    }
}

/// Events flowing into the core from the executor, the trigger and the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Start the first run.
    Launch,
    /// Lifecycle or output of the current run.
    Process(ProcessEvent),
    /// The executor failed before the process started.
    SpawnFailed(String),
    /// Progress or outcome of the current wait.
    Trigger(TriggerEvent),
    /// The user asked to quit while nothing was left to run.
    QuitRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use core::{Clock, CoreRuntime};
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
