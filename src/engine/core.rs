// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`EngineEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - starting processes and reading their events
//! - running trigger wait cycles
//! - calling the display
//!
//! The core is intended to be extensively unit tested without any Tokio,
//! channels, filesystem, or processes.

use std::fmt;

use chrono::{DateTime, Local};

use crate::config::ExecutionConfig;
use crate::engine::event_handlers::{
    handle_output, handle_process_status, handle_spawn_failure, handle_trigger_outcome,
    handle_trigger_progress, start_run, CoreStep,
};
use crate::engine::{EngineEvent, RunState};
use crate::exec::ProcessEvent;
use crate::highlight::Highlighter;
use crate::trigger::TriggerEvent;

/// Source of the time shown after a successful run.
pub type Clock = fn() -> DateTime<Local>;

/// Pure core runtime state.
///
/// This owns:
/// - the current [`RunState`]
/// - the per-stream output buffers of the current run
/// - the output policy, fixed at construction
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
pub struct CoreRuntime {
    pub(super) state: RunState,
    pub(super) buffered: bool,
    pub(super) clear_on_restart: bool,
    pub(super) has_trigger: bool,
    pub(super) highlighter: Highlighter,
    pub(super) stdout_buffer: String,
    pub(super) stderr_buffer: String,
    pub(super) runs: u64,
    pub(super) clock: Clock,
}

impl fmt::Debug for CoreRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreRuntime")
            .field("state", &self.state)
            .field("buffered", &self.buffered)
            .field("has_trigger", &self.has_trigger)
            .field("runs", &self.runs)
            .finish_non_exhaustive()
    }
}

impl CoreRuntime {
    pub fn new(config: &ExecutionConfig) -> Self {
        Self {
            state: RunState::Idle,
            buffered: config.buffered_output(),
            clear_on_restart: config.clear_on_restart,
            has_trigger: config.trigger.is_some(),
            highlighter: config.highlighter.clone(),
            stdout_buffer: String::new(),
            stderr_buffer: String::new(),
            runs: 0,
            clock: Local::now,
        }
    }

    /// Replace the clock (tests pin the success timestamp with this).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Number of runs started so far.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Expose buffered output (for tests).
    pub fn buffered_stdout(&self) -> &str {
        &self.stdout_buffer
    }

    pub fn buffered_stderr(&self) -> &str {
        &self.stderr_buffer
    }

    /// Handle a single engine event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: EngineEvent) -> CoreStep {
        match event {
            EngineEvent::Launch => {
                if self.state != RunState::Idle {
                    return CoreStep::nothing();
                }
                start_run(self)
            }
            EngineEvent::Process(ProcessEvent::Status(status)) => handle_process_status(self, status),
            EngineEvent::Process(ProcessEvent::Stdout(line)) => handle_output(self, &line, false),
            EngineEvent::Process(ProcessEvent::Stderr(line)) => handle_output(self, &line, true),
            EngineEvent::SpawnFailed(error) => handle_spawn_failure(self, error),
            EngineEvent::Trigger(TriggerEvent::Progress(message)) => {
                handle_trigger_progress(self, message)
            }
            EngineEvent::Trigger(TriggerEvent::Resolved(outcome)) => {
                handle_trigger_outcome(self, outcome)
            }
            EngineEvent::QuitRequested => {
                if self.state != RunState::Ended {
                    self.state = RunState::Interrupted;
                }
                CoreStep::exit()
            }
        }
    }
}
