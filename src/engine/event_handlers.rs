// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::{debug, warn};

use crate::display::DisplayStatus;
use crate::engine::core::CoreRuntime;
use crate::engine::RunState;
use crate::exec::{ExitInfo, ProcessStatus};
use crate::trigger::TriggerOutcome;

/// Format of the time shown after a successful run.
pub const SUCCESS_TIME_FORMAT: &str = "%H:%M:%S";

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Forward a status change to the display.
    UpdateStatus {
        status: DisplayStatus,
        extra: String,
    },
    /// Write (already highlighted) stdout text to the display.
    Stdout(String),
    /// Write (already highlighted) stderr text to the display.
    Stderr(String),
    /// Start one execution of the configured command.
    StartProcess,
    /// Begin a fresh wait cycle on the configured trigger.
    WaitForTrigger,
    /// Nothing left to run; wait for the user to quit.
    AwaitQuit,
    /// Stop the runtime.
    Exit,
}

/// Decision returned by the core after handling a single `EngineEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    pub fn cont(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    pub fn exit() -> Self {
        Self {
            commands: vec![CoreCommand::Exit],
            keep_running: false,
        }
    }

    pub fn nothing() -> Self {
        Self::cont(Vec::new())
    }
}

/// Begin a run: on launch, or when a wait fired.
///
/// With clear-on-restart the display is told a run was triggered; it clears
/// only once the new run writes output.
pub fn start_run(core: &mut CoreRuntime) -> CoreStep {
    let mut commands = Vec::new();
    if core.clear_on_restart {
        commands.push(status(DisplayStatus::Triggered, ""));
    }

    core.stdout_buffer.clear();
    core.stderr_buffer.clear();
    core.runs += 1;
    core.state = RunState::Starting;
    commands.push(CoreCommand::StartProcess);

    CoreStep::cont(commands)
}

/// Handle one process status.
pub fn handle_process_status(core: &mut CoreRuntime, process_status: ProcessStatus) -> CoreStep {
    match process_status {
        ProcessStatus::Started => {
            if core.state != RunState::Starting {
                warn!(state = ?core.state, "process started outside of a run; ignoring");
                return CoreStep::nothing();
            }
            core.state = RunState::Running;
            CoreStep::cont(vec![status(DisplayStatus::Running, "")])
        }
        ProcessStatus::Succeeded => finish_run(core, None),
        ProcessStatus::Failed(info) => finish_run(core, Some(info)),
    }
}

/// Handle one line of command output.
///
/// Lines are escaped and highlighted here. Buffered mode keeps them per stream until the
/// run finishes; unbuffered mode forwards them at once.
pub fn handle_output(core: &mut CoreRuntime, line: &str, is_stderr: bool) -> CoreStep {
    if core.state != RunState::Running {
        debug!(state = ?core.state, "dropping output received outside of a run");
        return CoreStep::nothing();
    }

    let text = core.highlighter.highlight_markup(line);
    if core.buffered {
        let buffer = if is_stderr {
            &mut core.stderr_buffer
        } else {
            &mut core.stdout_buffer
        };
        buffer.push_str(&text);
        return CoreStep::nothing();
    }

    let command = if is_stderr {
        CoreCommand::Stderr(text)
    } else {
        CoreCommand::Stdout(text)
    };
    CoreStep::cont(vec![command])
}

/// The executor could not start the process at all.
pub fn handle_spawn_failure(core: &mut CoreRuntime, error: String) -> CoreStep {
    if core.state != RunState::Starting {
        warn!(state = ?core.state, %error, "spawn failure outside of a run; ignoring");
        return CoreStep::nothing();
    }
    finish_run(core, Some(ExitInfo::SpawnError(error)))
}

/// Relay a wait progress message as a non-terminal status.
pub fn handle_trigger_progress(core: &mut CoreRuntime, message: String) -> CoreStep {
    if core.state != RunState::WaitingForTrigger {
        debug!(state = ?core.state, %message, "dropping trigger progress outside of a wait");
        return CoreStep::nothing();
    }
    CoreStep::cont(vec![status(DisplayStatus::Waiting, &message)])
}

/// `Fired` starts the next run, `Interrupted` ends the supervisor.
pub fn handle_trigger_outcome(core: &mut CoreRuntime, outcome: TriggerOutcome) -> CoreStep {
    if core.state != RunState::WaitingForTrigger {
        warn!(state = ?core.state, ?outcome, "trigger resolved outside of a wait; ignoring");
        return CoreStep::nothing();
    }
    match outcome {
        TriggerOutcome::Fired => start_run(core),
        TriggerOutcome::Interrupted => {
            core.state = RunState::Interrupted;
            CoreStep::exit()
        }
    }
}

/// Flush buffered output, report the result, then either wait for the
/// trigger or end.
fn finish_run(core: &mut CoreRuntime, failure: Option<ExitInfo>) -> CoreStep {
    if !matches!(core.state, RunState::Starting | RunState::Running) {
        warn!(state = ?core.state, "terminal status outside of a run; ignoring");
        return CoreStep::nothing();
    }

    let mut commands = Vec::new();

    if core.buffered {
        if !core.stdout_buffer.is_empty() {
            commands.push(CoreCommand::Stdout(std::mem::take(&mut core.stdout_buffer)));
        }
        if !core.stderr_buffer.is_empty() {
            commands.push(CoreCommand::Stderr(std::mem::take(&mut core.stderr_buffer)));
        }
    }

    match failure {
        None => {
            core.state = RunState::Succeeded;
            let finished_at = (core.clock)().format(SUCCESS_TIME_FORMAT).to_string();
            commands.push(status(DisplayStatus::Succeeded, &finished_at));
        }
        Some(info) => {
            core.state = RunState::Failed;
            commands.push(status(DisplayStatus::Failed, &info.to_string()));
        }
    }

    if core.has_trigger {
        core.state = RunState::WaitingForTrigger;
        commands.push(CoreCommand::WaitForTrigger);
    } else {
        core.state = RunState::Ended;
        commands.push(status(DisplayStatus::Ended, ""));
        commands.push(CoreCommand::AwaitQuit);
    }

    CoreStep::cont(commands)
}

fn status(status: DisplayStatus, extra: &str) -> CoreCommand {
    CoreCommand::UpdateStatus {
        status,
        extra: extra.to_string(),
    }
}
