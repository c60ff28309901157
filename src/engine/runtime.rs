// src/engine/runtime.rs

use std::collections::VecDeque;
use std::fmt;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ExecutionConfig;
use crate::display::Display;
use crate::errors::{Result, WwError};
use crate::exec::runner::PROCESS_EVENT_CAPACITY;
use crate::exec::{ExecutorBackend, ProcessEvent, RunningProcess};
use crate::trigger::{InterruptSource, TriggerEvent, TriggerWait};

use super::core::CoreRuntime;
use super::{CoreCommand, EngineEvent};

/// What the shell is currently blocked on.
enum Phase {
    /// Nothing in flight; only queued events can make progress.
    Idle,
    /// A process is running and its events are being read.
    Process {
        events: mpsc::Receiver<ProcessEvent>,
        run: Option<RunningProcess>,
    },
    /// A trigger wait cycle is pending.
    Trigger(TriggerWait),
    /// Nothing left to run; waiting for the user to quit.
    Ended,
}

impl fmt::Debug for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "Idle",
            Phase::Process { .. } => "Process",
            Phase::Trigger(_) => "Trigger",
            Phase::Ended => "Ended",
        };
        f.write_str(name)
    }
}

/// Drives the core state machine in response to process, trigger and user
/// events, and delegates execution to an `ExecutorBackend` and rendering to
/// a `Display`.
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// runtime semantics. It is the only caller of the display and never has
/// more than one process in flight.
pub struct Runtime<E: ExecutorBackend, D: Display> {
    core: CoreRuntime,
    config: ExecutionConfig,
    executor: E,
    display: D,
    interrupt: InterruptSource,
    label: String,
    phase: Phase,
    pending: VecDeque<EngineEvent>,
}

impl<E: ExecutorBackend, D: Display> fmt::Debug for Runtime<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend, D: Display> Runtime<E, D> {
    pub fn new(
        config: ExecutionConfig,
        executor: E,
        display: D,
        interrupt: InterruptSource,
    ) -> Self {
        let core = CoreRuntime::new(&config);
        Self::with_core(core, config, executor, display, interrupt)
    }

    /// Build around an already configured core (e.g. one with a fixed clock).
    pub fn with_core(
        core: CoreRuntime,
        config: ExecutionConfig,
        executor: E,
        display: D,
        interrupt: InterruptSource,
    ) -> Self {
        let label = config.command.label();
        Self {
            core,
            config,
            executor,
            display,
            interrupt,
            label,
            phase: Phase::Idle,
            pending: VecDeque::from([EngineEvent::Launch]),
        }
    }

    /// Main event loop.
    ///
    /// - Initialises the display, then launches the first run.
    /// - Feeds every event into the core runtime.
    /// - Executes commands returned by the core (display updates, process
    ///   start, trigger wait, exit).
    ///
    /// The display is stopped on every exit path. The display is handed back
    /// so callers can inspect what was rendered.
    pub async fn run(mut self) -> Result<D> {
        info!(command = %self.label, "ww runtime started");

        self.display.init(&self.config)?;
        let result = self.drive().await;
        let stopped = self.display.stop();

        info!(state = ?self.core.state(), "runtime exiting");
        result?;
        stopped?;
        Ok(self.display)
    }

    async fn drive(&mut self) -> Result<()> {
        loop {
            let event = match self.pending.pop_front() {
                Some(event) => event,
                None => self.next_event().await?,
            };

            debug!(?event, "runtime received event");

            // Feed the event into the pure core and get commands back.
            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                return Ok(());
            }
        }
    }

    /// Block until the current phase produces the next event.
    async fn next_event(&mut self) -> Result<EngineEvent> {
        match &mut self.phase {
            Phase::Idle => Err(WwError::Other(anyhow!(
                "runtime has nothing to wait for"
            ))),

            Phase::Process { events, run } => match events.recv().await {
                Some(event) => {
                    if is_terminal_event(&event) {
                        // The terminal status is the last event; make sure the
                        // supervising task is done before the next run.
                        if let Some(run) = run.take() {
                            run.finished().await?;
                        }
                        self.phase = Phase::Idle;
                    }
                    Ok(EngineEvent::Process(event))
                }
                None => {
                    let run = run.take();
                    self.phase = Phase::Idle;
                    if let Some(run) = run {
                        run.finished().await?;
                    }
                    Err(WwError::Other(anyhow!(
                        "process events closed without a terminal status"
                    )))
                }
            },

            Phase::Trigger(wait) => match wait.next().await {
                Some(TriggerEvent::Progress(message)) => {
                    Ok(EngineEvent::Trigger(TriggerEvent::Progress(message)))
                }
                Some(TriggerEvent::Resolved(outcome)) => {
                    info!(?outcome, "trigger resolved");
                    self.phase = Phase::Idle;
                    Ok(EngineEvent::Trigger(TriggerEvent::Resolved(outcome)))
                }
                None => {
                    self.phase = Phase::Idle;
                    Err(WwError::Other(anyhow!(
                        "trigger stopped without an outcome"
                    )))
                }
            },

            Phase::Ended => {
                let signal = self.interrupt.wait().await;
                info!(reason = ?signal.reason(), "quit requested");
                self.phase = Phase::Idle;
                Ok(EngineEvent::QuitRequested)
            }
        }
    }

    /// Execute a single command from the core.
    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::UpdateStatus { status, extra } => {
                self.display.update_status(status, &self.label, &extra);
            }
            CoreCommand::Stdout(text) => self.display.on_stdout(&text),
            CoreCommand::Stderr(text) => self.display.on_stderr(&text),
            CoreCommand::StartProcess => self.start_process().await,
            CoreCommand::WaitForTrigger => self.start_wait().await?,
            CoreCommand::AwaitQuit => {
                info!("no trigger configured; waiting for quit");
                self.phase = Phase::Ended;
            }
            CoreCommand::Exit => {
                info!("core issued Exit command");
            }
        }
        Ok(())
    }

    async fn start_process(&mut self) {
        let (tx, rx) = mpsc::channel(PROCESS_EVENT_CAPACITY);
        let command = self.config.command.clone();
        debug!(command = %command, "starting process");

        match self.executor.execute(command, tx).await {
            Ok(run) => {
                self.phase = Phase::Process {
                    events: rx,
                    run: Some(run),
                };
            }
            Err(err) => {
                // Failing to start is an ordinary failed run.
                warn!(error = %err, "command could not be started");
                self.phase = Phase::Idle;
                self.pending.push_back(EngineEvent::SpawnFailed(err.to_string()));
            }
        }
    }

    async fn start_wait(&mut self) -> Result<()> {
        let trigger = self.config.trigger.clone().ok_or_else(|| {
            WwError::Other(anyhow!("asked to wait without a configured trigger"))
        })?;
        debug!(?trigger, "starting wait cycle");
        let wait = trigger.wait_for_trigger(self.interrupt.clone()).await?;
        self.phase = Phase::Trigger(wait);
        Ok(())
    }
}

/// True for the one status that closes an execution.
pub fn is_terminal_event(event: &ProcessEvent) -> bool {
    matches!(event, ProcessEvent::Status(status) if status.is_terminal())
}

