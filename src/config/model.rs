// src/config/model.rs

use std::fmt;
use std::sync::Arc;

use crate::exec::Command;
use crate::highlight::Highlighter;
use crate::trigger::Trigger;

/// When command output reaches the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Hold output per stream and show it when the run finishes (no
    /// mid-run flicker).
    #[default]
    Buffered,
    /// Forward every line as soon as it is read.
    Unbuffered,
}

/// Everything the supervisor needs, built once at startup and never
/// mutated afterwards.
#[derive(Clone)]
pub struct ExecutionConfig {
    pub command: Command,

    /// `None` runs the command once and then idles until the user quits.
    pub trigger: Option<Arc<dyn Trigger>>,

    pub output_mode: OutputMode,

    /// Ask the display to clear previous output when a new run starts.
    pub clear_on_restart: bool,

    pub highlighter: Highlighter,
}

impl ExecutionConfig {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            trigger: None,
            output_mode: OutputMode::default(),
            clear_on_restart: true,
            highlighter: Highlighter::default(),
        }
    }

    pub fn buffered_output(&self) -> bool {
        self.output_mode == OutputMode::Buffered
    }
}

impl fmt::Debug for ExecutionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionConfig")
            .field("command", &self.command)
            .field("trigger", &self.trigger)
            .field("output_mode", &self.output_mode)
            .field("clear_on_restart", &self.clear_on_restart)
            .finish_non_exhaustive()
    }
}
