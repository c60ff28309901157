// src/display/mod.rs

//! Rendering of status and command output.
//!
//! The runtime is the only caller of a [`Display`] and never calls it
//! concurrently. Output arrives as markup (see [`markup`]); labels and
//! status text arrive as plain text. Both views draw through `ratatui`.

pub mod fullscreen;
pub mod inline;
pub mod markup;
mod screen;

use crate::config::ExecutionConfig;
use crate::errors::Result;

pub use fullscreen::FullscreenDisplay;
pub use inline::InlineDisplay;

/// Message appended to the output once there is nothing left to run.
pub const EXIT_HINT: &str = "[red]ww [yellow]Press Ctrl+C to exit[reset]";

/// What the supervisor is doing, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    /// A new run is about to start. Output should be cleared, but only when
    /// the new run writes its first output.
    Triggered,
    Running,
    Succeeded,
    Failed,
    /// Waiting for the trigger; the extra header carries its progress.
    Waiting,
    /// Nothing left to run; show the exit hint.
    Ended,
}

impl DisplayStatus {
    pub fn name(&self) -> &'static str {
        match self {
            DisplayStatus::Triggered => "triggered",
            DisplayStatus::Running => "running",
            DisplayStatus::Succeeded => "success",
            DisplayStatus::Failed => "failed",
            DisplayStatus::Waiting => "waiting",
            DisplayStatus::Ended => "ended",
        }
    }
}

/// A renderer for one supervisor.
pub trait Display: Send {
    /// Prepare the terminal and draw the initial frame.
    fn init(&mut self, config: &ExecutionConfig) -> Result<()>;

    /// Restore the terminal.
    fn stop(&mut self) -> Result<()>;

    fn update_status(&mut self, status: DisplayStatus, command_label: &str, extra_header: &str);

    fn on_stdout(&mut self, text: &str);

    fn on_stderr(&mut self, text: &str);
}

impl<D: Display + ?Sized> Display for Box<D> {
    fn init(&mut self, config: &ExecutionConfig) -> Result<()> {
        (**self).init(config)
    }

    fn stop(&mut self) -> Result<()> {
        (**self).stop()
    }

    fn update_status(&mut self, status: DisplayStatus, command_label: &str, extra_header: &str) {
        (**self).update_status(status, command_label, extra_header)
    }

    fn on_stdout(&mut self, text: &str) {
        (**self).on_stdout(text)
    }

    fn on_stderr(&mut self, text: &str) {
        (**self).on_stderr(text)
    }
}
