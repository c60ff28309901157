use std::sync::{Arc, Mutex};
use std::time::Duration;

use ww::config::ExecutionConfig;
use ww::display::{Display, DisplayStatus};
use ww::errors::Result;

/// One call made on a [`RecordingDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    Init { label: String },
    Stop,
    Status {
        status: DisplayStatus,
        label: String,
        extra: String,
    },
    Stdout(String),
    Stderr(String),
}

/// A display that records every call. Clones share the same log, so a test
/// keeps one clone while the runtime owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DisplayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Just the statuses, in order.
    pub fn statuses(&self) -> Vec<DisplayStatus> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DisplayCall::Status { status, .. } => Some(status),
                _ => None,
            })
            .collect()
    }

    /// Concatenated stdout text.
    pub fn stdout(&self) -> String {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DisplayCall::Stdout(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Poll until `pred` holds for the recorded calls.
    pub async fn wait_for<F>(&self, mut pred: F)
    where
        F: FnMut(&[DisplayCall]) -> bool,
    {
        loop {
            if pred(self.calls.lock().unwrap().as_slice()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn record(&self, call: DisplayCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Display for RecordingDisplay {
    fn init(&mut self, config: &ExecutionConfig) -> Result<()> {
        self.record(DisplayCall::Init {
            label: config.command.label(),
        });
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.record(DisplayCall::Stop);
        Ok(())
    }

    fn update_status(&mut self, status: DisplayStatus, command_label: &str, extra_header: &str) {
        self.record(DisplayCall::Status {
            status,
            label: command_label.to_string(),
            extra: extra_header.to_string(),
        });
    }

    fn on_stdout(&mut self, text: &str) {
        self.record(DisplayCall::Stdout(text.to_string()));
    }

    fn on_stderr(&mut self, text: &str) {
        self.record(DisplayCall::Stderr(text.to_string()));
    }
}
