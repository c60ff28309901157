// src/trigger/mod.rs

//! Triggers decide when the supervised command runs again.
//!
//! A [`Trigger`] is asked to wait once per cycle. Every wait hands back a
//! [`TriggerWait`]: a single ordered stream of zero or more progress messages
//! followed by exactly one [`TriggerOutcome`]. Progress and outcome share one
//! channel, so a consumer never has to reconcile two independent sources.
//!
//! - [`interval`] fires after a fixed duration, counting down each second.
//! - [`crate::watch`] fires on the first filesystem change under a root.
//! - [`interrupt`] carries the one-shot signal that cuts a wait short.

pub mod interrupt;
pub mod interval;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::errors::Result;

pub use interrupt::{interrupt_channel, InterruptHandle, InterruptSignal, InterruptSource};
pub use interval::IntervalTrigger;

/// How a wait cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The condition was met; run the command again.
    Fired,
    /// The wait was interrupted before the condition was met.
    Interrupted,
}

/// One item from a wait cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Human-readable, non-terminal update (e.g. "2s left").
    Progress(String),
    /// The single terminal item of the cycle.
    Resolved(TriggerOutcome),
}

/// Start of one wait cycle: resolves once the cycle is set up and waiting.
pub type WaitStart<'a> = Pin<Box<dyn Future<Output = Result<TriggerWait>> + Send + 'a>>;

/// Something that can be waited on repeatedly for the next run.
///
/// Implementations spawn their waiting work onto the Tokio runtime and must
/// release any OS resources (timers, watches) before resolving.
pub trait Trigger: Send + Sync + fmt::Debug {
    /// Begin a fresh wait cycle.
    ///
    /// Errors are reserved for failures that make waiting impossible at all
    /// (e.g. the watch root vanished); anything recoverable is reported as
    /// progress instead.
    fn wait_for_trigger(&self, interrupt: InterruptSource) -> WaitStart<'_>;
}

/// Consumer side of one wait cycle.
#[derive(Debug)]
pub struct TriggerWait {
    rx: mpsc::Receiver<TriggerEvent>,
    resolved: bool,
}

impl TriggerWait {
    /// Create a connected reporter / wait pair.
    pub fn channel(capacity: usize) -> (TriggerReporter, TriggerWait) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            TriggerReporter { tx },
            TriggerWait {
                rx,
                resolved: false,
            },
        )
    }

    /// Next progress message or the outcome.
    ///
    /// Returns `None` once the outcome has been delivered, or if the
    /// producer went away without resolving.
    pub async fn next(&mut self) -> Option<TriggerEvent> {
        if self.resolved {
            return None;
        }
        let event = self.rx.recv().await?;
        if matches!(event, TriggerEvent::Resolved(_)) {
            self.resolved = true;
            self.rx.close();
        }
        Some(event)
    }

    /// Drain the cycle, collecting progress until the outcome arrives.
    ///
    /// `None` means the producer stopped without resolving.
    pub async fn finish(mut self) -> Option<(TriggerOutcome, Vec<String>)> {
        let mut progress = Vec::new();
        while let Some(event) = self.next().await {
            match event {
                TriggerEvent::Progress(msg) => progress.push(msg),
                TriggerEvent::Resolved(outcome) => return Some((outcome, progress)),
            }
        }
        None
    }
}

/// Producer side of one wait cycle, owned by the trigger's task.
#[derive(Debug)]
pub struct TriggerReporter {
    tx: mpsc::Sender<TriggerEvent>,
}

impl TriggerReporter {
    /// Send a progress message. Returns `false` when nobody is listening
    /// any more, in which case the trigger should wind down.
    pub async fn progress(&self, message: impl Into<String>) -> bool {
        self.tx
            .send(TriggerEvent::Progress(message.into()))
            .await
            .is_ok()
    }

    /// Deliver the outcome. Consumes the reporter, so a cycle resolves once.
    pub async fn resolve(self, outcome: TriggerOutcome) {
        // A dropped consumer simply no longer cares.
        let _ = self.tx.send(TriggerEvent::Resolved(outcome)).await;
    }
}
