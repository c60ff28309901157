// src/trigger/interrupt.rs

//! One-shot interrupt delivered to pending trigger waits.
//!
//! The handle side is held by whoever decides to stop (the Ctrl-C listener in
//! production). Each wait cycle gets its own clone of the source. Once raised
//! the signal stays raised, so a wait that begins after the interrupt
//! resolves immediately.

use std::sync::Arc;

use tokio::sync::watch;

/// Why a wait was interrupted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterruptSignal {
    reason: Option<String>,
}

impl InterruptSignal {
    pub fn new(reason: Option<String>) -> Self {
        Self { reason }
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Raise side of the interrupt.
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    tx: Arc<watch::Sender<Option<InterruptSignal>>>,
}

impl InterruptHandle {
    /// Raise the interrupt. Later calls keep the first reason.
    pub fn interrupt(&self, reason: Option<String>) {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(InterruptSignal::new(reason));
            true
        });
    }

    pub fn is_interrupted(&self) -> bool {
        self.tx.borrow().is_some()
    }
}

/// Observe side of the interrupt, cloned into each wait cycle.
#[derive(Debug, Clone)]
pub struct InterruptSource {
    rx: watch::Receiver<Option<InterruptSignal>>,
}

impl InterruptSource {
    /// A source that is never raised.
    pub fn never() -> Self {
        let (_handle, source) = interrupt_channel();
        source
    }

    pub fn is_interrupted(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Resolve once the interrupt has been raised.
    ///
    /// If every handle is dropped without raising, this never resolves.
    pub async fn wait(&mut self) -> InterruptSignal {
        loop {
            let current = self.rx.borrow_and_update().clone();
            if let Some(signal) = current {
                return signal;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Create a connected handle / source pair.
pub fn interrupt_channel() -> (InterruptHandle, InterruptSource) {
    let (tx, rx) = watch::channel(None);
    (InterruptHandle { tx: Arc::new(tx) }, InterruptSource { rx })
}
