use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ww::trigger::{InterruptSource, Trigger, TriggerOutcome, TriggerWait, WaitStart};

/// One scripted wait cycle.
#[derive(Debug, Clone)]
pub struct ScriptedWait {
    pub progress: Vec<String>,
    /// `None` waits for the interrupt.
    pub outcome: Option<TriggerOutcome>,
}

impl ScriptedWait {
    pub fn fires(progress: &[&str]) -> Self {
        Self {
            progress: progress.iter().map(|s| s.to_string()).collect(),
            outcome: Some(TriggerOutcome::Fired),
        }
    }

    pub fn until_interrupted(progress: &[&str]) -> Self {
        Self {
            progress: progress.iter().map(|s| s.to_string()).collect(),
            outcome: None,
        }
    }
}

/// A trigger whose cycles are scripted up front. Once the script runs out,
/// every further cycle waits for the interrupt. An interrupt raised before a
/// scripted outcome always wins.
#[derive(Debug, Clone, Default)]
pub struct ManualTrigger {
    script: Arc<Mutex<VecDeque<ScriptedWait>>>,
    waits: Arc<AtomicUsize>,
}

impl ManualTrigger {
    pub fn new<I: IntoIterator<Item = ScriptedWait>>(cycles: I) -> Self {
        Self {
            script: Arc::new(Mutex::new(cycles.into_iter().collect())),
            waits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of wait cycles started so far.
    pub fn waits(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }
}

impl Trigger for ManualTrigger {
    fn wait_for_trigger(&self, mut interrupt: InterruptSource) -> WaitStart<'_> {
        self.waits.fetch_add(1, Ordering::SeqCst);
        let cycle = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ScriptedWait::until_interrupted(&[]));

        let (reporter, wait) = TriggerWait::channel(cycle.progress.len() + 1);
        tokio::spawn(async move {
            for message in cycle.progress {
                if !reporter.progress(message).await {
                    return;
                }
            }
            let outcome = match cycle.outcome {
                Some(_) if interrupt.is_interrupted() => TriggerOutcome::Interrupted,
                Some(outcome) => outcome,
                None => {
                    interrupt.wait().await;
                    TriggerOutcome::Interrupted
                }
            };
            reporter.resolve(outcome).await;
        });

        Box::pin(async move { Ok(wait) })
    }
}
