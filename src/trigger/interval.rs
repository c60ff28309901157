// src/trigger/interval.rs

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::errors::{Result, WwError};

use super::{InterruptSource, Trigger, TriggerOutcome, TriggerReporter, TriggerWait, WaitStart};

/// Cap on progress buffering for very long intervals.
const MAX_PROGRESS_CAPACITY: u64 = 64;

/// Fires once a fixed duration has elapsed.
///
/// While waiting it counts down once per whole second: a 3s interval reports
/// "2s left" and "1s left", then fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTrigger {
    interval: Duration,
}

impl IntervalTrigger {
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(WwError::ConfigError(
                "interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self { interval })
    }

    pub fn from_secs(secs: u64) -> Result<Self> {
        Self::new(Duration::from_secs(secs))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Trigger for IntervalTrigger {
    fn wait_for_trigger(&self, interrupt: InterruptSource) -> WaitStart<'_> {
        // Enough room for every countdown message plus the outcome, so the
        // timer never stalls on a slow reader.
        let capacity = self.interval.as_secs().min(MAX_PROGRESS_CAPACITY) + 1;
        let (reporter, wait) = TriggerWait::channel(capacity as usize);

        tokio::spawn(count_down(self.interval, interrupt, reporter));

        Box::pin(async move { Ok(wait) })
    }
}

async fn count_down(interval: Duration, mut interrupt: InterruptSource, reporter: TriggerReporter) {
    let whole_secs = interval.as_secs();
    let fraction = interval - Duration::from_secs(whole_secs);

    let outcome = 'wait: {
        if !fraction.is_zero() && !tick(fraction, &mut interrupt).await {
            break 'wait TriggerOutcome::Interrupted;
        }

        for remaining in (0..whole_secs).rev() {
            if !tick(Duration::from_secs(1), &mut interrupt).await {
                break 'wait TriggerOutcome::Interrupted;
            }
            if remaining > 0 && !reporter.progress(format!("{remaining}s left")).await {
                debug!("interval wait abandoned by its consumer");
                return;
            }
        }

        TriggerOutcome::Fired
    };

    debug!(?outcome, ?interval, "interval wait resolved");
    reporter.resolve(outcome).await;
}

/// Sleep for `duration`. Returns `false` if interrupted first.
async fn tick(duration: Duration, interrupt: &mut InterruptSource) -> bool {
    tokio::select! {
        biased;
        signal = interrupt.wait() => {
            debug!(reason = ?signal.reason(), "interval wait interrupted");
            false
        }
        _ = sleep(duration) => true,
    }
}
