// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::errors::{Result, WwError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::trigger::{
    InterruptSource, Trigger, TriggerOutcome, TriggerReporter, TriggerWait, WaitStart,
};
use crate::watch::path_utils::relative_display;
use crate::watch::patterns::NameExcludes;
use crate::watch::walk::walk_directory;

/// Progress buffered per cycle before the watcher waits on its reader.
const PROGRESS_CAPACITY: usize = 64;

/// First progress message of every filesystem wait.
pub const WAITING_MESSAGE: &str = "waiting for changes...";

/// Fires on the first create / write / remove / rename / permission change
/// anywhere under `root`.
///
/// Watches are registered per path (registration is not recursive) and are
/// rebuilt from a fresh walk on every cycle, then dropped when the cycle
/// resolves.
#[derive(Debug, Clone)]
pub struct FsChangeTrigger {
    root: PathBuf,
    excludes: NameExcludes,
    fs: Arc<dyn FileSystem>,
}

impl FsChangeTrigger {
    /// Fails if `root` cannot be enumerated or an exclude glob is malformed.
    pub fn new<S: AsRef<str>>(root: impl Into<PathBuf>, name_excludes: &[S]) -> Result<Self> {
        Self::with_fs(root, name_excludes, Arc::new(RealFileSystem))
    }

    /// Like [`FsChangeTrigger::new`], enumerating the tree through `fs`.
    pub fn with_fs<S: AsRef<str>>(
        root: impl Into<PathBuf>,
        name_excludes: &[S],
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let root = root.into();
        // Canonicalize once so event paths and walk paths share a prefix.
        let root = fs.canonicalize(&root).map_err(|e| {
            WwError::ConfigError(format!("cannot read watch root {}: {e:#}", root.display()))
        })?;
        let excludes = NameExcludes::new(name_excludes)?;

        // Walk once now so an unreadable root fails before the first run.
        walk_directory(fs.as_ref(), &root, &excludes)?;

        Ok(Self { root, excludes, fs })
    }
}

impl Trigger for FsChangeTrigger {
    fn wait_for_trigger(&self, interrupt: InterruptSource) -> WaitStart<'_> {
        Box::pin(async move {
            let fs = Arc::clone(&self.fs);
            let root = self.root.clone();
            let excludes = self.excludes.clone();

            // Walking and registering touch the disk once per path.
            let registration =
                tokio::task::spawn_blocking(move || register_watches(fs.as_ref(), &root, &excludes))
                    .await
                    .map_err(|e| WwError::Other(anyhow!("watch registration task failed: {e}")))??;

            let (reporter, wait) = TriggerWait::channel(PROGRESS_CAPACITY);
            let cycle = WatchCycle {
                root: self.root.clone(),
                excludes: self.excludes.clone(),
                watcher: registration.watcher,
                events: registration.events,
            };
            tokio::spawn(cycle.run(interrupt, reporter, registration.failures));

            Ok(wait)
        })
    }
}

/// Watches registered for one cycle, plus the paths that could not be watched.
struct Registration {
    watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    failures: Vec<String>,
}

fn register_watches(
    fs: &dyn FileSystem,
    root: &Path,
    excludes: &NameExcludes,
) -> Result<Registration> {
    let paths = walk_directory(fs, root, excludes)?;

    // Channel from the blocking notify callback into the async world.
    let (event_tx, events) = mpsc::unbounded_channel::<notify::Result<Event>>();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            // The receiver is gone once the cycle resolved; late events
            // are irrelevant.
            let _ = event_tx.send(res);
        },
        Config::default(),
    )?;

    let mut failures = Vec::new();
    for path in &paths {
        if let Err(err) = watcher.watch(path, RecursiveMode::NonRecursive) {
            warn!(path = ?path, error = %err, "failed to watch path; skipping");
            failures.push(format!("cannot watch {} ({err})", relative_display(root, path)));
        }
    }

    debug!(
        root = ?root,
        watched = paths.len() - failures.len(),
        failed = failures.len(),
        "filesystem watches registered"
    );

    Ok(Registration {
        watcher,
        events,
        failures,
    })
}

/// Everything owned by one wait cycle. Dropping it releases the watches.
struct WatchCycle {
    root: PathBuf,
    excludes: NameExcludes,
    watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl WatchCycle {
    async fn run(
        mut self,
        mut interrupt: InterruptSource,
        reporter: TriggerReporter,
        failures: Vec<String>,
    ) {
        for message in failures.into_iter().chain([WAITING_MESSAGE.to_string()]) {
            if !reporter.progress(message).await {
                debug!("filesystem wait abandoned by its consumer");
                return;
            }
        }

        let outcome = loop {
            tokio::select! {
                biased;
                signal = interrupt.wait() => {
                    debug!(reason = ?signal.reason(), "filesystem wait interrupted");
                    break TriggerOutcome::Interrupted;
                }
                received = self.events.recv() => match received {
                    Some(Ok(event)) => {
                        if self.is_relevant(&event) {
                            info!(
                                kind = ?event.kind,
                                paths = ?event.paths.iter().map(|p| relative_display(&self.root, p)).collect::<Vec<_>>(),
                                "change detected"
                            );
                            break TriggerOutcome::Fired;
                        }
                        trace!(?event, "ignoring filesystem event");
                    }
                    Some(Err(err)) => {
                        warn!(error = %err, "watch error");
                        if !reporter.progress(format!("watch error ({err})")).await {
                            return;
                        }
                    }
                    None => {
                        // The watcher owns the sender and lives in `self`.
                        warn!("watch event channel closed unexpectedly");
                        break TriggerOutcome::Interrupted;
                    }
                }
            }
        };

        // Release every watch of this cycle before anyone sees the outcome.
        drop(self);

        reporter.resolve(outcome).await;
    }

    fn is_relevant(&self, event: &Event) -> bool {
        let kind_matters = matches!(
            event.kind,
            EventKind::Any | EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        );
        if !kind_matters {
            return false;
        }

        // Ignore changes that only touch excluded names (e.g. `.git` itself
        // showing up in its parent's watch).
        event.paths.is_empty()
            || event.paths.iter().any(|p| !self.is_excluded(p))
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .any(|c| self.excludes.matches_name(c.as_os_str()))
    }
}
