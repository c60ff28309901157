use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use ww::errors::{Result, WwError};
use ww::exec::{Command, ExecutorBackend, ExitInfo, ProcessEvent, ProcessStatus, RunningProcess};

/// What one scripted execution does.
#[derive(Debug, Clone)]
pub enum FakeRun {
    /// Start, print the given lines, then finish with `status`.
    Completes {
        stdout: Vec<String>,
        stderr: Vec<String>,
        status: ProcessStatus,
    },
    /// Fail to start with the given message.
    SpawnError(String),
}

impl FakeRun {
    pub fn success(stdout: &[&str]) -> Self {
        FakeRun::Completes {
            stdout: stdout.iter().map(|s| s.to_string()).collect(),
            stderr: Vec::new(),
            status: ProcessStatus::Succeeded,
        }
    }

    pub fn failure(code: i32, stdout: &[&str], stderr: &[&str]) -> Self {
        FakeRun::Completes {
            stdout: stdout.iter().map(|s| s.to_string()).collect(),
            stderr: stderr.iter().map(|s| s.to_string()).collect(),
            status: ProcessStatus::Failed(ExitInfo::Code(code)),
        }
    }
}

/// A fake executor that:
/// - records every command it was asked to run
/// - plays back scripted runs in order (a silent success once the script is
///   exhausted), honouring the `Started` / output / terminal ordering.
#[derive(Clone, Default)]
pub struct FakeExecutor {
    script: Arc<Mutex<VecDeque<FakeRun>>>,
    executed: Arc<Mutex<Vec<Command>>>,
}

impl FakeExecutor {
    pub fn new<I: IntoIterator<Item = FakeRun>>(runs: I) -> Self {
        Self {
            script: Arc::new(Mutex::new(runs.into_iter().collect())),
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Commands executed so far.
    pub fn executed(&self) -> Vec<Command> {
        self.executed.lock().unwrap().clone()
    }

    pub fn run_count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }
}

impl ExecutorBackend for FakeExecutor {
    fn execute(
        &mut self,
        command: Command,
        events: mpsc::Sender<ProcessEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<RunningProcess>> + Send + '_>> {
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| FakeRun::success(&[]));
        self.executed.lock().unwrap().push(command.clone());

        Box::pin(async move {
            let (stdout, stderr, status) = match next {
                FakeRun::SpawnError(message) => {
                    return Err(WwError::Spawn {
                        program: command.program.clone(),
                        source: io::Error::new(io::ErrorKind::NotFound, message),
                    });
                }
                FakeRun::Completes {
                    stdout,
                    stderr,
                    status,
                } => (stdout, stderr, status),
            };

            events
                .send(ProcessEvent::Status(ProcessStatus::Started))
                .await
                .map_err(anyhow::Error::from)?;

            let handle = tokio::spawn(async move {
                for line in stdout {
                    let _ = events.send(ProcessEvent::Stdout(line)).await;
                }
                for line in stderr {
                    let _ = events.send(ProcessEvent::Stderr(line)).await;
                }
                let _ = events.send(ProcessEvent::Status(status)).await;
                Ok(())
            });

            Ok(RunningProcess::new(handle))
        })
    }
}
