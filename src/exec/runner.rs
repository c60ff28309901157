// src/exec/runner.rs

//! Single process runner.

use std::process::{ExitStatus, Stdio};

use anyhow::anyhow;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::errors::{Result, WwError};

use super::{Command, ExitInfo, ProcessEvent, ProcessStatus};

/// Buffer between the output readers and whoever consumes events.
pub const PROCESS_EVENT_CAPACITY: usize = 256;

/// Handle on a spawned process whose events are still being delivered.
#[derive(Debug)]
pub struct RunningProcess {
    handle: JoinHandle<Result<()>>,
}

impl RunningProcess {
    pub fn new(handle: JoinHandle<Result<()>>) -> Self {
        Self { handle }
    }

    /// Wait until the terminal status has been sent.
    ///
    /// An error here means the process could not be waited on and no terminal
    /// status was (or will be) delivered.
    pub async fn finished(self) -> Result<()> {
        match self.handle.await {
            Ok(result) => result,
            Err(join_err) => Err(WwError::Other(anyhow!(
                "process supervisor task failed: {join_err}"
            ))),
        }
    }
}

/// Spawn `command` and stream its lifecycle into `events`.
///
/// Delivery order on `events`: `Started`, then every stdout / stderr line
/// (each stream in order, no ordering between the two), then exactly one
/// terminal status. The child is reaped only after both pipes reach EOF.
///
/// Spawn and pipe failures are returned directly and emit nothing.
pub async fn spawn_process(
    command: &Command,
    events: mpsc::Sender<ProcessEvent>,
) -> Result<RunningProcess> {
    info!(program = %command.program, args = ?command.args, "starting command");

    let mut process = std::process::Command::new(&command.program);
    process
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // A terminal Ctrl-C goes to the foreground process group only, so the
    // child keeps running when the user interrupts ww.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        process.process_group(0);
    }

    let mut process = tokio::process::Command::from(process);
    let mut child = process.spawn().map_err(|source| WwError::Spawn {
        program: command.program.clone(),
        source,
    })?;

    let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(stdout), Some(stderr)) => (stdout, stderr),
        (stdout, _) => {
            let stream = if stdout.is_none() { "stdout" } else { "stderr" };
            if let Err(err) = child.start_kill() {
                debug!(error = %err, "could not kill child after pipe failure");
            }
            let _ = child.wait().await;
            return Err(WwError::PipeOpen {
                program: command.program.clone(),
                stream,
            });
        }
    };

    if events
        .send(ProcessEvent::Status(ProcessStatus::Started))
        .await
        .is_err()
    {
        debug!("process event receiver dropped before start");
    }

    let mut readers = JoinSet::new();
    readers.spawn(stream_lines(stdout, events.clone(), ProcessEvent::Stdout, "stdout"));
    readers.spawn(stream_lines(stderr, events.clone(), ProcessEvent::Stderr, "stderr"));

    let program = command.program.clone();
    let handle = tokio::spawn(async move {
        // Reap only after both pipes hit EOF so no buffered output is lost.
        while let Some(joined) = readers.join_next().await {
            match joined {
                Ok(StreamEnd::Eof) => {}
                // Nobody reads that pipe any more; a child still writing to
                // it would block forever and never exit.
                Ok(StreamEnd::ReadFailed) => {
                    warn!(program = %program, "output pipe failed; killing command");
                    if let Err(err) = child.start_kill() {
                        debug!(error = %err, "could not kill command");
                    }
                }
                Err(err) => {
                    warn!(program = %program, error = %err, "output reader task failed");
                    if let Err(err) = child.start_kill() {
                        debug!(error = %err, "could not kill command");
                    }
                }
            }
        }

        let exit = child.wait().await.map_err(|source| WwError::Wait {
            program: program.clone(),
            source,
        })?;

        let status = status_from_exit(exit);
        info!(program = %program, ?status, "command exited");

        if events.send(ProcessEvent::Status(status)).await.is_err() {
            debug!("process event receiver dropped before exit status");
        }
        Ok(())
    });

    Ok(RunningProcess::new(handle))
}

/// Callback form of [`spawn_process`]: runs `command` to completion, calling
/// the given closures as events arrive.
///
/// `on_status` sees `Started` before any output and the terminal status
/// after all of it.
pub async fn execute<O, E, S>(
    command: &Command,
    mut on_stdout: O,
    mut on_stderr: E,
    mut on_status: S,
) -> Result<()>
where
    O: FnMut(String),
    E: FnMut(String),
    S: FnMut(ProcessStatus),
{
    let (tx, mut rx) = mpsc::channel(PROCESS_EVENT_CAPACITY);
    let run = spawn_process(command, tx).await?;

    while let Some(event) = rx.recv().await {
        match event {
            ProcessEvent::Status(status) => on_status(status),
            ProcessEvent::Stdout(line) => on_stdout(line),
            ProcessEvent::Stderr(line) => on_stderr(line),
        }
    }

    run.finished().await
}

/// How an output stream stopped being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    Eof,
    /// Reading failed; the rest of the stream was not consumed.
    ReadFailed,
}

/// Forward each line of `pipe` (newline kept) until EOF.
///
/// If the receiver goes away the pipe is still drained, so the child never
/// blocks on a full pipe.
pub async fn stream_lines<R>(
    pipe: R,
    events: mpsc::Sender<ProcessEvent>,
    wrap: fn(String) -> ProcessEvent,
    stream: &'static str,
) -> StreamEnd
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    let mut forwarding = true;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                if !forwarding {
                    continue;
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                if events.send(wrap(line)).await.is_err() {
                    debug!(stream, "process event receiver dropped; draining output");
                    forwarding = false;
                }
            }
            Err(err) => {
                warn!(stream, error = %err, "error reading command output");
                return StreamEnd::ReadFailed;
            }
        }
    }

    debug!(stream, "output stream reached end of input");
    StreamEnd::Eof
}

fn status_from_exit(exit: ExitStatus) -> ProcessStatus {
    if exit.success() {
        return ProcessStatus::Succeeded;
    }
    if let Some(code) = exit.code() {
        return ProcessStatus::Failed(ExitInfo::Code(code));
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = exit.signal() {
            return ProcessStatus::Failed(ExitInfo::Signal(signal));
        }
    }

    ProcessStatus::Failed(ExitInfo::Code(-1))
}
