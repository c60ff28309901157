// tests/runtime_fake_executor.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::mpsc;

use ww::display::DisplayStatus;
use ww::engine::Runtime;
use ww::errors::WwError;
use ww::exec::{Command, ExecutorBackend, ProcessEvent, ProcessStatus, RunningProcess};
use ww::trigger::{interrupt_channel, IntervalTrigger};
use ww_test_utils::builders::ExecutionConfigBuilder;
use ww_test_utils::fake_executor::{FakeExecutor, FakeRun};
use ww_test_utils::manual_trigger::{ManualTrigger, ScriptedWait};
use ww_test_utils::recording_display::{DisplayCall, RecordingDisplay};

type TestResult = Result<(), Box<dyn Error>>;

fn has_status(calls: &[DisplayCall], wanted: DisplayStatus, times: usize) -> bool {
    calls
        .iter()
        .filter(|c| matches!(c, DisplayCall::Status { status, .. } if *status == wanted))
        .count()
        >= times
}

fn status_extras(display: &RecordingDisplay, wanted: DisplayStatus) -> Vec<String> {
    display
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            DisplayCall::Status { status, extra, .. } if status == wanted => Some(extra),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn single_run_without_trigger_ends_and_quits_on_interrupt() -> TestResult {
    init_tracing();

    let executor = FakeExecutor::new([FakeRun::success(&["hello\n", "world\n"])]);
    let display = RecordingDisplay::new();
    let (handle, source) = interrupt_channel();
    let config = ExecutionConfigBuilder::new("greet", &["all"]).build();

    let runtime = Runtime::new(config, executor.clone(), display.clone(), source);
    let (result, ()) = with_timeout(async {
        tokio::join!(runtime.run(), async {
            display
                .wait_for(|calls| has_status(calls, DisplayStatus::Ended, 1))
                .await;
            handle.interrupt(Some("ctrl-c".to_string()));
        })
    })
    .await;
    result?;

    let calls = display.calls();
    assert_eq!(
        calls.first(),
        Some(&DisplayCall::Init {
            label: "greet all".to_string()
        })
    );
    assert_eq!(calls.last(), Some(&DisplayCall::Stop));
    assert_eq!(
        display.statuses(),
        vec![
            DisplayStatus::Triggered,
            DisplayStatus::Running,
            DisplayStatus::Succeeded,
            DisplayStatus::Ended,
        ]
    );
    // Buffered: one flush with both lines, after the run finished.
    assert!(calls.contains(&DisplayCall::Stdout("hello\nworld\n".to_string())));
    assert_eq!(status_extras(&display, DisplayStatus::Succeeded)[0].len(), "12:34:56".len());
    assert!(calls.iter().all(|c| match c {
        DisplayCall::Status { label, .. } => label == "greet all",
        _ => true,
    }));
    assert_eq!(executor.executed(), vec![Command::new("greet", ["all"])]);
    Ok(())
}

#[tokio::test]
async fn buffered_output_is_flushed_after_running_and_before_the_result() -> TestResult {
    init_tracing();

    let executor = FakeExecutor::new([FakeRun::failure(4, &["out\n"], &["err\n"])]);
    let display = RecordingDisplay::new();
    let (handle, source) = interrupt_channel();
    handle.interrupt(None);
    let config = ExecutionConfigBuilder::new("build", &[]).build();

    let display = with_timeout(Runtime::new(config, executor, display, source).run()).await?;

    let calls = display.calls();
    let running = calls
        .iter()
        .position(|c| matches!(c, DisplayCall::Status { status: DisplayStatus::Running, .. }))
        .unwrap();
    let out = calls
        .iter()
        .position(|c| c == &DisplayCall::Stdout("out\n".to_string()))
        .unwrap();
    let err = calls
        .iter()
        .position(|c| c == &DisplayCall::Stderr("err\n".to_string()))
        .unwrap();
    let failed = calls
        .iter()
        .position(|c| matches!(c, DisplayCall::Status { status: DisplayStatus::Failed, .. }))
        .unwrap();

    assert!(running < out && out < err && err < failed);
    assert_eq!(status_extras(&display, DisplayStatus::Failed), vec!["exit code 4"]);
    Ok(())
}

#[tokio::test]
async fn unbuffered_output_is_streamed_line_by_line() -> TestResult {
    init_tracing();

    let executor = FakeExecutor::new([FakeRun::success(&["a\n", "b\n"])]);
    let display = RecordingDisplay::new();
    let (handle, source) = interrupt_channel();
    handle.interrupt(None);
    let config = ExecutionConfigBuilder::new("list", &[]).unbuffered().build();

    let display = with_timeout(Runtime::new(config, executor, display, source).run()).await?;

    let outputs: Vec<DisplayCall> = display
        .calls()
        .into_iter()
        .filter(|c| matches!(c, DisplayCall::Stdout(_)))
        .collect();
    assert_eq!(
        outputs,
        vec![
            DisplayCall::Stdout("a\n".to_string()),
            DisplayCall::Stdout("b\n".to_string())
        ]
    );
    Ok(())
}

#[tokio::test]
async fn fired_trigger_reruns_the_command() -> TestResult {
    init_tracing();

    let executor = FakeExecutor::new([
        FakeRun::success(&["first\n"]),
        FakeRun::failure(1, &["second\n"], &["bad\n"]),
    ]);
    let trigger = ManualTrigger::new([ScriptedWait::fires(&["1s left"])]);
    let display = RecordingDisplay::new();
    let (handle, source) = interrupt_channel();
    let config = ExecutionConfigBuilder::new("make", &[])
        .trigger(trigger.clone())
        .build();

    let runtime = Runtime::new(config, executor.clone(), display.clone(), source);
    let (result, ()) = with_timeout(async {
        tokio::join!(runtime.run(), async {
            display
                .wait_for(|calls| has_status(calls, DisplayStatus::Failed, 1))
                .await;
            handle.interrupt(Some("ctrl-c".to_string()));
        })
    })
    .await;
    result?;

    assert_eq!(executor.run_count(), 2);
    assert_eq!(trigger.waits(), 2);
    assert_eq!(
        display.statuses(),
        vec![
            DisplayStatus::Triggered,
            DisplayStatus::Running,
            DisplayStatus::Succeeded,
            DisplayStatus::Waiting,
            DisplayStatus::Triggered,
            DisplayStatus::Running,
            DisplayStatus::Failed,
        ]
    );
    assert_eq!(status_extras(&display, DisplayStatus::Waiting), vec!["1s left"]);
    assert_eq!(display.stdout(), "first\nsecond\n");
    assert!(display.calls().contains(&DisplayCall::Stderr("bad\n".to_string())));
    Ok(())
}

#[tokio::test]
async fn spawn_failure_is_shown_and_the_wait_continues() -> TestResult {
    init_tracing();

    let executor = FakeExecutor::new([
        FakeRun::SpawnError("missing binary".to_string()),
        FakeRun::success(&["ok\n"]),
    ]);
    let trigger = ManualTrigger::new([ScriptedWait::fires(&[])]);
    let display = RecordingDisplay::new();
    let (handle, source) = interrupt_channel();
    let config = ExecutionConfigBuilder::new("make", &[]).trigger(trigger).build();

    let runtime = Runtime::new(config, executor.clone(), display.clone(), source);
    let (result, ()) = with_timeout(async {
        tokio::join!(runtime.run(), async {
            display
                .wait_for(|calls| has_status(calls, DisplayStatus::Succeeded, 1))
                .await;
            handle.interrupt(None);
        })
    })
    .await;
    result?;

    assert_eq!(
        display.statuses(),
        vec![
            DisplayStatus::Triggered,
            DisplayStatus::Failed,
            DisplayStatus::Triggered,
            DisplayStatus::Running,
            DisplayStatus::Succeeded,
        ]
    );
    let failure = &status_extras(&display, DisplayStatus::Failed)[0];
    assert!(failure.starts_with("spawn failed:"), "{failure}");
    assert!(failure.contains("missing binary"), "{failure}");
    assert_eq!(executor.run_count(), 2);
    Ok(())
}

#[tokio::test]
async fn interrupt_during_a_run_lets_it_finish_then_ends_the_wait() -> TestResult {
    init_tracing();

    let executor = FakeExecutor::new([FakeRun::success(&["done\n"])]);
    // The scripted wait would fire, but the pending interrupt wins.
    let trigger = ManualTrigger::new([ScriptedWait::fires(&[])]);
    let display = RecordingDisplay::new();
    let (handle, source) = interrupt_channel();
    handle.interrupt(Some("ctrl-c".to_string()));
    let config = ExecutionConfigBuilder::new("make", &[])
        .trigger(trigger.clone())
        .build();

    let display =
        with_timeout(Runtime::new(config, executor.clone(), display, source).run()).await?;

    assert_eq!(executor.run_count(), 1);
    assert_eq!(trigger.waits(), 1);
    assert_eq!(display.stdout(), "done\n");
    assert_eq!(
        display.statuses(),
        vec![
            DisplayStatus::Triggered,
            DisplayStatus::Running,
            DisplayStatus::Succeeded,
        ]
    );
    assert_eq!(display.calls().last(), Some(&DisplayCall::Stop));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn interval_trigger_drives_repeated_runs() -> TestResult {
    init_tracing();

    let executor = FakeExecutor::new([FakeRun::success(&["1\n"]), FakeRun::success(&["2\n"])]);
    let display = RecordingDisplay::new();
    let (handle, source) = interrupt_channel();
    let config = ExecutionConfigBuilder::new("date", &[])
        .trigger(IntervalTrigger::new(Duration::from_secs(2))?)
        .build();

    let runtime = Runtime::new(config, executor.clone(), display.clone(), source);
    let (result, ()) = with_timeout(async {
        tokio::join!(runtime.run(), async {
            display
                .wait_for(|calls| has_status(calls, DisplayStatus::Succeeded, 2))
                .await;
            handle.interrupt(None);
        })
    })
    .await;
    result?;

    assert_eq!(executor.run_count(), 2);
    assert_eq!(status_extras(&display, DisplayStatus::Waiting)[0], "1s left");
    Ok(())
}

/// Starts, then loses track of the child: no terminal status, a wait error.
struct LostChildExecutor;

impl ExecutorBackend for LostChildExecutor {
    fn execute(
        &mut self,
        command: Command,
        events: mpsc::Sender<ProcessEvent>,
    ) -> Pin<Box<dyn Future<Output = ww::errors::Result<RunningProcess>> + Send + '_>> {
        Box::pin(async move {
            let _ = events.send(ProcessEvent::Status(ProcessStatus::Started)).await;
            let handle = tokio::spawn(async move {
                drop(events);
                Err(WwError::Wait {
                    program: command.program,
                    source: io::Error::other("child vanished"),
                })
            });
            Ok(RunningProcess::new(handle))
        })
    }
}

#[tokio::test]
async fn failure_waiting_for_the_child_is_fatal() {
    init_tracing();

    let display = RecordingDisplay::new();
    let (_handle, source) = interrupt_channel();
    let config = ExecutionConfigBuilder::new("make", &[])
        .trigger(ManualTrigger::default())
        .build();

    let result =
        with_timeout(Runtime::new(config, LostChildExecutor, display.clone(), source).run()).await;

    match result {
        Err(WwError::Wait { program, .. }) => assert_eq!(program, "make"),
        Err(e) => panic!("Expected Wait error, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    assert_eq!(display.calls().last(), Some(&DisplayCall::Stop));
    assert!(!display.statuses().contains(&DisplayStatus::Failed));
}
