#![allow(dead_code)]

use std::cell::RefCell;

use ww::errors::Result;
use ww::exec::{execute, Command, ProcessStatus};

pub use ww_test_utils::{init_tracing, with_timeout};

/// Everything a command reported, in the order it was delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivered {
    Status(ProcessStatus),
    Stdout(String),
    Stderr(String),
}

/// Run `script` with `sh -c`.
pub fn sh(script: &str) -> Command {
    Command::new("sh", ["-c", script])
}

/// Run `command` through the callback executor and record every callback.
pub async fn run_recorded(command: &Command) -> Result<Vec<Delivered>> {
    let log = RefCell::new(Vec::new());
    execute(
        command,
        |line| log.borrow_mut().push(Delivered::Stdout(line)),
        |line| log.borrow_mut().push(Delivered::Stderr(line)),
        |status| log.borrow_mut().push(Delivered::Status(status)),
    )
    .await?;
    Ok(log.into_inner())
}

pub fn stdout_of(log: &[Delivered]) -> Vec<String> {
    log.iter()
        .filter_map(|d| match d {
            Delivered::Stdout(line) => Some(line.clone()),
            _ => None,
        })
        .collect()
}

pub fn stderr_of(log: &[Delivered]) -> Vec<String> {
    log.iter()
        .filter_map(|d| match d {
            Delivered::Stderr(line) => Some(line.clone()),
            _ => None,
        })
        .collect()
}

pub fn statuses_of(log: &[Delivered]) -> Vec<ProcessStatus> {
    log.iter()
        .filter_map(|d| match d {
            Delivered::Status(status) => Some(status.clone()),
            _ => None,
        })
        .collect()
}
