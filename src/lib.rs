// src/lib.rs

pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod highlight;
pub mod logging;
pub mod trigger;
pub mod watch;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::build_execution_config;
use crate::display::{Display, FullscreenDisplay, InlineDisplay};
use crate::engine::Runtime;
use crate::exec::RealExecutorBackend;
use crate::trigger::{interrupt_channel, InterruptHandle};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config building (trigger choice, shell wrap, highlighter)
/// - the display picked by `--fullscreen`
/// - executor
/// - Ctrl-C handling
/// - the runtime itself
pub async fn run(args: CliArgs) -> Result<()> {
    let config = build_execution_config(&args)?;
    info!(command = %config.command, trigger = ?config.trigger, "starting ww");

    let (handle, interrupt) = interrupt_channel();
    spawn_ctrl_c_listener(handle);

    let display: Box<dyn Display> = if args.fullscreen {
        Box::new(FullscreenDisplay::stdout()?)
    } else {
        Box::new(InlineDisplay::stdout()?)
    };

    let runtime = Runtime::new(config, RealExecutorBackend::new(), display, interrupt);
    runtime.run().await?;

    debug!("runtime finished cleanly");
    Ok(())
}

/// Every Ctrl-C raises the interrupt. The first one wins; later presses
/// are harmless.
fn spawn_ctrl_c_listener(handle: InterruptHandle) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            info!("Ctrl+C received");
            handle.interrupt(Some("ctrl-c".to_string()));
        }
    });
}
