// src/watch/mod.rs

//! Filesystem-change trigger.
//!
//! This module is responsible for:
//! - Compiling the basename exclude globs (`patterns`).
//! - Enumerating the watch tree through the [`crate::fs`] seam (`walk`).
//! - Registering per-path `notify` watches for one wait cycle and turning
//!   the first relevant event into a trigger outcome (`watcher`).

pub mod path_utils;
pub mod patterns;
pub mod walk;
pub mod watcher;

pub use patterns::NameExcludes;
pub use walk::walk_directory;
pub use watcher::{FsChangeTrigger, WAITING_MESSAGE};
