// src/config/mod.rs

//! Configuration for ww.
//!
//! Responsibilities:
//! - Split `WW_DEFAULT_ARGS` into arguments (`env.rs`).
//! - Define the immutable execution config (`model.rs`).
//! - Build it from parsed CLI arguments (`loader.rs`).
//! - Reject bad setups before anything runs (`validate.rs`).

pub mod env;
pub mod loader;
pub mod model;
pub mod validate;

pub use env::{args_from_environment, split_default_args, DEFAULT_ARGS_ENV_KEY};
pub use loader::build_execution_config;
pub use model::{ExecutionConfig, OutputMode};
pub use validate::validate_args;
