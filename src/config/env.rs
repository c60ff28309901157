// src/config/env.rs

//! Default arguments supplied through the environment.

use std::sync::LazyLock;

use regex::Regex;

/// Environment variable holding default arguments, e.g. `-c error -s`.
pub const DEFAULT_ARGS_ENV_KEY: &str = "WW_DEFAULT_ARGS";

/// A double-quoted span (kept whole, quotes stripped) or a run of
/// non-whitespace.
static WORD_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|(\S+)"#).expect("word split regex is valid"));

/// Read `WW_DEFAULT_ARGS` and split it into arguments.
///
/// An unset or non-UTF-8 variable yields no arguments.
pub fn args_from_environment() -> Vec<String> {
    std::env::var(DEFAULT_ARGS_ENV_KEY)
        .map(|v| split_default_args(&v))
        .unwrap_or_default()
}

/// Split on whitespace, keeping double-quoted spans as single arguments.
///
/// `""` produces an empty-string argument.
pub fn split_default_args(input: &str) -> Vec<String> {
    WORD_SPLIT
        .captures_iter(input)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}
