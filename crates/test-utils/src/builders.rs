#![allow(dead_code)]

use std::sync::Arc;

use ww::config::{ExecutionConfig, OutputMode};
use ww::exec::Command;
use ww::highlight::Highlighter;
use ww::trigger::Trigger;

/// Builder for `ExecutionConfig` to simplify test setup.
pub struct ExecutionConfigBuilder {
    config: ExecutionConfig,
    terms: Vec<String>,
}

impl ExecutionConfigBuilder {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            config: ExecutionConfig::new(Command::new(program, args.iter().copied())),
            terms: Vec::new(),
        }
    }

    pub fn trigger<T: Trigger + 'static>(mut self, trigger: T) -> Self {
        self.config.trigger = Some(Arc::new(trigger));
        self
    }

    pub fn unbuffered(mut self) -> Self {
        self.config.output_mode = OutputMode::Unbuffered;
        self
    }

    pub fn no_clear(mut self) -> Self {
        self.config.clear_on_restart = false;
        self
    }

    pub fn highlight(mut self, term: &str) -> Self {
        self.terms.push(term.to_string());
        self
    }

    pub fn build(mut self) -> ExecutionConfig {
        if !self.terms.is_empty() {
            self.config.highlighter = Highlighter::from_terms(self.terms);
        }
        self.config
    }
}
