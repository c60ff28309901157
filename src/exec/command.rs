// src/exec/command.rs

//! The command being supervised, and its shell-wrapped form.

use std::fmt;

/// Shell used for `--shell` when `$SHELL` is not set.
pub const FALLBACK_SHELL: &str = "/bin/sh";

/// An external program plus its arguments. Never mutated after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub program: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from `[program, args...]` as collected from the command line.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.iter().cloned()))
    }

    /// Human-readable `program arg1 arg2 ...` used as the display header.
    pub fn label(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    /// Run this command through `shell -c "<program> <args...>"`.
    ///
    /// Arguments containing a space or tab are wrapped in double quotes so the
    /// shell splits the line back into the original arguments. Arguments that
    /// already contain a double quote are passed through unescaped.
    pub fn shell_wrap(&self, shell: &str) -> Command {
        let line = std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|arg| quote_if_spaced(arg)))
            .collect::<Vec<_>>()
            .join(" ");

        Command::new(shell, ["-c".to_string(), line])
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn quote_if_spaced(arg: &str) -> String {
    if arg.contains(' ') || arg.contains('\t') {
        format!("\"{arg}\"")
    } else {
        arg.to_string()
    }
}

/// The user's login shell from `$SHELL`, or [`FALLBACK_SHELL`].
pub fn login_shell() -> String {
    std::env::var("SHELL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_SHELL.to_string())
}
