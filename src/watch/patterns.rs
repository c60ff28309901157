// src/watch/patterns.rs

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::errors::Result;

/// Shell-style globs matched against a single path component (the basename),
/// e.g. `.git`, `*.swp`, `target`.
#[derive(Clone)]
pub struct NameExcludes {
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for NameExcludes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameExcludes")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl NameExcludes {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pat in patterns {
            // `*` must not cross `/`, matching shell semantics for a name.
            let glob = GlobBuilder::new(pat.as_ref())
                .literal_separator(true)
                .build()?;
            builder.add(glob);
        }

        Ok(Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            set: builder.build()?,
        })
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matches_name(&self, name: &OsStr) -> bool {
        self.set.is_match(Path::new(name))
    }

    /// True if the basename of `path` is excluded. Paths without a basename
    /// (e.g. `/`) never are.
    pub fn matches_basename(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| self.matches_name(name))
    }
}
