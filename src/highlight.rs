// src/highlight.rs

//! Case-insensitive term highlighting applied to output before display.
//!
//! Highlighting only inserts markup tags such as `[red]` and [`RESET`];
//! turning those tags into colours is the display's job.

use std::borrow::Cow;
use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::display::markup::escape;

/// Tag closing a highlighted span.
pub const RESET: &str = "[reset]";

/// Tag used for terms given with `--color`.
pub const DEFAULT_HIGHLIGHT_TAG: &str = "[red]";

#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    /// One alternation over every term, longest first. `None` when there is
    /// nothing to highlight.
    pattern: Option<Regex>,
    /// Lowercased term -> tag.
    tags: HashMap<String, String>,
}

impl Highlighter {
    /// Create a highlighter from `term -> tag`, e.g. `"error" -> "[red]"`.
    ///
    /// `None`, an empty map and empty terms all highlight nothing. Terms are
    /// matched literally and case-insensitively in a single pass, so inserted
    /// tags are never themselves highlighted.
    pub fn new(highlights: Option<&HashMap<String, String>>) -> Self {
        let mut terms: Vec<(&String, &String)> = highlights
            .into_iter()
            .flatten()
            .filter(|(term, _)| !term.is_empty())
            .collect();
        if terms.is_empty() {
            return Self::default();
        }
        terms.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

        let alternation = terms
            .iter()
            .map(|(term, _)| regex::escape(term))
            .collect::<Vec<_>>()
            .join("|");

        // Escaped literals always compile; an oversized pattern just disables
        // highlighting.
        let pattern = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()
            .ok();

        let tags = terms
            .into_iter()
            .map(|(term, tag)| (term.to_lowercase(), tag.clone()))
            .collect();

        Self { pattern, tags }
    }

    /// Highlight every term from the command line with [`DEFAULT_HIGHLIGHT_TAG`].
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let map: HashMap<String, String> = terms
            .into_iter()
            .map(|t| (t.into(), DEFAULT_HIGHLIGHT_TAG.to_string()))
            .collect();
        Self::new(Some(&map))
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    pub fn highlight(&self, input: &str) -> String {
        self.apply(input, Cow::Borrowed)
    }

    /// Highlight command output for a display: like [`Highlighter::highlight`],
    /// but the command's own text is escaped so only the inserted tags act
    /// as markup.
    pub fn highlight_markup(&self, input: &str) -> String {
        self.apply(input, escape)
    }

    fn apply<'a>(&self, input: &'a str, plain: fn(&'a str) -> Cow<'a, str>) -> String {
        let Some(pattern) = &self.pattern else {
            return plain(input).into_owned();
        };

        let mut out = String::with_capacity(input.len());
        let mut last = 0;
        for found in pattern.find_iter(input) {
            out.push_str(&plain(&input[last..found.start()]));
            let matched = found.as_str();
            match self.tags.get(&matched.to_lowercase()) {
                Some(tag) => {
                    out.push_str(tag);
                    out.push_str(&plain(matched));
                    out.push_str(RESET);
                }
                None => out.push_str(&plain(matched)),
            }
            last = found.end();
        }
        out.push_str(&plain(&input[last..]));
        out
    }
}
