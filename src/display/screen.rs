// src/display/screen.rs

//! State and widgets shared by both views.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::widgets::{Paragraph, Wrap};

use super::markup::{escape, to_text};
use super::{DisplayStatus, EXIT_HINT};

/// Output-only redraws closer together than this are skipped; the next
/// status change always redraws.
const OUTPUT_REDRAW_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
pub(crate) struct Screen {
    pub(crate) label: String,
    status: Option<DisplayStatus>,
    extra: String,
    /// Result of the last finished run, kept while waiting.
    last_result: Option<(DisplayStatus, String)>,
    text: String,
    clear_on_next_output: bool,
    last_draw: Option<Instant>,
}

impl Screen {
    /// Record a status change. Returns whether the view should redraw.
    pub(crate) fn set_status(
        &mut self,
        status: DisplayStatus,
        command_label: &str,
        extra_header: &str,
    ) -> bool {
        self.label = command_label.to_string();

        match status {
            // Clearing right away would flash an empty screen for slow
            // commands; wait for the first output instead.
            DisplayStatus::Triggered => {
                self.clear_on_next_output = true;
                return false;
            }
            DisplayStatus::Ended => {
                self.text.push('\n');
                self.text.push_str(EXIT_HINT);
                self.text.push('\n');
            }
            DisplayStatus::Succeeded | DisplayStatus::Failed => {
                self.last_result = Some((status, extra_header.to_string()));
                self.status = Some(status);
                self.extra.clear();
            }
            DisplayStatus::Waiting | DisplayStatus::Running => {
                self.status = Some(status);
                self.extra = extra_header.to_string();
            }
        }
        true
    }

    /// Append output markup. Returns whether a redraw is due.
    pub(crate) fn append(&mut self, markup: &str) -> bool {
        if self.clear_on_next_output {
            self.text.clear();
            self.clear_on_next_output = false;
        }
        self.text.push_str(markup);

        self.last_draw
            .is_none_or(|at| at.elapsed() >= OUTPUT_REDRAW_INTERVAL)
    }

    pub(crate) fn mark_drawn(&mut self) {
        self.last_draw = Some(Instant::now());
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    /// The status to colour the view by: while waiting, the last result.
    pub(crate) fn shown_status(&self) -> DisplayStatus {
        match (self.status, &self.last_result) {
            (Some(DisplayStatus::Waiting), Some((result, _))) => *result,
            (Some(status), _) => status,
            (None, _) => DisplayStatus::Running,
        }
    }

    /// Plain detail text next to the status: the result detail, followed by
    /// trigger progress while waiting.
    pub(crate) fn detail(&self) -> String {
        match (self.status, &self.last_result) {
            (Some(DisplayStatus::Waiting), Some((_, result_extra))) => {
                format!("{result_extra} {}", self.extra).trim().to_string()
            }
            (Some(DisplayStatus::Succeeded | DisplayStatus::Failed), Some((_, result_extra))) => {
                result_extra.clone()
            }
            _ => self.extra.clone(),
        }
    }

    /// One-line status in markup, e.g. `[green]success[reset] 10:00:00`.
    pub(crate) fn status_markup(&self) -> String {
        match (self.status, &self.last_result) {
            (Some(DisplayStatus::Waiting), Some((result, result_extra))) => format!(
                "{}  [grey]{}[reset]",
                result_markup(*result, result_extra),
                escape(&self.extra)
            ),
            (Some(DisplayStatus::Waiting), None) => {
                format!("[grey]{}[reset]", escape(&self.extra))
            }
            (Some(status @ (DisplayStatus::Succeeded | DisplayStatus::Failed)), Some((_, extra))) => {
                result_markup(status, extra)
            }
            (Some(status), _) => result_markup(status, &self.extra),
            (None, _) => String::new(),
        }
    }
}

fn result_markup(status: DisplayStatus, extra_header: &str) -> String {
    let tag = match status {
        DisplayStatus::Succeeded => "[green]",
        DisplayStatus::Failed => "[red]",
        _ => "[grey]",
    };
    if extra_header.is_empty() {
        format!("{tag}{}[reset]", status.name())
    } else {
        format!("{tag}{}[reset] {}", status.name(), escape(extra_header))
    }
}

/// The newest output that fits `area`, wrapped at its width.
pub(crate) fn output_tail(markup: &str, area: Rect) -> Paragraph<'static> {
    let height = usize::from(area.height);
    let lines: Vec<&str> = markup.lines().collect();
    // Every line takes at least one row, so older lines cannot show.
    let start = lines.len().saturating_sub(height);

    let paragraph = Paragraph::new(to_text(&lines[start..].join("\n"))).wrap(Wrap { trim: false });
    let rows = paragraph.line_count(area.width);
    let scroll = u16::try_from(rows.saturating_sub(height)).unwrap_or(u16::MAX);
    paragraph.scroll((scroll, 0))
}
