// src/display/inline.rs

use std::io::{self, Stdout};

use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Style, Stylize};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal, TerminalOptions, Viewport};
use tracing::warn;

use crate::config::ExecutionConfig;
use crate::errors::{Result, WwError};

use super::markup::to_text;
use super::screen::{output_tail, Screen};
use super::{Display, DisplayStatus};

/// Draws below the cursor (command label, output tail, status line) and
/// redraws that block in place, like a progress display. The last frame
/// stays in the scrollback when ww exits.
pub struct InlineDisplay<B: Backend = CrosstermBackend<Stdout>> {
    terminal: Terminal<B>,
    screen: Screen,
}

impl InlineDisplay<CrosstermBackend<Stdout>> {
    pub fn stdout() -> Result<Self> {
        Self::new(CrosstermBackend::new(io::stdout()))
    }
}

impl<B: Backend> InlineDisplay<B> {
    /// Reserve the terminal's height below the cursor.
    pub fn new(backend: B) -> Result<Self> {
        let rows = backend
            .size()
            .map_err(|e| WwError::Display(format!("cannot read terminal size: {e}")))?
            .height;
        let terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(rows),
            },
        )
        .map_err(|e| WwError::Display(format!("cannot open terminal: {e}")))?;

        Ok(Self {
            terminal,
            screen: Screen::default(),
        })
    }

    /// Output currently held, as markup.
    pub fn text(&self) -> &str {
        self.screen.text()
    }

    /// The bottom status line, as markup.
    pub fn status_line(&self) -> String {
        self.screen.status_markup()
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    fn redraw(&mut self) -> Result<()> {
        let screen = &self.screen;
        self.terminal
            .draw(|frame| draw(frame, screen))
            .map_err(|e| WwError::Display(format!("inline redraw failed: {e}")))?;
        self.screen.mark_drawn();
        Ok(())
    }

    fn redraw_or_log(&mut self) {
        if let Err(err) = self.redraw() {
            warn!(error = %err, "inline display redraw failed");
        }
    }
}

fn draw(frame: &mut Frame, screen: &Screen) {
    let [label_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(Span::styled(screen.label.clone(), Style::default().bold())),
        label_area,
    );
    frame.render_widget(output_tail(screen.text(), body_area), body_area);
    frame.render_widget(Paragraph::new(to_text(&screen.status_markup())), status_area);
}

impl<B: Backend + Send> Display for InlineDisplay<B> {
    fn init(&mut self, config: &ExecutionConfig) -> Result<()> {
        self.screen.label = config.command.label();
        self.redraw()
    }

    fn stop(&mut self) -> Result<()> {
        self.redraw()?;

        // Leave the cursor on a fresh line below the last frame.
        let bottom = self.terminal.get_frame().area().bottom();
        self.terminal
            .set_cursor_position((0, bottom.saturating_sub(1)))
            .map_err(|e| WwError::Display(format!("moving the cursor failed: {e}")))?;
        self.terminal
            .backend_mut()
            .append_lines(1)
            .map_err(|e| WwError::Display(format!("moving the cursor failed: {e}")))?;
        self.terminal
            .show_cursor()
            .map_err(|e| WwError::Display(format!("restoring the cursor failed: {e}")))
    }

    fn update_status(&mut self, status: DisplayStatus, command_label: &str, extra_header: &str) {
        if self.screen.set_status(status, command_label, extra_header) {
            self.redraw_or_log();
        }
    }

    fn on_stdout(&mut self, text: &str) {
        if self.screen.append(text) {
            self.redraw_or_log();
        }
    }

    fn on_stderr(&mut self, text: &str) {
        self.on_stdout(text);
    }
}
