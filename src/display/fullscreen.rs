// src/display/fullscreen.rs

use std::io::{self, Stdout};

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::{Frame, Terminal};
use tracing::warn;

use crate::config::ExecutionConfig;
use crate::errors::{Result, WwError};

use super::screen::{output_tail, Screen};
use super::{Display, DisplayStatus};

/// Takes over the whole terminal (alternate screen): a header row with the
/// command and status, and the newest output filling the rest.
pub struct FullscreenDisplay<B: Backend = CrosstermBackend<Stdout>> {
    terminal: Terminal<B>,
    screen: Screen,
    /// Switch the real terminal to the alternate screen on init / stop.
    alternate_screen: bool,
    active: bool,
}

impl FullscreenDisplay<CrosstermBackend<Stdout>> {
    pub fn stdout() -> Result<Self> {
        let mut display = Self::new(CrosstermBackend::new(io::stdout()))?;
        display.alternate_screen = true;
        Ok(display)
    }
}

impl<B: Backend> FullscreenDisplay<B> {
    pub fn new(backend: B) -> Result<Self> {
        let terminal = Terminal::new(backend)
            .map_err(|e| WwError::Display(format!("cannot open terminal: {e}")))?;
        Ok(Self {
            terminal,
            screen: Screen::default(),
            alternate_screen: false,
            active: false,
        })
    }

    /// Output currently held, as markup.
    pub fn text(&self) -> &str {
        self.screen.text()
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    fn redraw(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        let screen = &self.screen;
        self.terminal
            .draw(|frame| draw(frame, screen))
            .map_err(|e| WwError::Display(format!("fullscreen redraw failed: {e}")))?;
        self.screen.mark_drawn();
        Ok(())
    }

    fn redraw_or_log(&mut self) {
        if let Err(err) = self.redraw() {
            warn!(error = %err, "fullscreen redraw failed");
        }
    }
}

fn header_style(status: DisplayStatus) -> Style {
    match status {
        DisplayStatus::Failed => Style::default().fg(Color::White).bg(Color::Red),
        DisplayStatus::Succeeded => Style::default().fg(Color::Black).bg(Color::Green),
        _ => Style::default().fg(Color::Black).bg(Color::Gray),
    }
}

fn draw(frame: &mut Frame, screen: &Screen) {
    let [header_area, body_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(frame.area());

    let status = screen.shown_status();
    let style = header_style(status);
    let name = status.name();
    let [left_area, right_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(name.len() as u16),
    ])
    .areas(header_area);

    frame.render_widget(Block::default().style(style), header_area);

    let detail = screen.detail();
    let mut left = vec![Span::raw(screen.label.clone())];
    if !detail.is_empty() {
        left.push(Span::raw(" "));
        left.push(Span::raw(detail));
    }
    frame.render_widget(Paragraph::new(Line::from(left)).style(style), left_area);
    frame.render_widget(Paragraph::new(name).style(style), right_area);

    frame.render_widget(output_tail(screen.text(), body_area), body_area);
}

impl<B: Backend + Send> Display for FullscreenDisplay<B> {
    fn init(&mut self, config: &ExecutionConfig) -> Result<()> {
        self.screen.label = config.command.label();
        if self.alternate_screen {
            execute!(io::stdout(), EnterAlternateScreen)
                .map_err(|e| WwError::Display(format!("entering full screen failed: {e}")))?;
            self.terminal
                .clear()
                .map_err(|e| WwError::Display(format!("clearing the screen failed: {e}")))?;
        }
        self.active = true;
        self.redraw()
    }

    fn stop(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.terminal
            .show_cursor()
            .map_err(|e| WwError::Display(format!("restoring the cursor failed: {e}")))?;
        if self.alternate_screen {
            execute!(io::stdout(), LeaveAlternateScreen)
                .map_err(|e| WwError::Display(format!("leaving full screen failed: {e}")))?;
        }
        Ok(())
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
