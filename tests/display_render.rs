// tests/display_render.rs

use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::style::Color;

use ww::display::{Display, DisplayStatus, FullscreenDisplay, InlineDisplay};
use ww::highlight::Highlighter;
use ww_test_utils::builders::ExecutionConfigBuilder;

const LABEL: &str = "make test";

fn inline(width: u16, height: u16) -> InlineDisplay<TestBackend> {
    let mut display = InlineDisplay::new(TestBackend::new(width, height)).unwrap();
    display
        .init(&ExecutionConfigBuilder::new("make", &["test"]).build())
        .unwrap();
    display
}

fn fullscreen(width: u16, height: u16) -> FullscreenDisplay<TestBackend> {
    let mut display = FullscreenDisplay::new(TestBackend::new(width, height)).unwrap();
    display
        .init(&ExecutionConfigBuilder::new("make", &["test"]).build())
        .unwrap();
    display
}

fn row(buf: &Buffer, y: u16) -> String {
    (0..buf.area.width)
        .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn rows(buf: &Buffer) -> Vec<String> {
    (0..buf.area.height).map(|y| row(buf, y)).collect()
}

/// Column where `needle` starts on row `y`.
fn column_of(buf: &Buffer, y: u16, needle: &str) -> u16 {
    let line = row(buf, y);
    let byte = line.find(needle).unwrap();
    line[..byte].chars().count() as u16
}

#[test]
fn inline_draws_label_output_and_result() {
    let mut display = inline(40, 8);
    display.update_status(DisplayStatus::Running, LABEL, "");
    display.on_stdout("an [red]error[reset]\n");
    display.update_status(DisplayStatus::Succeeded, LABEL, "10:00:00");

    assert_eq!(display.status_line(), "[green]success[reset] 10:00:00");

    let buf = display.backend().buffer().clone();
    assert_eq!(row(&buf, 0), LABEL);
    assert_eq!(row(&buf, 1), "an error");
    assert_eq!(row(&buf, 7), "success 10:00:00");

    let x = column_of(&buf, 1, "error");
    assert_eq!(buf.cell((x, 1)).unwrap().fg, Color::Red);
    assert_eq!(buf.cell((0, 1)).unwrap().fg, Color::Reset);
}

#[test]
fn bracketed_output_is_shown_as_written() {
    let mut display = fullscreen(40, 6);
    let line = Highlighter::from_terms(["arr"]).highlight_markup("let x = arr[red] + 1;\n");

    display.on_stdout(&line);
    display.update_status(DisplayStatus::Succeeded, LABEL, "");

    let buf = display.backend().buffer().clone();
    assert_eq!(row(&buf, 1), "let x = arr[red] + 1;");
    // Only the highlighted term is coloured; the literal tag is plain text.
    assert_eq!(buf.cell((column_of(&buf, 1, "arr"), 1)).unwrap().fg, Color::Red);
    assert_eq!(buf.cell((column_of(&buf, 1, "[red]"), 1)).unwrap().fg, Color::Reset);
    assert_eq!(buf.cell((column_of(&buf, 1, "+"), 1)).unwrap().fg, Color::Reset);
}

#[test]
fn failure_detail_with_brackets_is_not_markup() {
    let mut display = inline(60, 4);

    display.update_status(DisplayStatus::Failed, LABEL, "spawn failed: [red] not found");

    let buf = display.backend().buffer().clone();
    assert_eq!(row(&buf, 3), "failed spawn failed: [red] not found");
}

#[test]
fn triggered_clears_only_when_new_output_arrives() {
    let mut display = inline(40, 8);
    display.on_stdout("old\n");

    display.update_status(DisplayStatus::Triggered, LABEL, "");
    assert_eq!(display.text(), "old\n");

    display.on_stdout("new\n");
    assert_eq!(display.text(), "new\n");
}

#[test]
fn waiting_keeps_the_last_result_visible() {
    let mut display = inline(60, 6);
    display.update_status(DisplayStatus::Failed, LABEL, "exit code 2");
    display.update_status(DisplayStatus::Waiting, LABEL, "1s left");

    assert_eq!(
        display.status_line(),
        "[red]failed[reset] exit code 2  [grey]1s left[reset]"
    );
    let buf = display.backend().buffer().clone();
    assert_eq!(row(&buf, 5), "failed exit code 2  1s left");
}

#[test]
fn ended_shows_the_exit_hint() {
    let mut display = inline(40, 8);
    display.on_stdout("done\n");
    display.update_status(DisplayStatus::Ended, LABEL, "");

    assert!(display.text().starts_with("done\n"));
    let shown = rows(display.backend().buffer());
    assert!(shown.iter().any(|r| r == "ww Press Ctrl+C to exit"), "{shown:?}");
}

#[test]
fn fullscreen_header_carries_label_and_status() {
    let mut display = fullscreen(40, 10);
    display.update_status(DisplayStatus::Running, LABEL, "");
    display.on_stdout("line one\n");
    display.update_status(DisplayStatus::Succeeded, LABEL, "10:00:00");

    let buf = display.backend().buffer().clone();
    let header = row(&buf, 0);
    assert!(header.starts_with("make test 10:00:00"), "{header}");
    assert!(header.ends_with("success"), "{header}");
    assert_eq!(buf.cell((0, 0)).unwrap().bg, Color::Green);
    assert_eq!(row(&buf, 1), "line one");

    display.update_status(DisplayStatus::Failed, LABEL, "exit code 1");
    let buf = display.backend().buffer().clone();
    assert!(row(&buf, 0).ends_with("failed"));
    assert_eq!(buf.cell((39, 0)).unwrap().bg, Color::Red);

    display.stop().unwrap();
}

#[test]
fn fullscreen_shows_the_newest_lines() {
    let mut display = fullscreen(30, 10);
    let output: String = (0..30).map(|i| format!("line {i}\n")).collect();

    display.on_stdout(&output);
    display.update_status(DisplayStatus::Succeeded, LABEL, "");

    let buf = display.backend().buffer().clone();
    assert_eq!(row(&buf, 1), "line 21");
    assert_eq!(row(&buf, 9), "line 29");
}

#[test]
fn wide_characters_wrap_by_display_width() {
    let mut display = fullscreen(40, 5);
    // 30 double-width characters take 60 columns: two rows at width 40.
    let wide = "界".repeat(30);

    display.on_stdout(&format!("a\nb\nc\n{wide}\n"));
    display.update_status(DisplayStatus::Succeeded, LABEL, "");

    let buf = display.backend().buffer().clone();
    assert_eq!(row(&buf, 1), "b");
    assert_eq!(row(&buf, 2), "c");
    assert!(row(&buf, 3).starts_with('界'));
    assert!(row(&buf, 4).starts_with('界'));
}

#[test]
fn tabs_expand_to_tab_stops() {
    let mut display = fullscreen(40, 4);

    display.on_stdout("a\tb\n");
    display.update_status(DisplayStatus::Succeeded, LABEL, "");

    assert_eq!(row(display.backend().buffer(), 1), "a       b");
}

#[test]
fn fullscreen_defers_the_clear_like_inline() {
    let mut display = fullscreen(40, 10);
    display.on_stdout("old\n");
    display.update_status(DisplayStatus::Triggered, LABEL, "");
    assert_eq!(display.text(), "old\n");

    display.on_stdout("new\n");
    assert_eq!(display.text(), "new\n");
}
