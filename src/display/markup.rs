// src/display/markup.rs

//! Highlight markup and its escaping.
//!
//! Text handed to a display is markup: colour tags such as `[red]` and
//! `[reset]`, with every bracketed word that came from the command escaped
//! as `[word[]`. Escaped brackets render as the original text, so output
//! that happens to contain `[red]` is shown as written.

use std::borrow::Cow;
use std::sync::LazyLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use regex::Regex;

/// Columns between tab stops when output is laid out.
const TAB_WIDTH: usize = 8;

/// Bracketed words that could read as a tag.
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([A-Za-z0-9_:\-]*)\]").expect("bracket regex is valid"));

/// An escaped bracket (group 1) or a colour tag (group 2).
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[([A-Za-z0-9_:\-]*)\[\]|\[(red|green|yellow|blue|magenta|cyan|white|grey|gray|reset|-:-:-)\]",
    )
    .expect("markup token regex is valid")
});

enum Token<'a> {
    Text(Cow<'a, str>),
    /// `None` resets to the default style.
    Color(Option<Color>),
}

fn color_for(name: &str) -> Option<Color> {
    match name {
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "grey" | "gray" => Some(Color::Gray),
        _ => None,
    }
}

/// Make plain text safe to embed in markup.
pub fn escape(text: &str) -> Cow<'_, str> {
    BRACKETED.replace_all(text, "[${1}[]")
}

fn tokens(markup: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in TOKEN.captures_iter(markup) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            out.push(Token::Text(Cow::Borrowed(&markup[last..whole.start()])));
        }
        match (caps.get(1), caps.get(2)) {
            (Some(escaped), _) => out.push(Token::Text(Cow::Owned(format!("[{}]", escaped.as_str())))),
            (None, Some(tag)) => out.push(Token::Color(color_for(tag.as_str()))),
            (None, None) => {}
        }
        last = whole.end();
    }
    if last < markup.len() {
        out.push(Token::Text(Cow::Borrowed(&markup[last..])));
    }
    out
}

/// The plain text a piece of markup shows.
pub fn strip_markup(markup: &str) -> String {
    tokens(markup)
        .into_iter()
        .filter_map(|token| match token {
            Token::Text(text) => Some(text),
            Token::Color(_) => None,
        })
        .collect()
}

/// Styled lines for a piece of markup. A colour carries over line breaks
/// until the next tag; tabs become spaces up to the next tab stop.
pub fn to_text(markup: &str) -> Text<'static> {
    let mut style = Style::default();
    let mut lines = Vec::new();

    for raw_line in markup.lines() {
        let mut spans = Vec::new();
        let mut column = 0;
        for token in tokens(raw_line) {
            match token {
                Token::Text(text) => {
                    spans.push(Span::styled(expand_tabs(&text, &mut column), style));
                }
                Token::Color(Some(color)) => style = Style::default().fg(color),
                Token::Color(None) => style = Style::default(),
            }
        }
        lines.push(Line::from(spans));
    }

    Text::from(lines)
}

fn expand_tabs(text: &str, column: &mut usize) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - *column % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', pad));
            *column += pad;
        } else {
            out.push(ch);
            *column += 1;
        }
    }
    out
}
