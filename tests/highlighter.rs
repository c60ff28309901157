// tests/highlighter.rs

use std::collections::HashMap;

use proptest::prelude::*;
use ww::display::markup::{escape, strip_markup};
use ww::highlight::Highlighter;

fn error_in_red() -> Highlighter {
    let map = HashMap::from([("error".to_string(), "[red]".to_string())]);
    Highlighter::new(Some(&map))
}

#[test]
fn term_is_wrapped_in_its_tag() {
    assert_eq!(
        error_in_red().highlight("an error occurred"),
        "an [red]error[reset] occurred"
    );
}

#[test]
fn matching_is_case_insensitive_and_keeps_original_case() {
    assert_eq!(
        error_in_red().highlight("an ERROR occurred"),
        "an [red]ERROR[reset] occurred"
    );
}

#[test]
fn empty_and_absent_configuration_are_identity() {
    let empty = HashMap::new();
    let line = "an error occurred\n";

    assert_eq!(Highlighter::new(Some(&empty)).highlight(line), line);
    assert_eq!(Highlighter::new(None).highlight(line), line);
    assert!(Highlighter::new(None).is_empty());
}

#[test]
fn every_occurrence_of_every_term_is_highlighted() {
    let h = Highlighter::from_terms(["warn", "error"]);

    assert_eq!(
        h.highlight("error, then warn, then error"),
        "[red]error[reset], then [red]warn[reset], then [red]error[reset]"
    );
}

#[test]
fn longer_term_wins_over_its_prefix() {
    let h = Highlighter::from_terms(["err", "error"]);

    assert_eq!(h.highlight("error err"), "[red]error[reset] [red]err[reset]");
}

#[test]
fn terms_are_literal_not_regex() {
    let h = Highlighter::from_terms(["a.b"]);

    assert_eq!(h.highlight("axb a.b"), "axb [red]a.b[reset]");
}

#[test]
fn tag_names_are_not_highlighted_again() {
    let h = Highlighter::from_terms(["red"]);

    assert_eq!(h.highlight("red alert"), "[red]red[reset] alert");
}

#[test]
fn stripped_markup_is_the_original_text() {
    let highlighted = error_in_red().highlight_markup("an error occurred");

    assert_eq!(highlighted, "an [red]error[reset] occurred");
    assert_eq!(strip_markup(&highlighted), "an error occurred");
}

#[test]
fn bracketed_words_in_output_are_escaped() {
    assert_eq!(escape("[red]"), "[red[]");
    assert_eq!(escape("arr[i] and [] stay"), "arr[i[] and [[] stay");
    assert_eq!(escape("no brackets"), "no brackets");
}

#[test]
fn literal_tags_survive_highlighting() {
    let h = Highlighter::from_terms(["arr"]);

    let markup = h.highlight_markup("let x = arr[red] + 1;");
    assert_eq!(markup, "let x = [red]arr[reset][red[] + 1;");
    assert_eq!(strip_markup(&markup), "let x = arr[red] + 1;");
}

#[test]
fn highlight_without_markup_leaves_brackets_alone() {
    assert_eq!(Highlighter::new(None).highlight("[red]"), "[red]");
}

proptest! {
    #[test]
    fn highlighted_markup_strips_back_to_the_input(input in "[\\[\\]a-z ]{0,24}") {
        let h = Highlighter::from_terms(["red", "err"]);
        prop_assert_eq!(strip_markup(&h.highlight_markup(&input)), input);
    }
}
