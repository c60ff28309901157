// tests/default_args.rs

use proptest::prelude::*;

use ww::cli::with_default_args;
use ww::config::split_default_args;

#[test]
fn quoted_span_is_one_argument() {
    assert_eq!(
        split_default_args(r#"-c word -s --colour "hello world""#),
        vec!["-c", "word", "-s", "--colour", "hello world"]
    );
}

#[test]
fn empty_quotes_yield_an_empty_argument() {
    assert_eq!(split_default_args(r#"-c """#), vec!["-c", ""]);
}

#[test]
fn blank_input_yields_nothing() {
    assert!(split_default_args("").is_empty());
    assert!(split_default_args("   \t ").is_empty());
}

#[test]
fn two_quoted_spans_stay_separate() {
    assert_eq!(
        split_default_args(r#""a b" "c d""#),
        vec!["a b", "c d"]
    );
}

#[test]
fn defaults_go_between_program_name_and_user_arguments() {
    let merged = with_default_args(
        ["ww", "-n", "5", "make"],
        vec!["-c".to_string(), "error".to_string()],
    );

    assert_eq!(merged, vec!["ww", "-c", "error", "-n", "5", "make"]);
}

proptest! {
    #[test]
    fn plain_words_round_trip_through_whitespace(
        words in proptest::collection::vec("[a-zA-Z0-9_./=-]{1,12}", 0..8),
        sep in "[ \t]{1,3}",
    ) {
        let joined = words.join(&sep);
        prop_assert_eq!(split_default_args(&joined), words);
    }

    #[test]
    fn quoted_spans_keep_inner_whitespace(
        inner in proptest::collection::vec("[a-z]{1,6}", 1..4),
    ) {
        let span = inner.join(" ");
        let input = format!("-c \"{span}\" -s");
        prop_assert_eq!(
            split_default_args(&input),
            vec!["-c".to_string(), span, "-s".to_string()]
        );
    }
}
