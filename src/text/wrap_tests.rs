//! Tests for logical-line wrapping.

use super::*;
use crate::text::{strip_escapes, visible_width};

fn plain(lines: &[PhysicalLine]) -> Vec<String> {
    lines.iter().map(|l| strip_escapes(l.as_str())).collect()
}

// ===== Basic Packing =====

#[test]
fn empty_line_yields_one_empty_line() {
    let lines = wrap_line("", 10);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].as_str(), "");
}

#[test]
fn whitespace_only_line_yields_one_empty_line() {
    let lines = wrap_line("     ", 3);
    assert_eq!(plain(&lines), vec![""]);
}

#[test]
fn short_line_is_untouched() {
    assert_eq!(plain(&wrap_line("hello world", 20)), vec!["hello world"]);
}

#[test]
fn words_wrap_at_target() {
    assert_eq!(
        plain(&wrap_line("the quick brown fox jumps", 10)),
        vec!["the quick", "brown fox", "jumps"]
    );
}

#[test]
fn exact_fill_forces_flush_before_next_word() {
    assert_eq!(plain(&wrap_line("hello world", 5)), vec!["hello", "world"]);
}

#[test]
fn zero_target_is_treated_as_one() {
    let lines = wrap_line("ab", 0);
    assert_eq!(plain(&lines), vec!["a", "b"]);
}

// ===== Whitespace Handling =====

#[test]
fn multi_space_run_preserved_mid_line() {
    assert_eq!(plain(&wrap_line("a   b", 10)), vec!["a   b"]);
}

#[test]
fn whitespace_dropped_at_break() {
    let lines = plain(&wrap_line("aaaa    bbbb", 6));
    assert_eq!(lines, vec!["aaaa", "bbbb"]);
}

#[test]
fn leading_indent_kept_on_first_line() {
    assert_eq!(plain(&wrap_line("  indented", 20)), vec!["  indented"]);
}

#[test]
fn trailing_whitespace_dropped() {
    assert_eq!(plain(&wrap_line("end   ", 20)), vec!["end"]);
}

// ===== Hard Splits =====

#[test]
fn long_word_is_hard_split() {
    assert_eq!(
        plain(&wrap_line("abcdefghij", 4)),
        vec!["abcd", "efgh", "ij"]
    );
}

#[test]
fn long_word_starts_on_fresh_line() {
    assert_eq!(
        plain(&wrap_line("hi abcdefgh", 4)),
        vec!["hi", "abcd", "efgh"]
    );
}

#[test]
fn wide_chars_never_split() {
    let lines = wrap_line("日本語テキスト", 5);
    for line in &lines {
        assert!(visible_width(line.as_str()) <= 5);
    }
    assert_eq!(plain(&lines).concat(), "日本語テキスト");
}

#[test]
fn wide_char_wider_than_target_is_replaced() {
    assert_eq!(plain(&wrap_line("中", 1)), vec!["?"]);
}

// ===== Hyperlinks =====

#[test]
fn url_is_wrapped_in_hyperlink_escape() {
    let lines = wrap_line("see http://example.com now", 40);
    assert_eq!(lines.len(), 1);
    assert!(lines[0]
        .as_str()
        .contains("\x1b]8;;http://example.com\x07http://example.com\x1b]8;;\x07"));
    assert_eq!(visible_width(lines[0].as_str()), "see http://example.com now".len());
}

#[test]
fn url_that_does_not_fit_moves_to_next_line() {
    let lines = wrap_line("go http://a.test/x", 15);
    assert_eq!(plain(&lines), vec!["go", "http://a.test/x"]);
}

#[test]
fn display_width_uses_decoded_form() {
    let lines = wrap_line("http://x.test/caf%C3%A9", 40);
    assert_eq!(plain(&lines), vec!["http://x.test/café"]);
    assert!(lines[0].as_str().contains("\x1b]8;;http://x.test/caf%C3%A9\x07"));
}

#[test]
fn long_url_is_a_single_shortened_token() {
    let input = "Check http://example.com/a-very-long-path-exceeding-width out";
    let lines = wrap_line(input, 20);

    for line in &lines {
        assert!(visible_width(line.as_str()) <= 20, "too wide: {:?}", line);
    }

    let link_lines: Vec<_> = lines
        .iter()
        .filter(|l| l.as_str().contains("\x1b]8;;http://example.com/a-very-long-path-exceeding-width\x07"))
        .collect();
    assert_eq!(link_lines.len(), 1, "URL must appear exactly once");

    assert_eq!(
        plain(&lines),
        vec!["Check", "http://example.com/…", "out"]
    );
}

// ===== Multi-line Text =====

#[test]
fn wrap_text_wraps_each_logical_line() {
    let lines = wrap_text("one two\n\nthree", 4);
    assert_eq!(plain(&lines), vec!["one", "two", "", "thre", "e"]);
}

#[test]
fn wrap_text_strips_carriage_returns() {
    assert_eq!(plain(&wrap_text("a\r\nb", 10)), vec!["a", "b"]);
}
