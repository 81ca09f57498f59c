//! Snapshot tests for rendered frames.
//!
//! Uses insta inline snapshots on the escape-stripped screen so layout
//! regressions show up as readable diffs.

use chrono::{TimeZone, Utc};
use threadview::model::{KeyAction, Thread};
use threadview::source::parse_thread;
use threadview::state::{AppState, ScrollGeometry};
use threadview::text::{strip_escapes, visible_width};
use threadview::view::{Frame, RenderCoordinator};
use threadview::view_state::ViewportDimensions;

// ===== Test Helpers =====

const THREAD_JSON: &str = r#"{
    "title": "Topic",
    "posts": [
        {"id": 1, "author": "alice", "liked": true, "created_at": "2024-05-01T10:00:00Z",
         "raw": "Hello there, welcome to the thread."},
        {"id": 2, "author": "bob", "raw": "Thanks!"},
        {"id": 3, "author": "carol", "raw": "See you."}
    ]
}"#;

fn thread() -> Thread {
    parse_thread(THREAD_JSON.as_bytes()).expect("fixture parses")
}

fn render(state: &AppState, width: u16, height: u16) -> Frame {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    RenderCoordinator::new(None, 8).render(&thread(), state, ViewportDimensions::new(width, height), now)
}

fn plain_rows(frame: &Frame) -> String {
    frame
        .screen
        .rows()
        .iter()
        .map(|row| strip_escapes(row).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

// ===== Snapshots =====

#[test]
fn first_post_focused() {
    let frame = render(&AppState::new(3), 24, 8);

    insta::assert_snapshot!(plain_rows(&frame), @r"
    #1 alice ♥ · 2h
    Hello there, welcome to
    the thread.
    ────────────────────────
    #2 bob ♡
    Thanks!

     1/3  Topic  j/k scroll
    ");
}

#[test]
fn last_post_focused_shows_neighbours_above() {
    let mut state = AppState::new(3);
    state.apply(KeyAction::Last, ScrollGeometry::default());

    let frame = render(&state, 24, 8);

    insta::assert_snapshot!(plain_rows(&frame), @r"
    the thread.
    ────────────────────────
    #2 bob ♡
    Thanks!
    ────────────────────────
    #3 carol ♡
    See you.
     3/3  Topic  j/k scroll
    ");
}

// ===== Geometry =====

#[test]
fn every_row_is_exactly_screen_width() {
    for (width, height) in [(1, 1), (5, 3), (24, 8), (80, 24)] {
        let frame = render(&AppState::new(3), width, height);
        assert_eq!(frame.screen.height(), usize::from(height));
        for row in frame.screen.rows() {
            assert_eq!(visible_width(row), usize::from(width), "row {row:?}");
        }
    }
}

#[test]
fn rows_contain_only_sgr_and_hyperlink_escapes() {
    let json = r#"[{"id": 1, "author": "x\u001b[2J", "raw": "see https://example.com/a\u001b[H\tb"}]"#;
    let thread = parse_thread(json.as_bytes()).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let frame = RenderCoordinator::new(None, 8).render(
        &thread,
        &AppState::new(1),
        ViewportDimensions::new(30, 6),
        now,
    );

    for row in frame.screen.rows() {
        let mut rest = row.as_str();
        while let Some(pos) = rest.find('\x1b') {
            rest = &rest[pos + 1..];
            let kind = rest.chars().next();
            assert!(matches!(kind, Some('[') | Some(']')), "row {row:?}");
            if kind == Some('[') {
                let end = rest.find(|c: char| c.is_ascii_alphabetic()).unwrap();
                assert_eq!(&rest[end..=end], "m", "non-SGR CSI in {row:?}");
            }
        }
    }
}

// ===== End-to-End URL Wrapping =====

#[test]
fn long_url_stays_one_hyperlink_within_width() {
    let input = "Check http://example.com/a-very-long-path-exceeding-width out";
    let lines = threadview::text::wrap_text(input, 20);

    let link_rows: Vec<_> = lines
        .iter()
        .filter(|l| l.as_str().contains("\x1b]8;;http://example.com/a-very-long-path-exceeding-width\x07"))
        .collect();
    assert_eq!(link_rows.len(), 1, "URL is a single token");
    for line in &lines {
        assert!(line.width() <= 20);
    }
    let words: Vec<String> = lines.iter().map(|l| strip_escapes(l.as_str())).collect();
    assert_eq!(words.first().map(String::as_str), Some("Check"));
    assert_eq!(words.last().map(String::as_str), Some("out"));
}
