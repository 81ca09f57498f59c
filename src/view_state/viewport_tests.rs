//! Tests for the viewport allocator.

use super::*;
use proptest::prelude::*;

// ===== Helpers =====

/// Block `id` with a header and `height - 1` body rows labelled `id:n`.
fn block(id: usize, height: usize) -> ContentBlock {
    let body = (1..height)
        .map(|n| PhysicalLine::new(format!("{id}:{n}")))
        .collect();
    ContentBlock::new(PhysicalLine::new(format!("#{id}")), body)
}

fn blocks(heights: &[usize]) -> Vec<ContentBlock> {
    heights
        .iter()
        .enumerate()
        .map(|(id, &h)| block(id, h))
        .collect()
}

fn rows(viewport: &Viewport) -> Vec<&str> {
    viewport.lines.iter().map(PhysicalLine::as_str).collect()
}

fn allocator() -> ViewportAllocator {
    ViewportAllocator::new(ViewportChrome {
        separator: PhysicalLine::from("---"),
        more_above: PhysicalLine::from("^^^"),
        more_below: PhysicalLine::from("vvv"),
        placeholder: PhysicalLine::from("No posts."),
    })
}

// ===== Focus Window =====

#[test]
fn focus_window_is_sixty_percent_of_budget() {
    assert_eq!(focus_window(20, 100), 12);
}

#[test]
fn focus_window_has_floor_of_six() {
    assert_eq!(focus_window(8, 100), 6);
}

#[test]
fn focus_window_capped_by_block_height() {
    assert_eq!(focus_window(20, 3), 3);
}

#[test]
fn focus_window_capped_by_budget() {
    assert_eq!(focus_window(4, 100), 4);
}

// ===== Degenerate Inputs =====

#[test]
fn zero_blocks_render_placeholder() {
    let viewport = allocator().allocate(&[], 0, 10);
    assert_eq!(rows(&viewport), vec!["No posts."]);
}

#[test]
fn zero_budget_degrades_to_one_line() {
    let viewport = allocator().allocate(&blocks(&[5]), 0, 0);
    assert_eq!(viewport.lines.len(), 1);
}

#[test]
fn focus_out_of_range_is_clamped() {
    let viewport = allocator().allocate(&blocks(&[2, 2]), 99, 20);
    assert_eq!(viewport.focus_rows, (3, 5));
}

// ===== Focused Block =====

#[test]
fn scroll_offset_clamps_to_last_window() {
    let b = vec![block(0, 20).with_scroll_offset(1000)];
    let viewport = allocator().allocate(&b, 0, 10);
    assert_eq!(viewport.focus_window, 6);
    assert_eq!(viewport.focus_offset, 14);
    assert_eq!(rows(&viewport), vec!["^^^", "0:15", "0:16", "0:17", "0:18", "0:19"]);
}

#[test]
fn more_below_replaces_last_visible_row() {
    let viewport = allocator().allocate(&blocks(&[20]), 0, 10);
    assert_eq!(rows(&viewport), vec!["#0", "0:1", "0:2", "0:3", "0:4", "vvv"]);
}

#[test]
fn middle_window_shows_both_indicators() {
    let b = vec![block(0, 20).with_scroll_offset(5)];
    let viewport = allocator().allocate(&b, 0, 10);
    assert_eq!(rows(&viewport), vec!["^^^", "0:6", "0:7", "0:8", "0:9", "vvv"]);
}

#[test]
fn short_block_has_no_indicators() {
    let viewport = allocator().allocate(&blocks(&[3]), 0, 10);
    assert_eq!(rows(&viewport), vec!["#0", "0:1", "0:2"]);
}

// ===== Neighbours =====

#[test]
fn five_blocks_of_four_fit_within_budget_of_ten() {
    let viewport = allocator().allocate(&blocks(&[4, 4, 4, 4, 4]), 2, 10);
    assert!(viewport.lines.len() <= 10);
    assert_eq!(
        rows(&viewport),
        vec!["#1", "1:1", "1:2", "1:3", "---", "#2", "2:1", "2:2", "2:3"]
    );
    assert_eq!(viewport.focus_rows, (5, 9));
}

#[test]
fn neighbours_alternate_above_then_below() {
    let viewport = allocator().allocate(&blocks(&[2, 2, 2, 2, 2]), 2, 20);
    assert_eq!(
        rows(&viewport),
        vec![
            "#0", "0:1", "---", "#1", "1:1", "---", "#2", "2:1", "---", "#3", "3:1", "---",
            "#4", "4:1"
        ]
    );
}

#[test]
fn partial_neighbour_above_keeps_rows_nearest_focus() {
    let viewport = allocator().allocate(&blocks(&[10, 3]), 1, 10);
    assert_eq!(
        rows(&viewport),
        vec!["0:4", "0:5", "0:6", "0:7", "0:8", "0:9", "---", "#1", "1:1", "1:2"]
    );
}

#[test]
fn partial_neighbour_below_keeps_rows_nearest_focus() {
    let viewport = allocator().allocate(&blocks(&[3, 10]), 0, 8);
    assert_eq!(
        rows(&viewport),
        vec!["#0", "0:1", "0:2", "---", "#1", "1:1", "1:2", "1:3"]
    );
}

#[test]
fn neighbour_and_its_separator_exactly_fill_budget() {
    // Focus takes 6 of 9 rows; the 2-row neighbour plus one separator is the other 3.
    let viewport = allocator().allocate(&blocks(&[2, 6]), 1, 9);
    assert_eq!(
        rows(&viewport),
        vec!["#0", "0:1", "---", "#1", "1:1", "1:2", "1:3", "1:4", "1:5"]
    );
}

#[test]
fn no_separator_at_either_end() {
    let viewport = allocator().allocate(&blocks(&[2, 2, 2]), 1, 30);
    assert_ne!(viewport.lines.first().map(PhysicalLine::as_str), Some("---"));
    assert_ne!(viewport.lines.last().map(PhysicalLine::as_str), Some("---"));
}

#[test]
fn chrome_for_width_fits_the_width() {
    let chrome = ViewportChrome::for_width(5);
    assert_eq!(chrome.separator.width(), 5);
    assert!(chrome.more_above.width() <= 5);
    assert!(chrome.placeholder.width() <= 5);
}

// ===== Properties =====

proptest! {
    #[test]
    fn never_exceeds_budget(
        heights in prop::collection::vec(1usize..30, 0..12),
        focus in 0usize..15,
        offset in 0usize..50,
        budget in 0usize..60,
    ) {
        let mut b = blocks(&heights);
        if let Some(f) = b.get_mut(focus) {
            *f = f.clone().with_scroll_offset(offset);
        }
        let viewport = allocator().allocate(&b, focus, budget);
        prop_assert!(viewport.lines.len() <= budget.max(1));
        prop_assert!(!viewport.lines.is_empty());
    }

    #[test]
    fn focus_offset_always_within_clamp_range(
        height in 1usize..100,
        offset in 0usize..1000,
        budget in 1usize..60,
    ) {
        let b = vec![block(0, height).with_scroll_offset(offset)];
        let viewport = allocator().allocate(&b, 0, budget);
        let window = focus_window(budget, height);
        prop_assert!(viewport.focus_offset <= height.saturating_sub(window));
        prop_assert_eq!(viewport.focus_rows.1 - viewport.focus_rows.0, window);
    }
}
