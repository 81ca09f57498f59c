//! Allocation of the frame's line budget across post blocks.
//!
//! The focused block gets a scrollable window of at most 60% of the budget
//! (never less than six rows when it has them). Neighbours fill the rest,
//! alternating upward and downward from the focus.

use super::block::{ContentBlock, PhysicalLine};
use super::scroll::clamp_offset;
use crate::text::{styled, truncate_keeping_escapes};

/// Share of the budget the focused block may use, as a fraction (3/5 = 0.6).
const FOCUS_SHARE: (usize, usize) = (3, 5);

/// Minimum rows granted to the focused block (when the budget and block allow).
const FOCUS_MIN_ROWS: usize = 6;

/// Result of allocating one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    /// Rows to draw, top to bottom. Never more than the budget.
    pub lines: Vec<PhysicalLine>,
    /// Focused block's scroll offset after clamping.
    pub focus_offset: usize,
    /// Rows `[start, end)` of `lines` occupied by the focused block.
    pub focus_rows: (usize, usize),
    /// Visible rows granted to the focused block (`selected_max`).
    pub focus_window: usize,
}

/// Lines the allocator inserts itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportChrome {
    /// Line drawn between adjacent blocks.
    pub separator: PhysicalLine,
    /// Line replacing the first visible row when content is hidden above.
    pub more_above: PhysicalLine,
    /// Line replacing the last visible row when content is hidden below.
    pub more_below: PhysicalLine,
    /// Single line shown when there are no blocks.
    pub placeholder: PhysicalLine,
}

impl ViewportChrome {
    /// Chrome sized for a terminal `width` columns wide.
    pub fn for_width(width: usize) -> Self {
        let fit = |s: String| PhysicalLine::new(truncate_keeping_escapes(&s, width));
        Self {
            separator: fit(styled("2", &"─".repeat(width))),
            more_above: fit(styled("2", "  ↑ more above")),
            more_below: fit(styled("2", "  ↓ more below")),
            placeholder: fit("No posts.".to_string()),
        }
    }
}

impl Default for ViewportChrome {
    fn default() -> Self {
        Self {
            separator: PhysicalLine::blank(),
            more_above: PhysicalLine::from("↑ more above"),
            more_below: PhysicalLine::from("↓ more below"),
            placeholder: PhysicalLine::from("No posts."),
        }
    }
}

/// Rows granted to the focused block for a given budget and block height.
pub fn focus_window(budget: usize, focused_height: usize) -> usize {
    let budget = budget.max(1);
    let share = budget * FOCUS_SHARE.0 / FOCUS_SHARE.1;
    share
        .max(FOCUS_MIN_ROWS)
        .min(focused_height)
        .min(budget)
}

/// Selects which rows of which blocks are visible this frame.
#[derive(Debug, Clone, Default)]
pub struct ViewportAllocator {
    chrome: ViewportChrome,
}

/// A neighbour included in the frame, possibly cut short.
struct Included {
    index: usize,
    lines: Vec<PhysicalLine>,
}

impl ViewportAllocator {
    /// Create an allocator drawing the given chrome lines.
    pub fn new(chrome: ViewportChrome) -> Self {
        Self { chrome }
    }

    /// Allocate `budget` rows across `blocks`, focused on `focus`.
    ///
    /// `focus` is clamped into range. A budget of zero is treated as one.
    /// The focused block's stored scroll offset is clamped and returned in
    /// [`Viewport::focus_offset`] so callers can persist it.
    pub fn allocate(&self, blocks: &[ContentBlock], focus: usize, budget: usize) -> Viewport {
        let budget = budget.max(1);

        if blocks.is_empty() {
            return Viewport {
                lines: vec![self.chrome.placeholder.clone()],
                focus_offset: 0,
                focus_rows: (0, 0),
                focus_window: 0,
            };
        }

        let focus = focus.min(blocks.len() - 1);
        let focused = &blocks[focus];
        let window = focus_window(budget, focused.height());
        let offset = clamp_offset(
            i64::try_from(focused.scroll_offset()).unwrap_or(i64::MAX),
            focused.height(),
            window,
        );

        let mut focus_lines = focused.slice(offset, offset + window);
        let last = focus_lines.len().saturating_sub(1);
        if offset > 0 {
            if let Some(first) = focus_lines.first_mut() {
                *first = self.chrome.more_above.clone();
            }
        }
        if offset + window < focused.height() {
            if let Some(row) = focus_lines.get_mut(last) {
                *row = self.chrome.more_below.clone();
            }
        }

        // Separators are charged per neighbour, in `take_neighbour`.
        let mut remaining = budget - focus_lines.len();
        let mut above: Vec<Included> = Vec::new();
        let mut below: Vec<Included> = Vec::new();
        let mut up = focus.checked_sub(1);
        let mut down = (focus + 1 < blocks.len()).then_some(focus + 1);

        while up.is_some() || down.is_some() {
            if let Some(index) = up {
                let (lines, whole) = take_neighbour(&blocks[index], &mut remaining, Edge::Bottom);
                if !lines.is_empty() {
                    above.push(Included { index, lines });
                }
                up = if whole { index.checked_sub(1) } else { None };
            }
            if let Some(index) = down {
                let (lines, whole) = take_neighbour(&blocks[index], &mut remaining, Edge::Top);
                if !lines.is_empty() {
                    below.push(Included { index, lines });
                }
                down = if whole && index + 1 < blocks.len() {
                    Some(index + 1)
                } else {
                    None
                };
            }
        }

        above.sort_by_key(|inc| inc.index);
        below.sort_by_key(|inc| inc.index);

        let mut lines = Vec::with_capacity(budget);
        for inc in above {
            lines.extend(inc.lines);
            lines.push(self.chrome.separator.clone());
        }
        let focus_start = lines.len();
        lines.extend(focus_lines);
        let focus_end = lines.len();
        for inc in below {
            lines.push(self.chrome.separator.clone());
            lines.extend(inc.lines);
        }

        debug_assert!(lines.len() <= budget);
        Viewport {
            lines,
            focus_offset: offset,
            focus_rows: (focus_start, focus_end),
            focus_window: window,
        }
    }
}

/// Which edge of a neighbour faces the focused block.
#[derive(Clone, Copy)]
enum Edge {
    /// Block above the focus: its bottom rows are nearest.
    Bottom,
    /// Block below the focus: its top rows are nearest.
    Top,
}

/// Take a neighbour whole if it and its separator fit, else the rows nearest
/// the focus. Returns the rows and whether the neighbour was taken whole.
fn take_neighbour(
    block: &ContentBlock,
    remaining: &mut usize,
    nearest: Edge,
) -> (Vec<PhysicalLine>, bool) {
    let height = block.height();
    if height + 1 <= *remaining {
        *remaining -= height + 1;
        return (block.slice(0, height), true);
    }

    let rows = remaining.saturating_sub(1);
    if rows == 0 {
        return (Vec::new(), false);
    }
    *remaining = 0;
    let lines = match nearest {
        Edge::Bottom => block.slice(height - rows, height),
        Edge::Top => block.slice(0, rows),
    };
    (lines, false)
}

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;
