//! Application state and transitions.
//!
//! AppState holds everything the viewer remembers between frames: which post
//! is focused, how far each post is scrolled, which posts show their image
//! preview, and which preview requests are in flight. Transitions take a
//! `KeyAction` plus the scroll geometry of the last frame.

use crate::model::KeyAction;
use crate::preview::PreviewReady;
use crate::view_state::scroll::{clamp_offset, scroll_by};
use crate::view_state::PostIndex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

// ===== ScrollGeometry =====

/// Scroll limits of the focused block, taken from the last allocated frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollGeometry {
    /// Total rows of the focused block (header included).
    pub block_height: usize,
    /// Rows of the focused block visible at once.
    pub window: usize,
}

impl ScrollGeometry {
    /// Create geometry for a block of `block_height` rows seen through `window` rows.
    pub fn new(block_height: usize, window: usize) -> Self {
        Self {
            block_height,
            window,
        }
    }

    /// Rows moved by a page scroll. Keeps one row of overlap.
    pub fn page(&self) -> usize {
        self.window.saturating_sub(1).max(1)
    }
}

// ===== InFlight =====

/// A preview request the worker has not answered yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InFlight {
    /// Post the preview is for.
    pub post: usize,
    /// Target width the preview was requested at.
    pub width: usize,
}

// ===== AppState =====

/// Viewer state. Pure data, no side effects.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Number of posts in the thread.
    post_count: usize,

    /// Focused post.
    focus: PostIndex,

    /// Scroll offset per post. Missing entries are zero.
    scroll_offsets: HashMap<usize, usize>,

    /// Posts whose image preview is shown.
    expanded: HashSet<usize>,

    /// Bumped whenever focus moves. Requests are tagged with it so results
    /// for a superseded selection can be told apart.
    generation: u64,

    /// Requests sent to the preview worker and not yet answered.
    in_flight: HashSet<InFlight>,

    /// Set once the user asks to leave.
    should_quit: bool,
}

impl AppState {
    /// State for a thread of `post_count` posts, focused on the first.
    pub fn new(post_count: usize) -> Self {
        Self {
            post_count,
            focus: PostIndex::default(),
            scroll_offsets: HashMap::new(),
            expanded: HashSet::new(),
            generation: 0,
            in_flight: HashSet::new(),
            should_quit: false,
        }
    }

    /// Number of posts.
    pub fn post_count(&self) -> usize {
        self.post_count
    }

    /// Focused post.
    pub fn focus(&self) -> PostIndex {
        self.focus
    }

    /// Current selection generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stored scroll offset for `post`.
    pub fn scroll_offset(&self, post: usize) -> usize {
        self.scroll_offsets.get(&post).copied().unwrap_or(0)
    }

    /// Whether `post` shows its image preview.
    pub fn is_expanded(&self, post: usize) -> bool {
        self.expanded.contains(&post)
    }

    /// Whether the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Apply one command.
    ///
    /// `geometry` describes the focused block as last drawn; scroll commands
    /// clamp against it. Returns true if anything visible changed.
    pub fn apply(&mut self, action: KeyAction, geometry: ScrollGeometry) -> bool {
        match action {
            KeyAction::NextPost => self.set_focus(self.focus.next()),
            KeyAction::PrevPost => self.set_focus(self.focus.prev()),
            KeyAction::First => self.set_focus(PostIndex::new(0)),
            KeyAction::Last => self.set_focus(PostIndex::new(self.post_count.saturating_sub(1))),
            KeyAction::ScrollDown => self.scroll_focused(1, geometry),
            KeyAction::ScrollUp => self.scroll_focused(-1, geometry),
            KeyAction::PageDown => self.scroll_focused(page_delta(geometry), geometry),
            KeyAction::PageUp => self.scroll_focused(-page_delta(geometry), geometry),
            KeyAction::ToggleImage => self.toggle_expanded(),
            KeyAction::Quit => {
                self.should_quit = true;
                true
            }
        }
    }

    /// Record the offset the allocator actually used for the focused block.
    pub fn sync_focus_offset(&mut self, offset: usize) {
        let post = self.focus.get();
        if offset == 0 {
            self.scroll_offsets.remove(&post);
        } else {
            self.scroll_offsets.insert(post, offset);
        }
    }

    /// Mark a preview request as sent. Returns false if it already was.
    pub fn begin_request(&mut self, post: usize, width: usize) -> bool {
        self.in_flight.insert(InFlight { post, width })
    }

    /// Whether a preview for `post` at `width` is being computed.
    pub fn is_pending(&self, post: usize, width: usize) -> bool {
        self.in_flight.contains(&InFlight { post, width })
    }

    /// Take a finished preview from the worker.
    ///
    /// The request is no longer in flight either way. Returns true if the
    /// post still shows its preview and needs a redraw. The generation only
    /// decides whether the result is logged as stale; the pipeline cache
    /// already holds it, so a post the user came back to draws it too.
    pub fn accept(&mut self, ready: &PreviewReady) -> bool {
        let request = &ready.request;
        self.in_flight.remove(&InFlight {
            post: request.post,
            width: request.width,
        });
        if request.generation != self.generation {
            debug!(
                post = request.post,
                stale = request.generation,
                current = self.generation,
                "Preview result from an earlier selection"
            );
        }
        self.is_expanded(request.post)
    }

    fn set_focus(&mut self, target: PostIndex) -> bool {
        let target = target.clamp_to(self.post_count);
        if target == self.focus {
            return false;
        }
        self.focus = target;
        self.generation += 1;
        true
    }

    fn scroll_focused(&mut self, delta: i64, geometry: ScrollGeometry) -> bool {
        let post = self.focus.get();
        let current = clamp_offset(
            i64::try_from(self.scroll_offset(post)).unwrap_or(i64::MAX),
            geometry.block_height,
            geometry.window,
        );
        let next = scroll_by(current, delta, geometry.block_height, geometry.window);
        if next == self.scroll_offset(post) {
            return false;
        }
        self.sync_focus_offset(next);
        true
    }

    fn toggle_expanded(&mut self) -> bool {
        if self.post_count == 0 {
            return false;
        }
        let post = self.focus.get();
        if !self.expanded.remove(&post) {
            self.expanded.insert(post);
        }
        true
    }
}

fn page_delta(geometry: ScrollGeometry) -> i64 {
    i64::try_from(geometry.page()).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod tests;
