//! Composition of post blocks into a frame.
//!
//! Each post becomes a [`ContentBlock`]: a header row, then any image preview
//! rows and their affordance, then the wrapped body. The blocks go through the
//! [`ViewportAllocator`] and the result is blitted into a [`Screen`].

use super::screen::Screen;
use crate::model::{relative_age, Post, Thread};
use crate::preview::{strip_image_markup, ImagePreviewPipeline, Preview};
use crate::state::{AppState, ScrollGeometry};
use crate::text::{char_width, styled, truncate_keeping_escapes, wrap_text};
use crate::view_state::{
    ContentBlock, PhysicalLine, Viewport, ViewportAllocator, ViewportChrome, ViewportDimensions,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Rows reserved below the post list for the status line.
pub const STATUS_ROWS: u16 = 1;

/// Columns between tab stops when expanding tabs in post bodies.
const TAB_STOP: usize = 4;

/// A preview the current frame would show if it were computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewNeed {
    /// Post index.
    pub post: usize,
    /// Resolved image URL.
    pub url: String,
    /// Target width in columns.
    pub width: usize,
    /// Maximum preview rows.
    pub max_lines: usize,
}

/// Output of laying out the post list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Allocated rows and focus information.
    pub viewport: Viewport,
    /// Scroll limits of the focused block, for the next command.
    pub focus_geometry: ScrollGeometry,
    /// Expanded posts whose preview is not cached yet.
    pub wanted: Vec<PreviewNeed>,
}

/// A complete frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Terminal rows.
    pub screen: Screen,
    /// Layout the screen was drawn from.
    pub layout: Layout,
}

/// Builds post blocks and frames.
pub struct RenderCoordinator {
    pipeline: Option<Arc<ImagePreviewPipeline>>,
    preview_max_lines: usize,
}

impl RenderCoordinator {
    /// Create a coordinator. `pipeline` is `None` when previews are off.
    pub fn new(pipeline: Option<Arc<ImagePreviewPipeline>>, preview_max_lines: usize) -> Self {
        Self {
            pipeline,
            preview_max_lines,
        }
    }

    /// Whether `post` has an image the viewer could preview.
    pub fn has_previewable_image(&self, post: &Post) -> bool {
        self.pipeline
            .as_ref()
            .is_some_and(|p| p.has_previewable_image(&post.raw))
    }

    /// Build the block for post `index`, and the preview it is waiting on.
    pub fn build_block(
        &self,
        post: &Post,
        index: usize,
        state: &AppState,
        width: usize,
        now: DateTime<Utc>,
    ) -> (ContentBlock, Option<PreviewNeed>) {
        let width = width.max(1);
        let focused = state.focus().get() == index;
        let expanded = state.is_expanded(index);
        let header = header_line(post, index, focused, width, now);

        let image = self
            .pipeline
            .as_ref()
            .filter(|p| p.is_enabled())
            .and_then(|p| Some((p, p.image_for(&post.raw)?)));

        let mut body = Vec::new();
        let mut need = None;
        let mut strip_images = false;

        if let Some((pipeline, url)) = image {
            if expanded {
                match pipeline.cached(&url, width, self.preview_max_lines) {
                    Some(Preview::Lines(lines)) => {
                        body.extend(lines);
                        body.push(affordance("[i] hide image", width));
                        strip_images = true;
                    }
                    Some(Preview::Rejected) => {
                        body.push(affordance("(image preview unavailable)", width));
                    }
                    None => {
                        body.push(affordance("loading image…", width));
                        if !state.is_pending(index, width) {
                            need = Some(PreviewNeed {
                                post: index,
                                url,
                                width,
                                max_lines: self.preview_max_lines,
                            });
                        }
                    }
                }
            } else {
                body.push(affordance("[i] show image", width));
            }
        }

        let text = clean_body(post.plain_text());
        let text = if strip_images {
            strip_image_markup(&text)
        } else {
            text
        };
        body.extend(wrap_text(&text, width));

        let block = ContentBlock::new(header, body).with_scroll_offset(state.scroll_offset(index));
        (block, need)
    }

    /// Lay out the post list into `budget` rows.
    pub fn layout(
        &self,
        thread: &Thread,
        state: &AppState,
        width: usize,
        budget: usize,
        now: DateTime<Utc>,
    ) -> Layout {
        let mut blocks = Vec::with_capacity(thread.posts.len());
        let mut wanted = Vec::new();
        for (index, post) in thread.posts.iter().enumerate() {
            let (block, need) = self.build_block(post, index, state, width, now);
            blocks.push(block);
            wanted.extend(need);
        }

        let focus = state.focus().get();
        let allocator = ViewportAllocator::new(ViewportChrome::for_width(width.max(1)));
        let viewport = allocator.allocate(&blocks, focus, budget);
        let focus_geometry = blocks
            .get(focus)
            .map(|b| ScrollGeometry::new(b.height(), viewport.focus_window))
            .unwrap_or_default();

        Layout {
            viewport,
            focus_geometry,
            wanted,
        }
    }

    /// Render a full frame: the post list above a status line.
    pub fn render(
        &self,
        thread: &Thread,
        state: &AppState,
        dims: ViewportDimensions,
        now: DateTime<Utc>,
    ) -> Frame {
        let dims = dims.normalized();
        let width = usize::from(dims.width);
        let budget = dims.list_budget(STATUS_ROWS);
        let layout = self.layout(thread, state, width, budget, now);

        let mut screen = Screen::from_lines(&layout.viewport.lines, dims);
        if usize::from(dims.height) > budget {
            screen.set_row(budget, &status_line(thread, state, width));
        }
        Frame { screen, layout }
    }
}

/// `#n author ♥ · age`, bold author, reverse video when focused.
fn header_line(
    post: &Post,
    index: usize,
    focused: bool,
    width: usize,
    now: DateTime<Utc>,
) -> PhysicalLine {
    let glyph = if post.liked { '♥' } else { '♡' };
    let mut rest = format!(" {glyph}");
    if let Some(created) = post.created_at {
        rest.push_str(" · ");
        rest.push_str(&relative_age(created, now));
    }
    let number = format!("#{} ", index + 1);
    let author = clean_inline(&post.author);

    let text = if focused {
        format!(
            "{}{}{}",
            styled("7", &number),
            styled("1;7", &author),
            styled("7", &rest)
        )
    } else {
        format!("{}{}{}", styled("2", &number), styled("1", &author), rest)
    };
    PhysicalLine::new(truncate_keeping_escapes(&text, width))
}

fn affordance(text: &str, width: usize) -> PhysicalLine {
    PhysicalLine::new(truncate_keeping_escapes(&styled("2", &format!("  {text}")), width))
}

fn status_line(thread: &Thread, state: &AppState, width: usize) -> String {
    let position = if thread.posts.is_empty() {
        "0/0".to_string()
    } else {
        format!("{}/{}", state.focus().display(), thread.posts.len())
    };
    let title = thread.title.as_deref().map(clean_inline).unwrap_or_default();
    let text = format!(" {position}  {title}  j/k scroll  n/p post  i image  q quit");
    truncate_keeping_escapes(&styled("7", &text), width)
}

/// Post body text with tabs expanded and other control characters removed.
///
/// Newlines survive; escape sequences lose their ESC byte and print literally.
pub fn clean_body(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\n' => {
                out.push('\n');
                column = 0;
            }
            '\t' => {
                let spaces = TAB_STOP - column % TAB_STOP;
                out.extend(std::iter::repeat(' ').take(spaces));
                column += spaces;
            }
            c if c.is_control() => {}
            c => {
                out.push(c);
                column += char_width(c);
            }
        }
    }
    out
}

/// Single-line text with every control character removed.
fn clean_inline(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
