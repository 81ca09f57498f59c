//! Width-bounded wrapping of logical lines containing literal URLs.
//!
//! Plain text is split into word and whitespace-run tokens. Whitespace is
//! held back until the next word is placed, so it survives mid-line when the
//! word fits and disappears at a break. URLs become hyperlinks whose width is
//! measured on their decoded display form.

use super::escape::hyperlink;
use super::segment::{segment_line, TextSegment};
use super::width::{str_width, take_by_width};
use crate::view_state::PhysicalLine;

/// Marker appended to a shortened hyperlink display.
const ELLIPSIS: &str = "…";

/// Replacement for a single codepoint wider than the whole target.
const TOO_WIDE: &str = "?";

#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
    Space(&'a str),
    Word(&'a str),
}

fn tokenize_plain(text: &str) -> impl Iterator<Item = Piece<'_>> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let is_space = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|&(_, c)| c.is_whitespace() != is_space)
            .map_or(rest.len(), |(i, _)| i);
        let (token, tail) = rest.split_at(end);
        rest = tail;
        Some(if is_space {
            Piece::Space(token)
        } else {
            Piece::Word(token)
        })
    })
}

/// Accumulates physical lines for one logical line.
struct LineBuilder {
    target: usize,
    lines: Vec<PhysicalLine>,
    current: String,
    current_width: usize,
    pending_space: String,
}

impl LineBuilder {
    fn new(target: usize) -> Self {
        Self {
            target,
            lines: Vec::new(),
            current: String::new(),
            current_width: 0,
            pending_space: String::new(),
        }
    }

    fn flush(&mut self) {
        self.pending_space.clear();
        let line = std::mem::take(&mut self.current);
        self.lines.push(PhysicalLine::new(line));
        self.current_width = 0;
    }

    fn push_space(&mut self, space: &str) {
        // Drop leading whitespace on continuation lines
        if self.current_width == 0 && !self.lines.is_empty() {
            return;
        }
        self.pending_space.push_str(space);
    }

    /// Place a non-whitespace fragment of the given width, flushing first if needed.
    fn place(&mut self, text: &str, width: usize) {
        let space_width = str_width(&self.pending_space);
        if self.current_width + space_width + width <= self.target {
            self.current.push_str(&self.pending_space);
            self.current_width += space_width;
        } else if !self.current.is_empty() {
            self.flush();
        }
        self.pending_space.clear();
        self.current.push_str(text);
        self.current_width += width;
    }

    fn push_word(&mut self, word: &str) {
        let width = str_width(word);
        if width <= self.target {
            self.place(word, width);
            return;
        }

        // Hard split onto dedicated lines
        if !self.current.is_empty() {
            self.flush();
        }
        self.pending_space.clear();
        let mut rest = word;
        loop {
            let (head, tail) = take_by_width(rest, self.target);
            if head.is_empty() {
                // A lone codepoint wider than the target
                let skip = rest.chars().next().map_or(rest.len(), char::len_utf8);
                self.current.push_str(TOO_WIDE);
                self.current_width += str_width(TOO_WIDE);
                rest = &rest[skip..];
            } else {
                self.current.push_str(head);
                self.current_width += str_width(head);
                rest = tail;
            }
            if rest.is_empty() {
                break;
            }
            self.flush();
        }
    }

    /// Links are never split: the display is shortened to fit instead.
    fn push_link(&mut self, href: &str, display: &str) {
        let display = fit_display(display, self.target);
        let width = str_width(&display);
        self.place(&hyperlink(href, &display), width);
    }

    fn finish(mut self) -> Vec<PhysicalLine> {
        if !self.current.is_empty() || self.lines.is_empty() {
            self.flush();
        }
        self.lines
    }
}

/// Shorten a link display to fit `target` columns, marking the cut with `…`.
fn fit_display(display: &str, target: usize) -> String {
    if str_width(display) <= target {
        return display.to_string();
    }
    let budget = target.saturating_sub(str_width(ELLIPSIS));
    let (head, _) = take_by_width(display, budget);
    let mut out = head.to_string();
    if str_width(&out) + str_width(ELLIPSIS) <= target {
        out.push_str(ELLIPSIS);
    }
    out
}

/// Wrap one logical line into physical lines no wider than `target` columns.
///
/// Always returns at least one line; an empty input yields one empty line.
/// A `target` of zero is treated as one.
pub fn wrap_line(line: &str, target: usize) -> Vec<PhysicalLine> {
    let mut builder = LineBuilder::new(target.max(1));

    for segment in segment_line(line) {
        match segment {
            TextSegment::Plain(text) => {
                for piece in tokenize_plain(text) {
                    match piece {
                        Piece::Space(space) => builder.push_space(space),
                        Piece::Word(word) => builder.push_word(word),
                    }
                }
            }
            TextSegment::Hyperlink { href, display } => builder.push_link(href, &display),
        }
    }

    builder.finish()
}

/// Wrap multi-line text, treating each `\n`-separated line as a logical line.
pub fn wrap_text(text: &str, target: usize) -> Vec<PhysicalLine> {
    text.split('\n')
        .flat_map(|line| wrap_line(line.strip_suffix('\r').unwrap_or(line), target))
        .collect()
}

#[cfg(test)]
#[path = "wrap_tests.rs"]
mod tests;
