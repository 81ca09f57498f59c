//! Rendered lines and per-post content blocks.

use crate::text::visible_width;
use std::fmt;

/// One rendered terminal row.
///
/// Holds text that may contain SGR and hyperlink escapes. Producers in this
/// crate guarantee the escapes are complete and closed before the line ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PhysicalLine(String);

impl PhysicalLine {
    /// Wrap already-rendered text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// An empty line.
    pub fn blank() -> Self {
        Self(String::new())
    }

    /// Rendered text including escapes.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display width ignoring escapes.
    pub fn width(&self) -> usize {
        visible_width(&self.0)
    }

    /// Consume into the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PhysicalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PhysicalLine {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for PhysicalLine {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// The renderable unit for one post: a header row plus body rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    header: PhysicalLine,
    body: Vec<PhysicalLine>,
    scroll_offset: usize,
}

impl ContentBlock {
    /// Create a block scrolled to the top.
    pub fn new(header: PhysicalLine, body: Vec<PhysicalLine>) -> Self {
        Self {
            header,
            body,
            scroll_offset: 0,
        }
    }

    /// Set the stored scroll offset.
    ///
    /// The offset is clamped when the block is laid out, not here.
    pub fn with_scroll_offset(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }

    /// Header row.
    pub fn header(&self) -> &PhysicalLine {
        &self.header
    }

    /// Body rows.
    pub fn body(&self) -> &[PhysicalLine] {
        &self.body
    }

    /// Stored scroll offset (unclamped).
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Total rows: header plus body.
    pub fn height(&self) -> usize {
        1 + self.body.len()
    }

    /// Row `index` where 0 is the header.
    pub fn line(&self, index: usize) -> Option<&PhysicalLine> {
        match index {
            0 => Some(&self.header),
            n => self.body.get(n - 1),
        }
    }

    /// Rows `[start, end)` cloned, clamped to the block.
    pub fn slice(&self, start: usize, end: usize) -> Vec<PhysicalLine> {
        let end = end.min(self.height());
        (start..end).filter_map(|i| self.line(i).cloned()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(body_lines: usize) -> ContentBlock {
        let body = (0..body_lines)
            .map(|i| PhysicalLine::new(format!("line {i}")))
            .collect();
        ContentBlock::new(PhysicalLine::from("header"), body)
    }

    #[test]
    fn height_counts_header() {
        assert_eq!(block(0).height(), 1);
        assert_eq!(block(3).height(), 4);
    }

    #[test]
    fn line_zero_is_header() {
        let b = block(2);
        assert_eq!(b.line(0).map(PhysicalLine::as_str), Some("header"));
        assert_eq!(b.line(2).map(PhysicalLine::as_str), Some("line 1"));
        assert_eq!(b.line(3), None);
    }

    #[test]
    fn slice_clamps_to_height() {
        let b = block(2);
        let rows: Vec<_> = b.slice(1, 10).into_iter().map(PhysicalLine::into_string).collect();
        assert_eq!(rows, vec!["line 0", "line 1"]);
    }

    #[test]
    fn builder_sets_offset() {
        let b = block(1).with_scroll_offset(7);
        assert_eq!(b.scroll_offset(), 7);
    }

    #[test]
    fn physical_line_width_ignores_escapes() {
        assert_eq!(PhysicalLine::from("\x1b[1mbold\x1b[0m").width(), 4);
    }
}
