//! Fixed-size frame buffer.
//!
//! Every row is exactly `width` visible columns. Rows may carry SGR and
//! hyperlink escapes, always closed before the row ends.

use crate::text::{pad_visible, truncate_keeping_escapes};
use crate::view_state::{PhysicalLine, ViewportDimensions};
use crossterm::cursor::MoveTo;
use crossterm::style::Print;
use crossterm::QueueableCommand;
use std::io::{self, Write};

/// One frame of terminal output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    width: usize,
    rows: Vec<String>,
}

impl Screen {
    /// A blank screen. Zero dimensions yield a 1×1 screen.
    pub fn new(dims: ViewportDimensions) -> Self {
        let dims = dims.normalized();
        let width = usize::from(dims.width);
        Self {
            width,
            rows: vec![" ".repeat(width); usize::from(dims.height)],
        }
    }

    /// Blit `lines` from the top row down. Lines past the bottom are dropped.
    pub fn from_lines(lines: &[PhysicalLine], dims: ViewportDimensions) -> Self {
        let mut screen = Self::new(dims);
        for (row, line) in lines.iter().enumerate() {
            screen.set_row(row, line.as_str());
        }
        screen
    }

    /// Overwrite `row`, clipping and padding to the screen width.
    ///
    /// Rows outside the screen are ignored.
    pub fn set_row(&mut self, row: usize, text: &str) {
        let width = self.width;
        if let Some(slot) = self.rows.get_mut(row) {
            *slot = pad_visible(&truncate_keeping_escapes(text, width), width);
        }
    }

    /// Width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Draw every row at its absolute position and flush.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the writer.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        for (row, text) in self.rows.iter().enumerate() {
            let y = u16::try_from(row).unwrap_or(u16::MAX);
            out.queue(MoveTo(0, y))?.queue(Print(text))?;
        }
        out.flush()
    }
}
