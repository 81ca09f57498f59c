//! Rejection of previews that are mostly flat blocks.
//!
//! A renderer given a tiny or low-contrast image tends to produce a field of
//! one or two block glyphs. Such output reads as noise, so it is discarded.

use crate::text::strip_escapes;
use crate::view_state::PhysicalLine;
use std::collections::HashSet;

/// Block-glyph share above which a preview is suspect.
pub const MAX_BLOCK_RATIO: f64 = 0.55;

/// Distinct-character count at or below which a suspect preview is rejected.
pub const MIN_DISTINCT_CHARS: usize = 8;

/// Whether `c` is a block element (U+2580..=U+259F).
pub fn is_block_glyph(c: char) -> bool {
    ('\u{2580}'..='\u{259f}').contains(&c)
}

/// Glyph statistics over the visible characters of a preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStats {
    /// Fraction of characters that are block glyphs.
    pub block_ratio: f64,
    /// Number of distinct characters.
    pub distinct: usize,
}

impl GlyphStats {
    /// Measure every visible character of `lines`, spaces included.
    ///
    /// Escape sequences are not characters of the picture and are skipped.
    pub fn measure(lines: &[PhysicalLine]) -> Self {
        let mut total = 0usize;
        let mut blocks = 0usize;
        let mut seen = HashSet::new();
        for line in lines {
            for c in strip_escapes(line.as_str()).chars() {
                total += 1;
                if is_block_glyph(c) {
                    blocks += 1;
                }
                seen.insert(c);
            }
        }
        let block_ratio = if total == 0 {
            0.0
        } else {
            blocks as f64 / total as f64
        };
        Self {
            block_ratio,
            distinct: seen.len(),
        }
    }

    /// Whether these statistics fail the quality bar.
    pub fn is_low_quality(self) -> bool {
        self.block_ratio > MAX_BLOCK_RATIO && self.distinct <= MIN_DISTINCT_CHARS
    }
}

/// Whether `lines` should be rejected as low quality.
pub fn is_low_quality(lines: &[PhysicalLine]) -> bool {
    GlyphStats::measure(lines).is_low_quality()
}
