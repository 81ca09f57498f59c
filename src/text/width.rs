//! Per-codepoint display width classification.
//!
//! Widths are decided at the codepoint level, not per grapheme cluster.
//! Combining sequences and emoji ZWJ sequences can therefore be measured
//! slightly wrong; callers accept that approximation.

use unicode_width::UnicodeWidthChar;

/// Display width class of a single codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidthClass {
    /// Occupies no column (combining marks, joiners, variation selectors).
    Zero,
    /// Occupies one column.
    Narrow,
    /// Occupies two columns.
    Wide,
}

impl WidthClass {
    /// Number of terminal columns for this class.
    pub fn columns(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::Narrow => 1,
            Self::Wide => 2,
        }
    }
}

/// Codepoint ranges that never advance the cursor.
const ZERO_WIDTH_RANGES: &[(u32, u32)] = &[
    (0x0300, 0x036F), // Combining Diacritical Marks
    (0x0483, 0x0489), // Cyrillic combining
    (0x0591, 0x05BD), // Hebrew points
    (0x0610, 0x061A), // Arabic marks
    (0x064B, 0x065F), // Arabic harakat
    (0x0E31, 0x0E31),
    (0x0E34, 0x0E3A), // Thai vowels
    (0x0E47, 0x0E4E),
    (0x1AB0, 0x1AFF), // Combining Diacritical Marks Extended
    (0x1DC0, 0x1DFF), // Combining Diacritical Marks Supplement
    (0x200B, 0x200F), // ZWSP, ZWNJ, ZWJ, LRM, RLM
    (0x2060, 0x2064), // Word joiner and invisible operators
    (0x20D0, 0x20FF), // Combining Marks for Symbols
    (0xFE00, 0xFE0F), // Variation Selectors
    (0xFE20, 0xFE2F), // Combining Half Marks
    (0xFEFF, 0xFEFF), // BOM / ZWNBSP
    (0xE0100, 0xE01EF), // Variation Selectors Supplement
];

/// Codepoint ranges rendered two columns wide.
const WIDE_RANGES: &[(u32, u32)] = &[
    (0x1100, 0x115F),   // Hangul Jamo initials
    (0x2E80, 0x2EFF),   // CJK Radicals Supplement
    (0x2F00, 0x2FDF),   // Kangxi Radicals
    (0x3000, 0x303E),   // CJK Symbols and Punctuation
    (0x3041, 0x33FF),   // Hiragana .. CJK Compatibility
    (0x3400, 0x4DBF),   // CJK Unified Ideographs Extension A
    (0x4E00, 0x9FFF),   // CJK Unified Ideographs
    (0xA000, 0xA4CF),   // Yi
    (0xAC00, 0xD7A3),   // Hangul Syllables
    (0xF900, 0xFAFF),   // CJK Compatibility Ideographs
    (0xFE30, 0xFE4F),   // CJK Compatibility Forms
    (0xFF00, 0xFF60),   // Fullwidth Forms
    (0xFFE0, 0xFFE6),   // Fullwidth signs
    (0x1F300, 0x1F64F), // Misc Symbols and Pictographs, Emoticons
    (0x1F680, 0x1F6FF), // Transport and Map Symbols
    (0x1F900, 0x1F9FF), // Supplemental Symbols and Pictographs
    (0x1FA70, 0x1FAFF), // Symbols and Pictographs Extended-A
    (0x20000, 0x2FFFD), // CJK Extension B and beyond
    (0x30000, 0x3FFFD),
];

fn in_ranges(cp: u32, ranges: &[(u32, u32)]) -> bool {
    ranges
        .binary_search_by(|&(lo, hi)| {
            if hi < cp {
                std::cmp::Ordering::Less
            } else if lo > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Classify a codepoint.
///
/// The fixed tables take precedence. Codepoints they do not name fall back to
/// `unicode-width`, but only to promote a codepoint to `Zero` (combining marks
/// of other scripts) or `Wide` (emoji-presentation symbols, other East Asian
/// Wide codepoints). Control characters count as narrow.
pub fn classify(c: char) -> WidthClass {
    let cp = c as u32;
    if in_ranges(cp, ZERO_WIDTH_RANGES) {
        return WidthClass::Zero;
    }
    if in_ranges(cp, WIDE_RANGES) {
        return WidthClass::Wide;
    }
    match c.width() {
        Some(0) => WidthClass::Zero,
        Some(2) => WidthClass::Wide,
        _ => WidthClass::Narrow,
    }
}

/// Display width of a codepoint in columns (0, 1 or 2).
pub fn char_width(c: char) -> usize {
    classify(c).columns()
}

/// Display width of a string: the sum of its codepoint widths.
///
/// Escape sequences are NOT recognised here; use
/// [`visible_width`](crate::text::visible_width) for styled text.
pub fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Split `s` into the longest prefix fitting in `max_width` columns and the rest.
///
/// Never splits a codepoint. Zero-width codepoints following the last fitting
/// codepoint stay attached to the prefix.
///
/// # Guarantees
/// - `str_width(prefix) <= max_width`
/// - `prefix + suffix == s`
pub fn take_by_width(s: &str, max_width: usize) -> (&str, &str) {
    if max_width == 0 || s.is_empty() {
        return ("", s);
    }

    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = char_width(c);
        if used + w > max_width {
            return s.split_at(idx);
        }
        used += w;
    }
    (s, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_narrow() {
        assert_eq!(classify('a'), WidthClass::Narrow);
        assert_eq!(str_width("hello"), 5);
    }

    #[test]
    fn combining_marks_are_zero_width() {
        assert_eq!(char_width('\u{0301}'), 0);
        assert_eq!(str_width("e\u{0301}"), 1);
    }

    #[test]
    fn joiners_and_variation_selectors_are_zero_width() {
        assert_eq!(char_width('\u{200D}'), 0);
        assert_eq!(char_width('\u{200C}'), 0);
        assert_eq!(char_width('\u{FE0F}'), 0);
    }

    #[test]
    fn cjk_hangul_and_fullwidth_are_wide() {
        assert_eq!(char_width('中'), 2);
        assert_eq!(char_width('한'), 2);
        assert_eq!(char_width('Ａ'), 2);
        assert_eq!(str_width("日本語"), 6);
    }

    #[test]
    fn emoji_are_wide() {
        assert_eq!(char_width('😀'), 2);
        assert_eq!(char_width('🚀'), 2);
        assert_eq!(char_width('⚡'), 2);
    }

    #[test]
    fn block_elements_stay_narrow() {
        assert_eq!(char_width('█'), 1);
        assert_eq!(char_width('▀'), 1);
        assert_eq!(char_width('─'), 1);
    }

    #[test]
    fn take_by_width_zero_budget_returns_everything_as_suffix() {
        assert_eq!(take_by_width("abc", 0), ("", "abc"));
        assert_eq!(take_by_width("", 5), ("", ""));
    }

    #[test]
    fn take_by_width_stops_before_overflowing_wide_char() {
        assert_eq!(take_by_width("ab中c", 3), ("ab", "中c"));
        assert_eq!(take_by_width("ab中c", 4), ("ab中", "c"));
    }

    #[test]
    fn take_by_width_keeps_trailing_combining_mark() {
        assert_eq!(take_by_width("ae\u{0301}b", 2), ("ae\u{0301}", "b"));
    }

    #[test]
    fn take_by_width_whole_string_fits() {
        assert_eq!(take_by_width("abc", 10), ("abc", ""));
    }

    #[test]
    fn range_tables_are_sorted_for_binary_search() {
        for table in [ZERO_WIDTH_RANGES, WIDE_RANGES] {
            for pair in table.windows(2) {
                assert!(pair[0].1 < pair[1].0, "overlapping or unsorted: {:?}", pair);
            }
        }
    }
}
