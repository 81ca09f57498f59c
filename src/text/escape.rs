//! Measurement and editing of text carrying SGR and hyperlink escapes.
//!
//! Only two escape forms are recognised, both zero-width:
//!
//! - SGR: `ESC [ params m` where params are digits, `;` or `:`
//! - OSC 8 hyperlink: `ESC ] 8 ; params ; target BEL` (the closer has an empty target)
//!
//! Anything else starting with `ESC` is literal text. The tokenizer is a small
//! state machine over bytes so malformed or unterminated sequences can never
//! swallow following text.

use super::width::{char_width, str_width};

const ESC: u8 = 0x1b;

/// Neutral SGR reset appended after truncated styled text.
pub const SGR_RESET: &str = "\x1b[0m";

/// Hyperlink closer (OSC 8 with empty target).
pub const LINK_CLOSE: &str = "\x1b]8;;\x07";

/// One lexical unit of escape-bearing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Printable text (may contain literal, unrecognised escape bytes).
    Text(&'a str),
    /// A complete SGR sequence.
    Sgr(&'a str),
    /// A complete OSC 8 sequence; `target` is empty for a closer.
    Link {
        /// The full sequence as it appeared.
        raw: &'a str,
        /// The link target.
        target: &'a str,
    },
}

/// Iterator over [`Token`]s of a string.
pub struct Tokens<'a> {
    src: &'a str,
    pos: usize,
}

/// Tokenize `s` into text runs and recognised escapes.
pub fn tokenize(s: &str) -> Tokens<'_> {
    Tokens { src: s, pos: 0 }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let bytes = self.src.as_bytes();
        if self.pos >= bytes.len() {
            return None;
        }

        let start = self.pos;
        if let Some(end) = match_escape(bytes, start) {
            self.pos = end;
            let raw = &self.src[start..end];
            return Some(classify_escape(raw));
        }

        // Consume text up to the next ESC that begins a recognised escape.
        let mut i = start + 1;
        while i < bytes.len() {
            if bytes[i] == ESC && match_escape(bytes, i).is_some() {
                break;
            }
            i += 1;
        }
        // ESC is ASCII, so `i` always lands on a char boundary.
        self.pos = i;
        Some(Token::Text(&self.src[start..i]))
    }
}

fn classify_escape(raw: &str) -> Token<'_> {
    if raw.as_bytes().get(1) == Some(&b'[') {
        return Token::Sgr(raw);
    }
    // ESC ] 8 ; params ; target BEL
    let body = &raw[4..raw.len() - 1];
    let target = body.split_once(';').map(|(_, t)| t).unwrap_or("");
    Token::Link { raw, target }
}

#[derive(Clone, Copy)]
enum State {
    Start,
    Esc,
    CsiParams,
    OscEight,
    OscSemi,
    OscParams,
    OscTarget,
}

/// Return the end offset of a recognised escape starting at `start`.
fn match_escape(bytes: &[u8], start: usize) -> Option<usize> {
    let mut state = State::Start;
    let mut i = start;
    while i < bytes.len() {
        let b = bytes[i];
        state = match (state, b) {
            (State::Start, ESC) => State::Esc,
            (State::Esc, b'[') => State::CsiParams,
            (State::Esc, b']') => State::OscEight,
            (State::CsiParams, b'0'..=b'9' | b';' | b':') => State::CsiParams,
            (State::CsiParams, b'm') => return Some(i + 1),
            (State::OscEight, b'8') => State::OscSemi,
            (State::OscSemi, b';') => State::OscParams,
            (State::OscParams, b';') => State::OscTarget,
            (State::OscParams, c) if !c.is_ascii_control() => State::OscParams,
            (State::OscTarget, 0x07) => return Some(i + 1),
            (State::OscTarget, c) if !c.is_ascii_control() => State::OscTarget,
            _ => return None,
        };
        i += 1;
    }
    None
}

/// Remove every recognised escape, leaving printable text.
///
/// Malformed or unterminated escapes are kept as literal text.
pub fn strip_escapes(s: &str) -> String {
    tokenize(s)
        .filter_map(|t| match t {
            Token::Text(text) => Some(text),
            _ => None,
        })
        .collect()
}

/// Display width of `s` ignoring recognised escapes.
pub fn visible_width(s: &str) -> usize {
    tokenize(s)
        .map(|t| match t {
            Token::Text(text) => str_width(text),
            _ => 0,
        })
        .sum()
}

/// Truncate `s` to at most `max_width` visible columns.
///
/// Escapes are copied through unchanged. Copying stops at the first character
/// that does not fit. Style and hyperlink state left open by the copied prefix
/// is closed, so the result never bleeds into following terminal content.
pub fn truncate_keeping_escapes(s: &str, max_width: usize) -> String {
    let mut out = String::with_capacity(s.len());
    let mut used = 0;
    let mut style_open = false;
    let mut link_open = false;

    'tokens: for token in tokenize(s) {
        match token {
            Token::Sgr(raw) => {
                out.push_str(raw);
                style_open = !is_reset(raw);
            }
            Token::Link { raw, target } => {
                out.push_str(raw);
                link_open = !target.is_empty();
            }
            Token::Text(text) => {
                for c in text.chars() {
                    let w = char_width(c);
                    if used + w > max_width {
                        break 'tokens;
                    }
                    out.push(c);
                    used += w;
                }
            }
        }
    }

    if link_open {
        out.push_str(LINK_CLOSE);
    }
    if style_open {
        out.push_str(SGR_RESET);
    }
    out
}

fn is_reset(sgr: &str) -> bool {
    matches!(sgr, "\x1b[m" | "\x1b[0m")
}

/// Right-pad `s` with spaces to `width` visible columns.
///
/// Strings already at or beyond `width` are returned unchanged.
pub fn pad_visible(s: &str, width: usize) -> String {
    let current = visible_width(s);
    if current >= width {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + width - current);
    out.push_str(s);
    out.extend(std::iter::repeat(' ').take(width - current));
    out
}

/// Wrap `display` in an OSC 8 hyperlink pointing at `href`.
pub fn hyperlink(href: &str, display: &str) -> String {
    format!("\x1b]8;;{href}\x07{display}{LINK_CLOSE}")
}

/// Wrap `text` in an SGR sequence and a trailing reset.
pub fn styled(sgr_params: &str, text: &str) -> String {
    format!("\x1b[{sgr_params}m{text}{SGR_RESET}")
}
