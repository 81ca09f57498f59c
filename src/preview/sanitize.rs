//! Cleaning raw renderer output into safe physical lines.
//!
//! Renderers emit cursor movement, mode switches, hyperlinks and other
//! sequences besides colour. Only SGR may reach the screen, and only in
//! colour modes.

use super::backend::RenderMode;
use crate::text::{strip_escapes, truncate_keeping_escapes};
use crate::view_state::PhysicalLine;

/// Clean `raw` renderer output.
///
/// Every control byte and every escape other than SGR is removed; SGR is kept
/// only when `mode` keeps colour. Each line is clipped to `width` columns, the
/// output is capped at `max_lines`, and trailing blank lines are dropped.
pub fn sanitize(raw: &str, width: usize, max_lines: usize, mode: RenderMode) -> Vec<PhysicalLine> {
    let keep_sgr = mode.keeps_color();
    let mut lines: Vec<PhysicalLine> = raw
        .split('\n')
        .take(max_lines)
        .map(|line| {
            let clean = clean_line(line, keep_sgr);
            PhysicalLine::new(truncate_keeping_escapes(&clean, width))
        })
        .collect();

    while lines
        .last()
        .is_some_and(|line| strip_escapes(line.as_str()).trim().is_empty())
    {
        lines.pop();
    }
    lines
}

/// Remove controls and non-SGR escapes from one line.
fn clean_line(line: &str, keep_sgr: bool) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.next() {
                Some('[') => {
                    let mut params = String::new();
                    let mut final_byte = None;
                    for p in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&p) {
                            final_byte = Some(p);
                            break;
                        }
                        params.push(p);
                    }
                    let is_sgr = final_byte == Some('m')
                        && params.chars().all(|p| p.is_ascii_digit() || p == ';' || p == ':');
                    if keep_sgr && is_sgr {
                        out.push_str("\x1b[");
                        out.push_str(&params);
                        out.push('m');
                    }
                }
                // OSC, DCS, SOS, PM and APC run to BEL or ST.
                Some(']' | 'P' | 'X' | '^' | '_') => {
                    while let Some(p) = chars.next() {
                        if p == '\x07' {
                            break;
                        }
                        if p == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                // Two-byte escapes (charset selection, keypad modes, ...).
                Some(_) | None => {}
            },
            '\t' => out.push(' '),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}
