//! Splitting a logical line into plain and hyperlink segments.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// A run of a logical line: plain text or a literal URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment<'a> {
    /// Ordinary text.
    Plain(&'a str),
    /// A URL found in the line.
    Hyperlink {
        /// Link target exactly as written.
        href: &'a str,
        /// Human-readable form (percent-decoded, control characters removed).
        display: String,
    },
}

impl TextSegment<'_> {
    /// Source text this segment was cut from.
    pub fn source(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Hyperlink { href, .. } => href,
        }
    }
}

fn url_regex() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| {
        Regex::new(r#"https?://[^\s<>"'`\x00-\x1f\x7f]+"#).expect("URL pattern is valid")
    })
}

/// Trim trailing sentence punctuation and unbalanced closing brackets.
fn trim_url_end(url: &str) -> &str {
    let mut end = url.len();
    loop {
        let candidate = &url[..end];
        let Some(last) = candidate.chars().last() else {
            break;
        };
        let strip = match last {
            '.' | ',' | ';' | ':' | '!' | '?' => true,
            ')' => candidate.matches('(').count() < candidate.matches(')').count(),
            ']' => candidate.matches('[').count() < candidate.matches(']').count(),
            _ => false,
        };
        if !strip {
            break;
        }
        end -= last.len_utf8();
    }
    &url[..end]
}

/// Human-readable form of a URL.
///
/// Percent-escapes are decoded when they form valid UTF-8; control characters
/// are removed either way so the result is always safe to print.
pub fn display_url(href: &str) -> String {
    let decoded = urlencoding::decode(href).unwrap_or(Cow::Borrowed(href));
    decoded.chars().filter(|c| !c.is_control()).collect()
}

/// Split `line` into ordered, non-overlapping segments.
///
/// Concatenating the `source()` of every segment reproduces `line`.
pub fn segment_line(line: &str) -> Vec<TextSegment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for m in url_regex().find_iter(line) {
        let href = trim_url_end(m.as_str());
        // Nothing left after the scheme once punctuation is trimmed
        if href.split_once("://").is_none_or(|(_, rest)| rest.is_empty()) {
            continue;
        }
        if m.start() > cursor {
            segments.push(TextSegment::Plain(&line[cursor..m.start()]));
        }
        segments.push(TextSegment::Hyperlink {
            href,
            display: display_url(href),
        });
        cursor = m.start() + href.len();
    }

    if cursor < line.len() {
        segments.push(TextSegment::Plain(&line[cursor..]));
    }
    segments
}
