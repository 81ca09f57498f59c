//! Image reference extraction from post markdown.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

/// Markdown image: `![alt](target "title")`, target optionally in `<>`.
fn markdown_image() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"!\[[^\]]*\]\(\s*<?([^)\s>]+)>?(?:\s+"[^"]*")?\s*\)"#)
            .expect("markdown image pattern is valid")
    })
}

/// HTML image tag with a double-quoted `src`.
fn html_image() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<img\b[^>]*?\ssrc="([^"]+)""#).expect("html image pattern is valid")
    })
}

/// Bare absolute or protocol-relative URL ending in an image extension.
///
/// The URL (group 1) must start the text or follow a delimiter, so the tail
/// of `upload://name.png` is not mistaken for a protocol-relative link.
fn bare_image_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?i)(?:^|[\s(<>\["'=])((?:https?:)?//[^\s<>"'()\[\]]+\.(?:png|jpe?g|gif|webp|bmp)(?:\?[^\s<>"'()\[\]]*)?)"#,
        )
        .expect("bare image pattern is valid")
    })
}

/// Resolve one image reference to an absolute http(s) URL.
///
/// `upload://name` short links map to `<base>/uploads/short-url/name`;
/// root-relative and protocol-relative references are joined onto `base`.
/// Returns `None` when the reference cannot be made absolute.
pub fn resolve_reference(reference: &str, base: Option<&Url>) -> Option<String> {
    let resolved = if let Some(name) = reference.strip_prefix("upload://") {
        base?.join(&format!("/uploads/short-url/{name}")).ok()?
    } else if let Ok(absolute) = Url::parse(reference) {
        absolute
    } else {
        base?.join(reference).ok()?
    };
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// All image references in `raw`, resolved, de-duplicated, in document order.
pub fn extract_image_references(raw: &str, base: Option<&Url>) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = Vec::new();
    for re in [markdown_image(), html_image(), bare_image_url()] {
        found.extend(
            re.captures_iter(raw)
                .filter_map(|caps| caps.get(1))
                .map(|m| (m.start(), m.as_str())),
        );
    }
    found.sort_by_key(|(start, _)| *start);

    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter_map(|(_, reference)| resolve_reference(reference, base))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// The reference that gets previewed. Only the first image of a post is shown.
pub fn first_image_reference(raw: &str, base: Option<&Url>) -> Option<String> {
    extract_image_references(raw, base).into_iter().next()
}

/// Remove markdown image syntax from `text`, dropping lines left empty.
pub fn strip_image_markup(text: &str) -> String {
    let mut out = Vec::new();
    for line in text.split('\n') {
        if !markdown_image().is_match(line) {
            out.push(line.to_string());
            continue;
        }
        let stripped = markdown_image().replace_all(line, "");
        let stripped = stripped.trim_end();
        if !stripped.trim().is_empty() {
            out.push(stripped.to_string());
        }
    }
    out.join("\n")
}
