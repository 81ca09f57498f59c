//! Forum posts and threads.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One forum post.
///
/// `raw` is the author's markdown, which still carries image syntax. `text` is
/// the plain-text rendering produced upstream; when absent, `raw` is shown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    /// Post identifier.
    pub id: u64,
    /// Author's username.
    pub author: String,
    /// Whether the current user liked the post.
    #[serde(default)]
    pub liked: bool,
    /// Creation time, when known.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Markdown source.
    #[serde(default)]
    pub raw: String,
    /// Plain-text content.
    #[serde(default)]
    pub text: Option<String>,
}

impl Post {
    /// Text to wrap into the post body.
    pub fn plain_text(&self) -> &str {
        self.text.as_deref().unwrap_or(&self.raw)
    }
}

/// An ordered list of posts with an optional title.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Thread {
    /// Topic title.
    pub title: Option<String>,
    /// Posts in display order.
    pub posts: Vec<Post>,
}

/// Accepted document shapes: `{"title": .., "posts": [..]}` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ThreadDocument {
    Object {
        #[serde(default)]
        title: Option<String>,
        posts: Vec<Post>,
    },
    Array(Vec<Post>),
}

impl<'de> Deserialize<'de> for Thread {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ThreadDocument::deserialize(deserializer)? {
            ThreadDocument::Object { title, posts } => Thread { title, posts },
            ThreadDocument::Array(posts) => Thread { title: None, posts },
        })
    }
}

/// Compact age such as `5m`, `3h`, `2d`, `4mo` or `1y`.
///
/// Times in the future render as `now`.
pub fn relative_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created).num_seconds();
    match seconds {
        s if s < 60 => "now".to_string(),
        s if s < 3_600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3_600),
        s if s < 30 * 86_400 => format!("{}d", s / 86_400),
        s if s < 365 * 86_400 => format!("{}mo", s / (30 * 86_400)),
        s => format!("{}y", s / (365 * 86_400)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_object_document() {
        let json = r#"{
            "title": "Hello",
            "posts": [
                {"id": 1, "author": "ann", "liked": true,
                 "created_at": "2024-05-31T12:00:00Z", "raw": "hi ![](a.png)", "text": "hi"}
            ]
        }"#;
        let thread: Thread = serde_json::from_str(json).unwrap();
        assert_eq!(thread.title.as_deref(), Some("Hello"));
        assert_eq!(thread.posts.len(), 1);
        let post = &thread.posts[0];
        assert!(post.liked);
        assert_eq!(post.plain_text(), "hi");
        assert_eq!(post.created_at, Some(now() - Duration::days(1)));
    }

    #[test]
    fn parses_bare_array_with_defaults() {
        let json = r#"[{"id": 7, "author": "bo", "raw": "body"}]"#;
        let thread: Thread = serde_json::from_str(json).unwrap();
        assert_eq!(thread.title, None);
        let post = &thread.posts[0];
        assert!(!post.liked);
        assert_eq!(post.created_at, None);
        assert_eq!(post.plain_text(), "body");
    }

    #[test]
    fn rejects_post_without_author() {
        let json = r#"[{"id": 7, "raw": "body"}]"#;
        assert!(serde_json::from_str::<Thread>(json).is_err());
    }

    #[test]
    fn relative_age_buckets() {
        assert_eq!(relative_age(now() - Duration::seconds(30), now()), "now");
        assert_eq!(relative_age(now() - Duration::minutes(5), now()), "5m");
        assert_eq!(relative_age(now() - Duration::hours(3), now()), "3h");
        assert_eq!(relative_age(now() - Duration::days(2), now()), "2d");
        assert_eq!(relative_age(now() - Duration::days(65), now()), "2mo");
        assert_eq!(relative_age(now() - Duration::days(800), now()), "2y");
    }

    #[test]
    fn future_timestamp_is_now() {
        assert_eq!(relative_age(now() + Duration::hours(1), now()), "now");
    }
}
