//! LRU cache for computed image previews.

use super::backend::BackendKind;
use crate::view_state::PhysicalLine;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Key for preview cache lookup.
///
/// Includes every parameter that changes the rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    /// Resolved image URL.
    pub url: String,
    /// Target width in columns.
    pub width: usize,
    /// Maximum preview rows.
    pub max_lines: usize,
    /// Backend that rendered the entry.
    pub backend: BackendKind,
}

impl PreviewKey {
    /// Create new preview cache key.
    pub fn new(url: impl Into<String>, width: usize, max_lines: usize, backend: BackendKind) -> Self {
        Self {
            url: url.into(),
            width,
            max_lines,
            backend,
        }
    }
}

/// Outcome of one preview computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Non-empty sanitized rows.
    Lines(Vec<PhysicalLine>),
    /// No usable preview. Cached so the same key is not retried.
    Rejected,
}

impl Preview {
    /// Preview rows; empty when rejected.
    pub fn lines(&self) -> &[PhysicalLine] {
        match self {
            Preview::Lines(lines) => lines,
            Preview::Rejected => &[],
        }
    }

    /// Wrap `lines`, mapping an empty list to [`Preview::Rejected`].
    pub fn from_lines(lines: Vec<PhysicalLine>) -> Self {
        if lines.is_empty() {
            Preview::Rejected
        } else {
            Preview::Lines(lines)
        }
    }
}

/// Preview cache with optional LRU bound.
///
/// A capacity of 0 keeps every entry for the process lifetime.
pub struct PreviewCache {
    cache: LruCache<PreviewKey, Preview>,
}

impl PreviewCache {
    /// Create a cache holding at most `capacity` entries (0 = unbounded).
    pub fn new(capacity: usize) -> Self {
        let cache = match NonZeroUsize::new(capacity) {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self { cache }
    }

    /// Get cached preview if present.
    ///
    /// Updates LRU ordering (most recently used).
    pub fn get(&mut self, key: &PreviewKey) -> Option<&Preview> {
        self.cache.get(key)
    }

    /// Get cached preview without touching LRU ordering.
    pub fn peek(&self, key: &PreviewKey) -> Option<&Preview> {
        self.cache.peek(key)
    }

    /// Insert a computed preview.
    ///
    /// If cache is at capacity, evicts least recently used entry.
    pub fn put(&mut self, key: PreviewKey, preview: Preview) {
        self.cache.put(key, preview);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for PreviewCache {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(url: &str) -> PreviewKey {
        PreviewKey::new(url, 40, 12, BackendKind::Chafa)
    }

    fn preview(rows: usize) -> Preview {
        Preview::from_lines(
            (0..rows)
                .map(|i| PhysicalLine::new(format!("Line {}", i)))
                .collect(),
        )
    }

    // ===== PreviewKey Tests =====

    #[test]
    fn preview_key_equality_requires_all_fields_match() {
        let key1 = PreviewKey::new("u1", 40, 12, BackendKind::Chafa);
        let key2 = PreviewKey::new("u1", 40, 12, BackendKind::Chafa);
        let key3 = PreviewKey::new("u2", 40, 12, BackendKind::Chafa);
        let key4 = PreviewKey::new("u1", 41, 12, BackendKind::Chafa);
        let key5 = PreviewKey::new("u1", 40, 13, BackendKind::Chafa);
        let key6 = PreviewKey::new("u1", 40, 12, BackendKind::Timg);

        assert_eq!(key1, key2, "Identical keys should be equal");
        assert_ne!(key1, key3, "Different URL should not match");
        assert_ne!(key1, key4, "Different width should not match");
        assert_ne!(key1, key5, "Different max_lines should not match");
        assert_ne!(key1, key6, "Different backend should not match");
    }

    // ===== Preview Tests =====

    #[test]
    fn empty_lines_become_rejected() {
        assert_eq!(Preview::from_lines(Vec::new()), Preview::Rejected);
        assert!(Preview::Rejected.lines().is_empty());
    }

    // ===== PreviewCache Tests =====

    #[test]
    fn new_cache_is_empty() {
        let cache = PreviewCache::new(10);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn put_then_get_returns_preview() {
        let mut cache = PreviewCache::new(10);
        cache.put(key("a"), preview(3));
        assert_eq!(cache.get(&key("a")).map(|p| p.lines().len()), Some(3));
    }

    #[test]
    fn rejected_entries_are_cached() {
        let mut cache = PreviewCache::new(10);
        cache.put(key("bad"), Preview::Rejected);
        assert_eq!(cache.get(&key("bad")), Some(&Preview::Rejected));
    }

    #[test]
    fn bounded_cache_evicts_least_recently_used() {
        let mut cache = PreviewCache::new(2);
        cache.put(key("a"), preview(1));
        cache.put(key("b"), preview(1));
        // Touch "a" so "b" becomes least recently used.
        cache.get(&key("a"));
        cache.put(key("c"), preview(1));

        assert_eq!(cache.len(), 2);
        assert!(cache.peek(&key("a")).is_some());
        assert!(cache.peek(&key("b")).is_none(), "LRU entry should be evicted");
        assert!(cache.peek(&key("c")).is_some());
    }

    #[test]
    fn zero_capacity_is_unbounded() {
        let mut cache = PreviewCache::new(0);
        for i in 0..500 {
            cache.put(key(&format!("u{i}")), preview(1));
        }
        assert_eq!(cache.len(), 500);
    }
}
