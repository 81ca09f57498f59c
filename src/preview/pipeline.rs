//! The image preview pipeline: extract, fetch, render, sanitize, filter, cache.

use super::backend::{BackendChoice, BackendKind, BackendSelection, RenderMode, Renderer};
use super::cache::{Preview, PreviewCache, PreviewKey};
use super::extract::first_image_reference;
use super::fetch::ByteFetcher;
use super::quality::GlyphStats;
use super::sanitize::sanitize;
use crate::model::error::PreviewError;
use crate::view_state::PhysicalLine;
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use url::Url;

/// Default byte ceiling for image downloads.
pub const DEFAULT_MAX_BYTES: usize = 8 * 1024 * 1024;

/// Tunables for preview computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSettings {
    /// Largest image body accepted.
    pub max_bytes: usize,
    /// Colour handling and glyph density.
    pub mode: RenderMode,
    /// Whether to reject mostly-flat block output.
    pub quality_filter: bool,
    /// Base for resolving relative and `upload://` references.
    pub base_url: Option<Url>,
    /// Cache bound (0 = unbounded).
    pub cache_capacity: usize,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            mode: RenderMode::Color,
            quality_filter: true,
            base_url: None,
            cache_capacity: 0,
        }
    }
}

/// Turns image references into cached glyph previews.
///
/// Every failure is absorbed: the caller only ever sees [`Preview::Lines`]
/// or [`Preview::Rejected`], and both are cached under the request key.
pub struct ImagePreviewPipeline {
    fetcher: Box<dyn ByteFetcher>,
    renderer: Box<dyn Renderer>,
    selection: BackendSelection,
    settings: PreviewSettings,
    cache: Mutex<PreviewCache>,
    /// Serializes computations so each key is computed once.
    compute: Mutex<()>,
}

impl ImagePreviewPipeline {
    /// Build a pipeline, resolving the backend once against `renderer`.
    pub fn new(
        fetcher: Box<dyn ByteFetcher>,
        renderer: Box<dyn Renderer>,
        choice: BackendChoice,
        settings: PreviewSettings,
    ) -> Self {
        let selection = BackendSelection::resolve(choice, renderer.as_ref());
        info!(?selection, mode = ?settings.mode, "Image preview pipeline ready");
        Self {
            fetcher,
            renderer,
            selection,
            cache: Mutex::new(PreviewCache::new(settings.cache_capacity)),
            settings,
            compute: Mutex::new(()),
        }
    }

    /// Backend resolved at construction.
    pub fn selection(&self) -> BackendSelection {
        self.selection
    }

    /// Whether any backend is usable.
    pub fn is_enabled(&self) -> bool {
        self.selection.primary().is_some()
    }

    /// The image that would be previewed for a post's markdown.
    pub fn image_for(&self, raw: &str) -> Option<String> {
        first_image_reference(raw, self.settings.base_url.as_ref())
    }

    /// Whether the post has an image this pipeline could preview.
    pub fn has_previewable_image(&self, raw: &str) -> bool {
        self.is_enabled() && self.image_for(raw).is_some()
    }

    /// Cache key for a request, or `None` when previews are disabled.
    pub fn key_for(&self, url: &str, width: usize, max_lines: usize) -> Option<PreviewKey> {
        let backend = self.selection.primary()?;
        Some(PreviewKey::new(url, width, max_lines, backend))
    }

    /// Cached result for a request, without computing anything.
    pub fn cached(&self, url: &str, width: usize, max_lines: usize) -> Option<Preview> {
        let key = self.key_for(url, width, max_lines)?;
        self.lock_cache().peek(&key).cloned()
    }

    /// Preview `url` at `width × max_lines`, computing it on a cache miss.
    ///
    /// Blocks on network and process I/O; run it off the render thread.
    pub fn preview(&self, url: &str, width: usize, max_lines: usize) -> Preview {
        let Some(key) = self.key_for(url, width, max_lines) else {
            return Preview::Rejected;
        };
        if let Some(hit) = self.lock_cache().get(&key) {
            return hit.clone();
        }

        let _computing = self.compute.lock().unwrap_or_else(|p| p.into_inner());
        // Another caller may have finished this key while we waited.
        if let Some(hit) = self.lock_cache().get(&key) {
            return hit.clone();
        }

        let preview = self.compute(&key);
        debug!(
            url,
            width,
            max_lines,
            rows = preview.lines().len(),
            "Computed image preview"
        );
        self.lock_cache().put(key, preview.clone());
        preview
    }

    fn lock_cache(&self) -> MutexGuard<'_, PreviewCache> {
        self.cache.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn compute(&self, key: &PreviewKey) -> Preview {
        if key.width == 0 || key.max_lines == 0 {
            return Preview::Rejected;
        }
        match self.fetch_and_render(key) {
            Ok(lines) => self.filter(lines),
            Err(err) => {
                warn!(url = %key.url, error = %err, "Image preview failed");
                Preview::Rejected
            }
        }
    }

    fn fetch_and_render(&self, key: &PreviewKey) -> Result<Vec<PhysicalLine>, PreviewError> {
        let bytes = self.fetcher.fetch(&key.url, self.settings.max_bytes)?;
        let mut file = tempfile::Builder::new()
            .prefix("threadview-")
            .tempfile()?;
        file.write_all(&bytes)?;
        file.flush()?;

        let primary = self.render_with(key.backend, file.path(), key);
        let Some(other) = self.selection.fallback() else {
            return primary;
        };
        match primary {
            Ok(lines) if !lines.is_empty() => Ok(lines),
            Ok(_) => {
                debug!(
                    from = key.backend.command(),
                    to = other.command(),
                    "Empty preview, retrying with other backend"
                );
                self.render_with(other, file.path(), key)
            }
            Err(err) => {
                debug!(
                    from = key.backend.command(),
                    to = other.command(),
                    error = %err,
                    "Preview render failed, retrying with other backend"
                );
                self.render_with(other, file.path(), key)
            }
        }
    }

    fn render_with(
        &self,
        backend: BackendKind,
        path: &Path,
        key: &PreviewKey,
    ) -> Result<Vec<PhysicalLine>, PreviewError> {
        let mode = self.settings.mode;
        let raw = self
            .renderer
            .render(backend, path, key.width, key.max_lines, mode)?;
        Ok(sanitize(&raw, key.width, key.max_lines, mode))
    }

    fn filter(&self, lines: Vec<PhysicalLine>) -> Preview {
        let skip = !self.settings.quality_filter || self.settings.mode == RenderMode::HighFidelity;
        if !skip {
            let stats = GlyphStats::measure(&lines);
            if stats.is_low_quality() {
                debug!(?stats, "Rejected low-quality preview");
                return Preview::Rejected;
            }
        }
        Preview::from_lines(lines)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
