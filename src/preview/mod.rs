//! Image preview subsystem.
//!
//! Post markdown may reference images. For the first one, the pipeline
//! downloads the bytes, asks an external tool to draw them as terminal glyphs,
//! cleans and vets the output, and caches the result.
//!
//! # Module Structure
//!
//! - `extract`: image references from markdown, resolved to absolute URLs
//! - `fetch`: `ByteFetcher` trait and the blocking HTTP implementation
//! - `backend`: `Renderer` trait, backend selection, chafa/timg processes
//! - `sanitize`: renderer output to safe physical lines
//! - `quality`: rejection of mostly-flat block output
//! - `cache`: keyed LRU of finished previews
//! - `pipeline`: `ImagePreviewPipeline` tying the stages together
//! - `worker`: background thread feeding the pipeline

pub mod backend;
pub mod cache;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod quality;
pub mod sanitize;
pub mod worker;

pub use backend::{BackendChoice, BackendKind, BackendSelection, ProcessRenderer, RenderMode, Renderer};
pub use cache::{Preview, PreviewCache, PreviewKey};
pub use extract::{extract_image_references, first_image_reference, strip_image_markup};
pub use fetch::{ByteFetcher, HttpFetcher};
pub use pipeline::{ImagePreviewPipeline, PreviewSettings};
pub use worker::{PreviewReady, PreviewRequest, PreviewWorker};
