//! Terminal rendering and event loop (impure shell)

pub mod coordinator;
pub mod screen;

pub use coordinator::{clean_body, Frame, Layout, PreviewNeed, RenderCoordinator, STATUS_ROWS};
pub use screen::Screen;

use crate::config::{KeyBindings, ResolvedConfig};
use crate::model::{AppError, KeyAction, Thread};
use crate::preview::{
    HttpFetcher, ImagePreviewPipeline, PreviewRequest, PreviewSettings, PreviewWorker,
    ProcessRenderer,
};
use crate::state::{AppState, ScrollGeometry};
use crate::view_state::ViewportDimensions;
use chrono::Utc;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEvent, KeyEventKind},
    terminal::{
        self, disable_raw_mode, enable_raw_mode, BeginSynchronizedUpdate, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
    ExecutableCommand, QueueableCommand,
};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Main viewer application.
///
/// Generic over the output writer so tests can render into a buffer.
pub struct TuiApp<W: Write> {
    out: W,
    thread: Thread,
    state: AppState,
    coordinator: RenderCoordinator,
    key_bindings: KeyBindings,
    worker: Option<PreviewWorker>,
    dims: ViewportDimensions,
    /// Focused block geometry from the last frame.
    geometry: ScrollGeometry,
    tick: Duration,
    dirty: bool,
}

impl<W: Write> TuiApp<W> {
    /// Create an application drawing into `out` at `dims`.
    pub fn new(
        out: W,
        thread: Thread,
        coordinator: RenderCoordinator,
        worker: Option<PreviewWorker>,
        dims: ViewportDimensions,
        tick: Duration,
    ) -> Self {
        let state = AppState::new(thread.posts.len());
        Self {
            out,
            thread,
            state,
            coordinator,
            key_bindings: KeyBindings::default(),
            worker,
            dims,
            geometry: ScrollGeometry::default(),
            tick,
            dirty: true,
        }
    }

    /// Current state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Writer the frames go to.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run the main event loop until the user quits.
    ///
    /// Waits up to one tick for input, then picks up finished previews and
    /// redraws if anything changed.
    ///
    /// # Errors
    ///
    /// Returns any terminal I/O error.
    pub fn run(&mut self) -> Result<(), AppError> {
        loop {
            if self.dirty {
                self.draw()?;
            }

            if event::poll(self.tick)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            break;
                        }
                    }
                    Event::Resize(width, height) => self.handle_resize(width, height),
                    _ => {}
                }
            }

            self.poll_previews();
        }
        Ok(())
    }

    /// Handle a key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };
        debug!(?action, "Key action");
        if action == KeyAction::ToggleImage && !self.focused_has_image() {
            return false;
        }
        if self.state.apply(action, self.geometry) {
            self.dirty = true;
        }
        self.state.should_quit()
    }

    fn focused_has_image(&self) -> bool {
        self.thread
            .posts
            .get(self.state.focus().get())
            .is_some_and(|post| self.coordinator.has_previewable_image(post))
    }

    /// Adopt new terminal dimensions. The next frame relays out.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "Terminal resized");
        self.dims = ViewportDimensions::new(width, height);
        self.dirty = true;
    }

    /// Drain finished previews from the worker.
    ///
    /// Marks the frame dirty when a result belongs to a post that shows its
    /// preview, whichever selection the request was made under.
    pub fn poll_previews(&mut self) {
        let Some(worker) = self.worker.as_ref() else {
            return;
        };
        while let Some(ready) = worker.try_recv() {
            if self.state.accept(&ready) {
                self.dirty = true;
            }
        }
    }

    /// Render one frame, queue any previews it is waiting on, and write it.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the writer.
    pub fn draw(&mut self) -> io::Result<()> {
        let frame = self
            .coordinator
            .render(&self.thread, &self.state, self.dims, Utc::now());

        if self.state.post_count() > 0 {
            self.state.sync_focus_offset(frame.layout.viewport.focus_offset);
        }
        self.geometry = frame.layout.focus_geometry;
        self.request_previews(&frame.layout);

        self.out.queue(BeginSynchronizedUpdate)?;
        frame.screen.write_to(&mut self.out)?;
        self.out.queue(EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.dirty = false;
        Ok(())
    }

    fn request_previews(&mut self, layout: &Layout) {
        let Some(worker) = self.worker.as_ref() else {
            return;
        };
        for need in &layout.wanted {
            if !self.state.begin_request(need.post, need.width) {
                continue;
            }
            let sent = worker.request(PreviewRequest {
                generation: self.state.generation(),
                post: need.post,
                url: need.url.clone(),
                width: need.width,
                max_lines: need.max_lines,
            });
            if !sent {
                warn!(post = need.post, "Preview worker is gone");
            }
        }
    }
}

/// Build the preview pipeline described by `config`.
///
/// Returns `None` when the HTTP client cannot be created; the viewer then
/// runs without previews.
///
/// # Errors
///
/// Returns `AppError::Config` if the forum base URL is invalid.
pub fn build_pipeline(config: &ResolvedConfig) -> Result<Option<Arc<ImagePreviewPipeline>>, AppError> {
    let settings = PreviewSettings {
        max_bytes: config.preview_max_bytes,
        mode: config.image_mode,
        quality_filter: config.quality_filter,
        base_url: config.base_url()?,
        cache_capacity: config.preview_cache_capacity,
    };

    let fetcher = match HttpFetcher::new(config.fetch_timeout()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            warn!(error = %e, "HTTP client unavailable, image previews disabled");
            return Ok(None);
        }
    };
    let renderer = ProcessRenderer::new(config.render_timeout());

    Ok(Some(Arc::new(ImagePreviewPipeline::new(
        Box::new(fetcher),
        Box::new(renderer),
        config.image_backend,
        settings,
    ))))
}

/// Set up the terminal, view `thread` until the user quits, and restore it.
///
/// Note: Logging must be initialized by caller before calling this function.
///
/// # Errors
///
/// Returns configuration errors and terminal I/O errors.
pub fn run_with_thread(thread: Thread, config: &ResolvedConfig) -> Result<(), AppError> {
    let pipeline = build_pipeline(config)?;
    let worker = match pipeline.as_ref().filter(|p| p.is_enabled()) {
        Some(p) => Some(PreviewWorker::spawn(Arc::clone(p))?),
        None => None,
    };
    let coordinator = RenderCoordinator::new(pipeline, config.preview_max_lines);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = stdout.execute(EnterAlternateScreen).and_then(|s| s.execute(Hide)) {
        restore_terminal()?;
        return Err(e.into());
    }

    let (width, height) = terminal::size().unwrap_or((80, 24));
    info!(width, height, posts = thread.posts.len(), "Starting viewer");
    let mut app = TuiApp::new(
        stdout,
        thread,
        coordinator,
        worker,
        ViewportDimensions::new(width, height),
        config.tick(),
    );

    // Run the app and ensure cleanup happens even on error
    let result = app.run();
    restore_terminal()?;

    if let Some(worker) = app.worker.take() {
        debug!("Stopping preview worker");
        worker.shutdown();
    }
    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, shows the cursor, and leaves the alternate screen
fn restore_terminal() -> Result<(), AppError> {
    disable_raw_mode()?;
    io::stdout().execute(Show)?.execute(LeaveAlternateScreen)?;
    Ok(())
}
