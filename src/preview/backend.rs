//! External image-to-glyph renderers.
//!
//! Two interchangeable tools are supported: `chafa` (block-graphic symbols)
//! and `timg` (Unicode half/quarter blocks). Which one runs is decided once,
//! when the pipeline is built, from the configured [`BackendChoice`] and an
//! availability probe.

use crate::model::error::PreviewError;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Interval between exit checks while a renderer runs.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A concrete renderer tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// `chafa`, the block-graphic renderer.
    Chafa,
    /// `timg`, the Unicode-block renderer.
    Timg,
}

impl BackendKind {
    /// Executable name, also used as the cache identifier.
    pub fn command(self) -> &'static str {
        match self {
            BackendKind::Chafa => "chafa",
            BackendKind::Timg => "timg",
        }
    }

    /// Command-line arguments for rendering `path` into `width × height` cells.
    pub fn args(self, path: &Path, width: usize, height: usize, mode: RenderMode) -> Vec<String> {
        let path = path.to_string_lossy().into_owned();
        match self {
            BackendKind::Chafa => {
                let colors = match mode {
                    RenderMode::Mono => "none",
                    RenderMode::Color | RenderMode::HighFidelity => "full",
                };
                let symbols = match mode {
                    RenderMode::HighFidelity => "all",
                    RenderMode::Color | RenderMode::Mono => "block+border+space",
                };
                vec![
                    "--format=symbols".to_string(),
                    format!("--size={width}x{height}"),
                    format!("--colors={colors}"),
                    format!("--symbols={symbols}"),
                    "--animate=off".to_string(),
                    "--polite=on".to_string(),
                    path,
                ]
            }
            BackendKind::Timg => {
                let pixelation = match mode {
                    RenderMode::HighFidelity => "quarter",
                    RenderMode::Color | RenderMode::Mono => "half",
                };
                vec![
                    format!("-g{width}x{height}"),
                    format!("--pixelation={pixelation}"),
                    "--frames=1".to_string(),
                    path,
                ]
            }
        }
    }
}

/// Backend requested by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackendChoice {
    /// Probe chafa, then timg; use the first installed.
    #[default]
    Auto,
    /// Use chafa only.
    Chafa,
    /// Use timg only.
    Timg,
    /// Never render previews.
    Off,
}

impl std::str::FromStr for BackendChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(BackendChoice::Auto),
            "chafa" => Ok(BackendChoice::Chafa),
            "timg" => Ok(BackendChoice::Timg),
            "off" | "none" => Ok(BackendChoice::Off),
            other => Err(format!("unknown image backend '{other}'")),
        }
    }
}

/// How previews are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Coloured glyphs; SGR colour escapes are kept.
    #[default]
    Color,
    /// Glyphs only; every escape is stripped.
    Mono,
    /// Densest glyph set with colour; skips the quality filter.
    HighFidelity,
}

impl RenderMode {
    /// Whether SGR sequences survive sanitizing.
    pub fn keeps_color(self) -> bool {
        !matches!(self, RenderMode::Mono)
    }
}

/// Backend resolved at pipeline construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendSelection {
    /// Previews are off, or the pinned backend is not installed.
    Disabled,
    /// An explicit choice; no fallback.
    Pinned(BackendKind),
    /// Auto-selected; may retry once with `fallback` when present.
    Auto {
        /// Backend tried first.
        primary: BackendKind,
        /// The other backend, when installed.
        fallback: Option<BackendKind>,
    },
}

impl BackendSelection {
    /// Resolve `choice` against what `renderer` reports as available.
    pub fn resolve(choice: BackendChoice, renderer: &dyn Renderer) -> Self {
        let selection = match choice {
            BackendChoice::Off => BackendSelection::Disabled,
            BackendChoice::Chafa => Self::pin(BackendKind::Chafa, renderer),
            BackendChoice::Timg => Self::pin(BackendKind::Timg, renderer),
            BackendChoice::Auto => {
                let installed: Vec<BackendKind> = [BackendKind::Chafa, BackendKind::Timg]
                    .into_iter()
                    .filter(|kind| renderer.available(*kind))
                    .collect();
                match installed.as_slice() {
                    [] => BackendSelection::Disabled,
                    [only] => BackendSelection::Auto {
                        primary: *only,
                        fallback: None,
                    },
                    [first, second, ..] => BackendSelection::Auto {
                        primary: *first,
                        fallback: Some(*second),
                    },
                }
            }
        };
        debug!(?choice, ?selection, "Resolved image backend");
        selection
    }

    fn pin(kind: BackendKind, renderer: &dyn Renderer) -> Self {
        if renderer.available(kind) {
            BackendSelection::Pinned(kind)
        } else {
            warn!(backend = kind.command(), "Configured image backend is not installed");
            BackendSelection::Disabled
        }
    }

    /// Backend whose identifier goes into cache keys.
    pub fn primary(self) -> Option<BackendKind> {
        match self {
            BackendSelection::Disabled => None,
            BackendSelection::Pinned(kind) => Some(kind),
            BackendSelection::Auto { primary, .. } => Some(primary),
        }
    }

    /// Backend to retry with after an empty result.
    pub fn fallback(self) -> Option<BackendKind> {
        match self {
            BackendSelection::Auto { fallback, .. } => fallback,
            _ => None,
        }
    }
}

/// Renders an image file into raw terminal text.
pub trait Renderer: Send + Sync {
    /// Whether `kind` can be run on this machine.
    fn available(&self, kind: BackendKind) -> bool;

    /// Render the image at `path` into at most `width × height` cells.
    ///
    /// # Errors
    ///
    /// Returns an error when the tool cannot start, fails, or times out.
    fn render(
        &self,
        kind: BackendKind,
        path: &Path,
        width: usize,
        height: usize,
        mode: RenderMode,
    ) -> Result<String, PreviewError>;
}

/// Runs the real tools as child processes.
#[derive(Debug, Clone)]
pub struct ProcessRenderer {
    timeout: Duration,
}

impl ProcessRenderer {
    /// Create a renderer that kills tools running longer than `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Renderer for ProcessRenderer {
    fn available(&self, kind: BackendKind) -> bool {
        which::which(kind.command()).is_ok()
    }

    fn render(
        &self,
        kind: BackendKind,
        path: &Path,
        width: usize,
        height: usize,
        mode: RenderMode,
    ) -> Result<String, PreviewError> {
        let command = kind.command();
        let mut child = Command::new(command)
            .args(kind.args(path, width, height, mode))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PreviewError::Spawn { command, source })?;

        // Drain stdout on its own thread so a full pipe cannot block the child.
        let mut stdout = child.stdout.take().ok_or_else(|| {
            PreviewError::Io(std::io::Error::other("renderer stdout not captured"))
        })?;
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        });

        let status = wait_with_timeout(&mut child, command, self.timeout)?;

        let output = reader
            .join()
            .map_err(|_| PreviewError::Io(std::io::Error::other("renderer reader panicked")))??;

        if !status.success() {
            return Err(PreviewError::ExitStatus {
                command,
                status: status.to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

/// Poll `child` until it exits or `timeout` passes; on expiry kill and reap it.
fn wait_with_timeout(
    child: &mut Child,
    command: &'static str,
    timeout: Duration,
) -> Result<std::process::ExitStatus, PreviewError> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if started.elapsed() >= timeout {
            // Kill can fail if the child exited in between; reaping settles it.
            let _ = child.kill();
            let _ = child.wait();
            warn!(command, ?timeout, "Killed image renderer");
            return Err(PreviewError::Timeout {
                command,
                elapsed: timeout,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}
