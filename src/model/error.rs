//! Error types for threadview.
//!
//! This module defines the error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error wrapping all shell failures
//!   - [`InputError`] - Thread file/stdin reading and decoding failures
//!   - [`ConfigError`](crate::config::ConfigError) - Config file read/parse failures
//!   - [`LoggingError`](crate::logging::LoggingError) - Log file setup failures
//!   - `std::io::Error` - Terminal failures
//! - [`PreviewError`] - Image preview failures (never escapes the pipeline)
//!
//! # Error Recovery Strategy
//!
//! Only the outer shell returns errors. Everything below the application loop is
//! total: malformed text renders literally, and every preview failure is logged,
//! turned into a rejected preview, and cached so the same key is not retried.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
///
/// Returned from `main`'s run function. Domain errors convert via `From`, so
/// the shell composes with `?`.
///
/// # Examples
///
/// ```no_run
/// use threadview::model::error::{AppError, InputError};
///
/// fn run_app() -> Result<(), AppError> {
///     // InputError automatically converts to AppError via From
///     let _thread = read_thread()?;
///     Ok(())
/// }
/// # fn read_thread() -> Result<(), InputError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read or decode the thread.
    ///
    /// **Recovery**: Fatal. Display the error and exit with non-zero status.
    #[error("Failed to read input: {0}")]
    InputRead(#[from] InputError),

    /// Config file exists but is unreadable or invalid.
    ///
    /// **Recovery**: Fatal. A broken config is reported rather than silently
    /// replaced with defaults.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Log file could not be set up.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Terminal I/O error (raw mode, alternate screen, drawing).
    ///
    /// **Recovery**: Restore the terminal, then exit.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors encountered when reading a thread from a file or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified thread file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use threadview::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.json")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.json"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The filesystem path that was not found.
        path: PathBuf,
    },

    /// No input source was provided.
    ///
    /// Occurs when no file argument is given and stdin is a terminal.
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// The input is not a valid thread document.
    #[error("Invalid thread JSON: {message}")]
    InvalidJson {
        /// The `serde_json` error message, including line and column.
        message: String,
    },

    /// Generic I/O error reading from the input source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures inside the image preview pipeline.
///
/// These never reach the caller of the pipeline. Each one is logged and then
/// stored as a rejected preview under its cache key.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// HTTP request failed or returned an error status.
    #[error("Fetch of {url} failed: {reason}")]
    Fetch {
        /// URL being fetched.
        url: String,
        /// Transport or status error text.
        reason: String,
    },

    /// Response body exceeded the configured byte ceiling.
    #[error("Image at {url} exceeds {limit} bytes")]
    Oversize {
        /// URL being fetched.
        url: String,
        /// The byte ceiling.
        limit: usize,
    },

    /// External renderer did not finish in time and was killed.
    #[error("{command} timed out after {elapsed:?}")]
    Timeout {
        /// Renderer executable name.
        command: &'static str,
        /// Time allowed before the kill.
        elapsed: Duration,
    },

    /// External renderer could not be started.
    #[error("Failed to spawn {command}: {source}")]
    Spawn {
        /// Renderer executable name.
        command: &'static str,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// External renderer exited unsuccessfully.
    #[error("{command} exited with {status}")]
    ExitStatus {
        /// Renderer executable name.
        command: &'static str,
        /// Exit status description.
        status: String,
    },

    /// Temp file or pipe I/O failed.
    #[error("Preview IO error: {0}")]
    Io(#[from] std::io::Error),
}
