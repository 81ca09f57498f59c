//! Thread input sources.
//!
//! A thread is one JSON document, read from a file path or from piped stdin.

use crate::model::error::InputError;
use crate::model::Thread;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

pub mod file;
pub mod stdin;

pub use file::FileSource;
pub use stdin::StdinSource;

/// Where the thread comes from.
///
/// Sum type enforces exactly one variant.
#[derive(Debug)]
pub enum InputSource {
    /// A JSON file on disk.
    File(FileSource),
    /// JSON piped to stdin.
    Stdin(StdinSource),
}

impl InputSource {
    /// Read and decode the whole thread.
    ///
    /// # Errors
    ///
    /// Returns `InputError` for I/O failures and malformed JSON.
    pub fn load(self) -> Result<Thread, InputError> {
        let thread = match self {
            InputSource::File(f) => f.load()?,
            InputSource::Stdin(s) => s.load()?,
        };
        info!(posts = thread.posts.len(), "Loaded thread");
        Ok(thread)
    }
}

/// Detect and create the appropriate input source.
///
/// # Logic:
/// 1. If file path is provided: create FileSource
/// 2. If stdin is piped: use StdinSource
/// 3. Else: return InputError::NoInput
///
/// # Errors
///
/// Returns `InputError::NoInput` if no file is provided and stdin is a terminal.
/// Returns `InputError::FileNotFound` if the file does not exist.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(FileSource::new(path)?)),
        None => Ok(InputSource::Stdin(StdinSource::new()?)),
    }
}

/// Decode a thread document from any reader.
///
/// # Errors
///
/// Returns `InputError::Io` for read failures and `InputError::InvalidJson`
/// for documents that are not a thread.
pub fn parse_thread(reader: impl Read) -> Result<Thread, InputError> {
    let mut text = String::new();
    let mut reader = reader;
    reader.read_to_string(&mut text)?;
    serde_json::from_str(&text).map_err(|e| InputError::InvalidJson {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_thread_reads_posts() {
        let json = br#"{"posts": [{"id": 1, "author": "a", "raw": "x"}]}"#;
        let thread = parse_thread(&json[..]).unwrap();
        assert_eq!(thread.posts.len(), 1);
    }

    #[test]
    fn parse_thread_reports_invalid_json() {
        let err = parse_thread(&b"{not json"[..]).unwrap_err();
        assert!(matches!(err, InputError::InvalidJson { .. }));
    }

    #[test]
    fn detect_input_source_reports_missing_file() {
        let err = detect_input_source(Some(PathBuf::from("/nonexistent/thread.json"))).unwrap_err();
        assert!(matches!(err, InputError::FileNotFound { .. }));
    }

    #[test]
    fn load_from_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thread.json");
        std::fs::write(&path, r#"[{"id": 1, "author": "a"}, {"id": 2, "author": "b"}]"#).unwrap();

        let thread = detect_input_source(Some(path)).unwrap().load().unwrap();

        assert_eq!(thread.posts.len(), 2);
        assert_eq!(thread.posts[1].author, "b");
    }
}
