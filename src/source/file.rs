//! File-based thread source.

use super::parse_thread;
use crate::model::error::InputError;
use crate::model::Thread;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A thread document on disk.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for `path`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the file.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for read failures and
    /// `InputError::InvalidJson` for malformed documents.
    pub fn load(self) -> Result<Thread, InputError> {
        let file = File::open(&self.path)?;
        parse_thread(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_missing_file() {
        let err = FileSource::new("/nonexistent/file.json").unwrap_err();
        match err {
            InputError::FileNotFound { path } => {
                assert_eq!(path, PathBuf::from("/nonexistent/file.json"));
            }
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn load_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[{").unwrap();

        let err = FileSource::new(&path).unwrap().load().unwrap_err();
        assert!(matches!(err, InputError::InvalidJson { .. }));
    }
}
