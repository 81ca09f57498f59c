//! Stdin-based thread source for piped input.

use super::parse_thread;
use crate::model::error::InputError;
use crate::model::Thread;
use std::io::IsTerminal;

/// Thread JSON piped to stdin (`curl .../t/123.json | threadview`).
///
/// Keyboard input is then read from the controlling terminal, not stdin.
#[derive(Debug)]
pub struct StdinSource {
    _private: (),
}

impl StdinSource {
    /// Create a new StdinSource.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is a TTY (interactive terminal).
    /// This prevents blocking on user input when nothing was piped.
    pub fn new() -> Result<Self, InputError> {
        if std::io::stdin().is_terminal() {
            return Err(InputError::NoInput);
        }
        Ok(Self { _private: () })
    }

    /// Read stdin to EOF and decode it.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for read failures and
    /// `InputError::InvalidJson` for malformed documents.
    pub fn load(self) -> Result<Thread, InputError> {
        parse_thread(std::io::stdin().lock())
    }
}
