//! Domain model types (pure).
//!
//! All types in this module are pure data.

pub mod error;
pub mod key_action;
pub mod post;

// Re-export for convenience
pub use error::{AppError, InputError, PreviewError};
pub use key_action::KeyAction;
pub use post::{relative_age, Post, Thread};
